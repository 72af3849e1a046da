//! Presenter Port - receives a view snapshot after every runner step

use crate::application::ScreenView;

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait PresenterPort: Send + Sync {
    fn render(&self, view: &ScreenView);
}
