//! Session error taxonomy
//!
//! Every external failure is converted into one of these at the call site and
//! stored as view state; none of them ends the session.

use tomie_domain::DomainError;

use crate::ports::outbound::{AudioError, ServiceError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Wallet/account unavailable; the player is prompted to reconnect.
    #[error("{0}")]
    Connection(String),
    /// A game transaction failed; local state was reset so it can be retried.
    #[error("{0}")]
    Submission(String),
    /// Voice clip failed to load; pacing falls back to defaults.
    #[error("Voice clip failed to load: {0}")]
    AudioLoad(String),
    /// Voice clip was preempted by a newer one.
    #[error("Voice clip superseded by a newer one")]
    Superseded,
    /// Malformed identifier or request, rejected before any external call.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl SessionError {
    /// Convert a failed game service call, prefixing the user-facing action.
    pub fn from_service(action: &str, err: ServiceError) -> Self {
        match err {
            ServiceError::NotConnected => Self::Connection(err.to_string()),
            other => Self::Submission(format!("{action}: {other}")),
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

impl From<AudioError> for SessionError {
    fn from(err: AudioError) -> Self {
        match err {
            AudioError::LoadFailed(msg) => Self::AudioLoad(msg),
        }
    }
}

impl From<DomainError> for SessionError {
    fn from(err: DomainError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_wallet_is_a_connection_error() {
        let err = SessionError::from_service("Failed to play", ServiceError::NotConnected);
        assert!(err.is_connection());
        assert_eq!(err.to_string(), "Connect with controller");
    }

    #[test]
    fn transaction_failures_keep_the_action_context() {
        let err = SessionError::from_service(
            "Failed to play",
            ServiceError::Transaction("reverted".into()),
        );
        assert_eq!(err, SessionError::Submission("Failed to play: Tx failed: reverted".into()));
    }

    #[test]
    fn domain_errors_are_invalid_input() {
        let err: SessionError = DomainError::invalid_id("abc").into();
        assert!(matches!(err, SessionError::InvalidInput(_)));
    }
}
