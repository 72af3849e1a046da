//! Tomie player client.
//!
//! The application layer is a deterministic core driven by inputs and explicit
//! timestamps; the runner executes its effects against the outbound ports, and
//! the infrastructure layer provides offline adapters for those ports.

pub mod application;
pub mod config;
pub mod infrastructure;
pub mod ports;
pub mod runner;

pub use config::{PlayerConfig, TimingConfig};
pub use runner::{SessionPorts, SessionRunner, UserInput};
