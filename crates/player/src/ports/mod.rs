//! Player port definitions.
//!
//! Everything the client needs from the outside world (chain services, audio,
//! wallet, navigation, rendering) is expressed as an outbound port so the
//! orchestration core stays free of transport concerns.

pub mod outbound;
