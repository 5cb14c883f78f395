//! Runtime wiring and observability.
//!
//! - [`BridgeSystem`]: spawns the content store and builds the handlers
//! - [`setup_tracing`] / [`try_setup_tracing`]: logging initialization

pub mod bridge_system;
pub mod tracing;

pub use bridge_system::*;
pub use self::tracing::*;
