//! Adapter implementations of the connector port.
//!
//! Each provider module pairs a pure normaliser with a connector that owns
//! HTTP access and retries. The in-memory adapter backs tests and local
//! wiring.

pub mod http;
pub mod memory;
pub mod notion;
mod parse;
pub mod retry;
pub mod todoist;

pub use retry::RetryPolicy;
