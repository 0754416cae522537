//! Port contracts for task providers.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod connector;

pub use connector::{ConnectorError, ConnectorResult, TaskConnector};

#[cfg(test)]
pub use connector::MockTaskConnector;
