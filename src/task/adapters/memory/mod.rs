//! In-memory adapters.

mod connector;

pub use connector::{ConnectorCalls, InMemoryTaskConnector};
