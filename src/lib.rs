//! Taskhub: one task list over Notion and Todoist.
//!
//! This crate aggregates task records from independent providers into a
//! canonical model and routes writes back to the provider that owns each
//! record. Reads fan out to every provider concurrently and degrade to a
//! partial result when one is unavailable; transient provider errors are
//! retried with exponential backoff.
//!
//! # Architecture
//!
//! Taskhub follows hexagonal architecture principles:
//!
//! - **Domain**: the canonical task model, free of provider shapes
//! - **Ports**: the connector trait every provider implements
//! - **Adapters**: Notion, Todoist and in-memory connectors
//!
//! # Modules
//!
//! - [`task`]: canonical model, connectors and the aggregation service
//! - [`config`]: environment configuration and service wiring

pub mod config;
pub mod task;
