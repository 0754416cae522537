//! Task aggregation across external providers.
//!
//! Notion database pages and Todoist tasks are normalised into one canonical
//! [`domain::Task`] model, merged behind a short-lived snapshot cache, and
//! written back to whichever provider owns them. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
