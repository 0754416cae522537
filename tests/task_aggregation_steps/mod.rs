//! Step definitions for task aggregation scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
