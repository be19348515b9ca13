//! Integration test utilities for the gather API
//!
//! Spawns the full HTTP stack over the in-memory store and drives it with
//! a real HTTP client.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
