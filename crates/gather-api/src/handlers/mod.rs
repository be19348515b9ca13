//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod delegates;
pub mod events;
pub mod health;
pub mod tasks;
pub mod volunteers;
