//! Orvia core library.
//!
//! Shared types used across the Orvia auth service crates.
//!
//! # Modules
//!
//! - [`ids`] - strongly typed identifiers (`AccountId`)

pub mod ids;

pub use ids::{AccountId, ParseIdError};
