//! Core types shared across the engine.
//!
//! - Health tiers and their color tokens
//! - Engine configuration

pub mod config;
pub mod tier;

pub use config::*;
pub use tier::*;
