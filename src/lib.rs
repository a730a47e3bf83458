//! Cross-venue market order pricing.
//!
//! Fetches the order books of two exchanges concurrently, merges them into one
//! depth book and walks it to price buying and selling a given quantity.

pub mod app;
pub mod cli;
pub mod engine;
pub mod market_data;
pub mod persist;
pub mod rate_limit;
pub mod report;
pub mod settings;
pub mod telemetry;
