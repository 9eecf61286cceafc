//! Devig & Kelly — fair-value pricing and stake sizing for American-odds bets
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod pricing;
pub mod parser;
pub mod strategy;
pub mod report;
pub mod server;
