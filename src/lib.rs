//! betslip-odds: NFL/CFB odds proxy.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod api;
pub mod books;
pub mod cache;
pub mod clock;
pub mod config;
pub mod normalize;
pub mod odds_api;
pub mod service;
pub mod types;
pub mod window;
