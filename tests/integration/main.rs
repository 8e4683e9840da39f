//! Integration test harness.
//!
//! Single test target so the mock source and fixtures are shared.

mod service;
