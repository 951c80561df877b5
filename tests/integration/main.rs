//! Integration test harness
//!
//! These tests run the full pipeline against wiremock HTTP servers.

mod crawl_tests;
