//! Integration test suite for taskdeck.
//!
//! These tests exercise the full path from HTTP request to published
//! store state against an in-process mock server. They verify that the
//! gateway, the task store, and the merge rules work together correctly.
//!
//! # Test Categories
//!
//! - `gateway`: HTTP request/response handling and error normalization
//! - `store_sync`: Store operations and state transitions end to end
//!
//! # CI Compatibility
//!
//! These tests run against a local mockito server and never touch a
//! real API, making them safe to run in CI environments.


mod gateway;
mod store_sync;
