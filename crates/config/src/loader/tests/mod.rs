//! Tests for the configuration loader builder.
//!
//! Invariants:
//! - Tests that touch process environment use `serial_test` and `temp_env`
//!   so no variable leaks between tests.

pub mod validation_tests;
