//! Unit and integration tests for altertable_flight
//!
//! This module organizes all tests into logical submodules that correspond to
//! the main library modules. Everything except `integration_tests` runs against
//! the in-memory transport in `test_utils`.

mod connection_tests;
mod constants_tests;
mod proptest_tests;
mod statement_tests;
mod utils_tests;
