//! Consolidated integration tests for labval-core.
//!
//! One test binary keeps the mock servers and proptest suites from
//! competing for ports and threads across parallel test executables.

mod cli;
mod common;
mod scenarios;
