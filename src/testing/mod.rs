//! Testing utilities and mock implementations
//!
//! Mocks for the upstream reader and the notification port, usable from unit
//! and integration tests alike.

pub mod mocks;

pub use mocks::*;
