//! Test utilities for processor testing
//!
//! Signal generators, PCM packing helpers and analysis tools used by the
//! integration tests and benchmarks.

pub mod analysis;
pub mod signals;

pub use analysis::*;
pub use signals::*;
