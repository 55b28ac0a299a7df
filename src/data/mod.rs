//! Catalog sources that are not files on disk.
//!
//! Currently only the seeded synthetic generator used by `seg demo` and tests.

pub mod sample;

pub use sample::*;
