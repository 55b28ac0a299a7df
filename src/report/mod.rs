//! Reporting utilities: formatted terminal output for runs and single objects.

pub mod format;

pub use format::*;
