//! Evaluation orchestration.
//!
//! Responsibilities:
//!
//! - evaluate one record (`processor`)
//! - judge the two models against an observation (`comparator`)
//! - summarize many comparisons (`aggregate`)
//! - run all of the above over a catalog, in parallel (`batch`)

pub mod aggregate;
pub mod batch;
pub mod comparator;
pub mod processor;

pub use aggregate::*;
pub use batch::*;
pub use comparator::*;
pub use processor::*;
