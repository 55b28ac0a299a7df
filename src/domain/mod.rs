//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - immutable run configuration (`PhysicalConstants`, `RegimeBoundaries`,
//!   `DensityParams`, `CorrectionParams`, `EngineConfig`)
//! - catalog input (`ObjectRecord`)
//! - evaluation and comparison outputs (`EvaluationResult`, `Comparison`, `Verdict`)

pub mod types;

pub use types::*;
