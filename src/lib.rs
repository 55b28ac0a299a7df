//! `segcalc` library crate.
//!
//! Evaluates compact objects under a segment-density dilation model and the
//! standard weak-field baseline, classifies each object's radial regime, and
//! decides per object which model's redshift prediction is closer to an
//! observation.
//!
//! The binary (`seg`) is a thin wrapper around this library so that:
//!
//! - the evaluator is testable without spawning processes
//! - the pure core (`domain`, `math`, `models`, `eval`) is reusable on its own

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod eval;
pub mod io;
pub mod math;
pub mod models;
pub mod report;
