//! Closed-form physics of the two models.
//!
//! Everything here is a small pure function of a normalized radius (or mass)
//! plus configuration, so the evaluator in `eval` can stay a thin composition.

pub mod density;
pub mod dilation;
pub mod power_law;
pub mod redshift;
pub mod regime;

pub use density::*;
pub use dilation::*;
pub use power_law::*;
pub use redshift::*;
pub use regime::*;
