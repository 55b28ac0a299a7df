//! Mathematical utilities: the quintic blend weight and mergeable moments.

pub mod smoothstep;
pub mod stats;

pub use smoothstep::*;
pub use stats::*;
