//! Input/output helpers.
//!
//! - catalog CSV ingest + validation (`ingest`)
//! - result exports (CSV/JSON) (`export`)
//! - engine configuration JSON (`config`)

pub mod config;
pub mod export;
pub mod ingest;

pub use config::*;
pub use export::*;
pub use ingest::*;
