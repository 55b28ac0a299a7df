//! Error types.
//!
//! Two layers:
//!
//! - [`SegError`]: the core taxonomy (input, domain, configuration). Every pure
//!   evaluator/comparator function returns it.
//! - [`AppError`]: what the binary surfaces to the user, carrying a process exit code.
//!
//! Exit codes: 2 = bad input or configuration, 3 = nothing to evaluate,
//! 4 = computation failure.

use thiserror::Error;

/// Errors raised by the evaluation core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SegError {
    /// Non-positive or non-finite mass, radius, or observation.
    #[error("input error: {0}")]
    Input(String),

    /// A closed-form quantity requested outside its domain
    /// (e.g. baseline dilation below the reference radius).
    #[error("domain error: {0}")]
    Domain(String),

    /// Invalid constants, regime boundaries, or correction calibration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl SegError {
    pub fn input(message: impl Into<String>) -> Self {
        SegError::Input(message.into())
    }

    pub fn domain(message: impl Into<String>) -> Self {
        SegError::Domain(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        SegError::Configuration(message.into())
    }

    /// Short machine-friendly label used in exports.
    pub fn kind(&self) -> &'static str {
        match self {
            SegError::Input(_) => "input",
            SegError::Domain(_) => "domain",
            SegError::Configuration(_) => "configuration",
        }
    }
}

pub type SegResult<T> = Result<T, SegError>;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<SegError> for AppError {
    fn from(err: SegError) -> Self {
        let exit_code = match err {
            SegError::Input(_) | SegError::Configuration(_) => 2,
            SegError::Domain(_) => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
