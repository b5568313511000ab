//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant where configuration problems can surface.

use thiserror::Error;

/// Errors produced by `rm-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid coordinate ({lon}, {lat})")]
    InvalidCoordinate { lon: f64, lat: f64 },
}

/// Shorthand result type for `rm-core`.
pub type CoreResult<T> = Result<T, CoreError>;
