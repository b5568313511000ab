use thiserror::Error;

use rm_core::CoreError;

#[derive(Debug, Error)]
pub enum TileError {
    /// The pyramid configuration itself is unusable.
    #[error("invalid tile configuration: {0}")]
    Config(#[from] CoreError),
}

pub type TileResult<T> = Result<T, TileError>;
