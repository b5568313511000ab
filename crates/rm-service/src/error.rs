use thiserror::Error;

use rm_core::{CoreError, NodeId};
use rm_search::SearchError;
use rm_spatial::{AbortReason, SpatialError};
use rm_tiles::TileError;

/// Outcome of a query that produced no answer.
///
/// `NoRouteFound` and `SearchAborted` are deliberately separate: the first
/// is proof that the destination is unreachable, the second only means the
/// search budget ran out.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("malformed query: {0}")]
    MalformedQuery(String),

    #[error("no route from {from} to {to}")]
    NoRouteFound { from: NodeId, to: NodeId },

    #[error("route search aborted after {explored} nodes: {reason}")]
    SearchAborted { explored: usize, reason: AbortReason },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] CoreError),
}

pub type QueryResult<T> = Result<T, QueryError>;

impl From<SpatialError> for QueryError {
    fn from(e: SpatialError) -> Self {
        match e {
            SpatialError::NoRoute { from, to } => QueryError::NoRouteFound { from, to },
            SpatialError::SearchAborted { explored, reason } => {
                QueryError::SearchAborted { explored, reason }
            }
            SpatialError::EmptyGraph => QueryError::MalformedQuery(e.to_string()),
            SpatialError::Core(inner @ CoreError::Config(_)) => QueryError::Config(inner),
            SpatialError::NodeNotFound(_)
            | SpatialError::InvalidWeight { .. }
            | SpatialError::UnparseableDirection(_)
            | SpatialError::Core(CoreError::InvalidCoordinate { .. }) => {
                QueryError::InvalidArgument(e.to_string())
            }
        }
    }
}

impl From<SearchError> for QueryError {
    fn from(e: SearchError) -> Self {
        QueryError::InvalidArgument(e.to_string())
    }
}

impl From<TileError> for QueryError {
    fn from(e: TileError) -> Self {
        match e {
            TileError::Config(inner) => QueryError::Config(inner),
        }
    }
}
