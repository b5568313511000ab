use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    /// A required string argument was absent.
    #[error("invalid argument: {0} is required")]
    InvalidArgument(&'static str),
}

pub type SearchResult<T> = Result<T, SearchError>;
