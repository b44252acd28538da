use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("category already selected: {0}")]
    AlreadySelected(String),
}

pub type SearchResult<T> = std::result::Result<T, SearchError>;
