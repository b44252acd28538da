use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("not found: {entity} named {name}")]
    NotFound { entity: &'static str, name: String },

    #[error("duplicate {entity}: {name}")]
    Duplicate { entity: &'static str, name: String },
}

pub type Result<T> = std::result::Result<T, Error>;
