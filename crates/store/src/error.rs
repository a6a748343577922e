use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Walk error: {0}")]
    WalkError(#[from] walkdir::Error),
}

#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("Unknown knowledge base '{id}' (available: {})", available.join(", "))]
    UnknownBase { id: String, available: Vec<String> },

    #[error("Path '{path}' escapes knowledge base '{id}'")]
    PathEscape { id: String, path: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
