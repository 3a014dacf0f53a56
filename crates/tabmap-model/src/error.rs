use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("target schema has no non-blank column names")]
    EmptySchema,
    #[error("row has {found} cells but the table has {expected} columns")]
    RaggedRow { expected: usize, found: usize },
}

pub type Result<T> = std::result::Result<T, ModelError>;
