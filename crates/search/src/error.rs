use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Vector store error: {0}")]
    VectorStoreError(#[from] uxguide_vector_store::VectorStoreError),

    #[error("Unknown search mode '{0}' (expected lexical/bm25, semantic/vector or fused/hybrid)")]
    UnknownMode(String),

    #[error("Invalid search configuration: {0}")]
    InvalidConfig(String),
}
