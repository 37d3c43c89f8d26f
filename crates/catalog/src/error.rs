use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Unknown domain: {name}. Available: {available}")]
    UnknownTopic { name: String, available: String },

    #[error("Unknown stack: {name}. Available: {available}")]
    UnknownStack { name: String, available: String },

    #[error("File not found: {} (requested by '{topic}')", path.display())]
    NotFound { topic: String, path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Catalog parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid catalog: {0}")]
    InvalidConfig(String),
}
