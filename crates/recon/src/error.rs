use std::path::PathBuf;

use thiserror::Error;

use crate::model::RecordId;

/// Catalog (NDJSON) load failure. Loads are all-or-nothing.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 1-based line number in the source text.
    #[error("{catalog} catalog, line {line}: {message}")]
    Parse {
        catalog: String,
        line: usize,
        message: String,
    },
    #[error("{catalog} catalog: duplicate id {id} (lines {first_line} and {line})")]
    DuplicateId {
        catalog: String,
        id: RecordId,
        first_line: usize,
        line: usize,
    },
}

/// Key-value store failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid store key '{0}'")]
    InvalidKey(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Semantic validation (bad label, zero limit, ...).
    #[error("config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Error)]
pub enum ReconError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Import payload did not describe a review state. Nothing was changed.
    #[error("import rejected: {0}")]
    Import(String),
    #[error("JSON serialization error: {0}")]
    Serialize(String),
    #[error("unknown primary id {0}")]
    UnknownPrimary(RecordId),
}
