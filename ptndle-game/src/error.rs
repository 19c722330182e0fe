//! Error types shared across the engine.

use thiserror::Error;

/// Catalog loading and lookup failures.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A saved or submitted name does not exist in the catalog.
    #[error("Character with name {name} not found.")]
    NotFound { name: String },

    /// The catalog has no entries, so no target can be seeded.
    #[error("catalog is empty")]
    Empty,

    /// Two entries share a name.
    #[error("duplicate character name in catalog: {name}")]
    Duplicate { name: String },

    #[error("catalog JSON parsing error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Persistence backend failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The key-value backend rejected a read or write.
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors surfaced by the session controller.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
