//! Catalog validation errors.

use thiserror::Error;

/// Error raised while building or validating a layout catalog.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Catalog is missing required layout '{0}'")]
    MissingLayout(String),

    #[error("Layout '{0}' is defined more than once")]
    DuplicateLayout(String),

    #[error("Layout '{0}' has no keys")]
    EmptyLayout(String),

    #[error("Layout '{layout}' defines key '{key}' more than once")]
    DuplicateKey { layout: String, key: String },

    #[error("Key '{key}' in layout '{layout}' has an empty {field}")]
    EmptyField {
        layout: String,
        key: String,
        field: &'static str,
    },

    #[error("Key '{key}' in layout '{layout}' has a zero dwell override")]
    ZeroDwell { layout: String, key: String },

    #[error("Invalid catalog YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Result type for catalog construction.
pub type LayoutResult<T> = Result<T, LayoutError>;
