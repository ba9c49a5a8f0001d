//! Registry error types.

use thiserror::Error;

/// Errors raised while validating report configuration.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// One or more requested section ids are not in the catalog.
    ///
    /// Carries every offending id so the client sees the full list at
    /// once instead of fixing them one by one.
    #[error("unknown report sections: {}", .0.join(", "))]
    UnknownSections(Vec<String>),

    /// No sections were requested at all.
    #[error("no report sections requested")]
    NoSectionsRequested,
}
