//! Overlay error types.

use survey_config::ConfigError;

/// Errors surfaced by explicit user or host requests.
///
/// Nothing on the per-tick path returns these; degenerate data is clamped and
/// missing capabilities simply disable features.
#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    /// No provider is registered under this key.
    #[error("unknown overlay provider '{0}'")]
    UnknownProvider(String),

    /// The provider exists but its data source is missing.
    #[error("overlay provider '{0}' cannot activate")]
    NotActivatable(String),

    /// A provider with this key is already registered.
    #[error("overlay provider '{0}' is already registered")]
    DuplicateProvider(String),

    /// A body with this name is already in the catalog.
    #[error("body '{0}' is already registered")]
    DuplicateBody(String),

    /// Persisting settings failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
