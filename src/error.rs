use thiserror::Error;

/// Structured error hierarchy for `imgrelay`.
///
/// The rewriting core deliberately has no error type of its own: a
/// reference that cannot be proxied (malformed URL, no host) is left
/// untouched rather than reported. Only the collaborators — config and
/// the message store — can fail.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("store: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine home directory")]
    NoHome,

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid proxy base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlx: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, RelayError>;
