use thiserror::Error;

#[derive(Debug, Error)]
pub enum GarajError {
    #[error("invalid audience selector '{0}': expected one of all, startup_owners, startup_members")]
    InvalidAudienceSelector(String),

    #[error("broadcast message must not be empty")]
    EmptyMessage,

    #[error("config not found: {0}")]
    ConfigNotFound(String),

    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, GarajError>;
