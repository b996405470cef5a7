use thiserror::Error;

#[derive(Debug, Error)]
pub enum PincebotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required setting: {key}")]
    MissingSetting { key: &'static str },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PincebotError {
    /// Short error code string used in HTTP error bodies and log fields.
    pub fn code(&self) -> &'static str {
        match self {
            PincebotError::Config(_) => "CONFIG_ERROR",
            PincebotError::MissingSetting { .. } => "MISSING_SETTING",
            PincebotError::Serialization(_) => "SERIALIZATION_ERROR",
            PincebotError::Io(_) => "IO_ERROR",
            PincebotError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, PincebotError>;
