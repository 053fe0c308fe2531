use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThermalError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid membership for {variable}: {reason}")]
    InvalidMembership { variable: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ThermalError>;
