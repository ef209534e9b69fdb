use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Settings file could not be read or written.
    Io { path: PathBuf, message: String },
    /// Settings file is not valid JSON for its kind.
    Parse { path: PathBuf, message: String },
    /// Value could not be encoded.
    Encode(String),
    /// Key is not part of a closed settings set.
    UnknownKey(String),
    /// Value failed validation (bad key chord, bad hex color, ...).
    InvalidValue { key: String, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => {
                write!(f, "unable to access {}: {message}", path.display())
            }
            Self::Parse { path, message } => {
                write!(f, "invalid settings file {}: {message}", path.display())
            }
            Self::Encode(msg) => write!(f, "unable to encode settings: {msg}"),
            Self::UnknownKey(key) => write!(f, "unknown setting '{key}'"),
            Self::InvalidValue { key, message } => {
                write!(f, "invalid value for '{key}': {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
