use std::fmt;
use std::path::PathBuf;

use charsheet_model::ListKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// File could not be read or written.
    Io { path: PathBuf, message: String },
    /// File is not valid JSON for its kind.
    Parse { path: PathBuf, message: String },
    /// File was written by a newer (or broken) version.
    UnsupportedVersion { path: PathBuf, version: u32 },
    /// File holds a different list than the caller asked for.
    WrongKind {
        path: PathBuf,
        expected: ListKind,
        found: ListKind,
    },
    /// Rows could not be encoded.
    Encode(String),
}

impl DocumentError {
    pub(crate) fn io(path: &std::path::Path, err: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "unable to access {}: {message}", path.display()),
            Self::Parse { path, message } => write!(f, "invalid file {}: {message}", path.display()),
            Self::UnsupportedVersion { path, version } => {
                write!(f, "{} has unsupported format version {version}", path.display())
            }
            Self::WrongKind { path, expected, found } => write!(
                f,
                "{} holds {} data, expected {}",
                path.display(),
                found.title(),
                expected.title()
            ),
            Self::Encode(msg) => write!(f, "unable to encode document: {msg}"),
        }
    }
}

impl std::error::Error for DocumentError {}
