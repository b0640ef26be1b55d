//! Error types for mfsession.

use std::path::PathBuf;

use thiserror::Error;

/// mfsession error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Argument that cannot be interpreted (e.g. a load path that is
    /// neither a directory nor a file)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Top and bottom elevation arrays disagree in shape
    #[error("Shape mismatch: top {top:?} vs bottom {bottom:?}")]
    ShapeMismatch { top: Vec<usize>, bottom: Vec<usize> },

    /// Unit letter not present in the lookup table
    #[error("Unknown {table} unit code '{code}'")]
    UnknownUnit { table: &'static str, code: String },

    /// A package required to write another one is absent
    #[error("Missing package: {0}")]
    MissingPackage(String),

    /// External executable finished without a normal termination
    #[error("Execution of '{exe}' failed: {reason}")]
    Execution { exe: String, reason: String },

    /// Malformed name file
    #[error("Name file error: {0}")]
    NameFile(String),

    /// Head file decoding error
    #[error("Head file error: {0}")]
    HeadFile(#[from] crate::output::heads::HeadFileError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid_path(path: &std::path::Path) -> Self {
        Error::InvalidArgument(format!("Not a valid path: {}", path.display()))
    }

    pub(crate) fn missing_file(path: PathBuf) -> Self {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        ))
    }
}

/// Result type alias for mfsession operations.
pub type Result<T> = std::result::Result<T, Error>;
