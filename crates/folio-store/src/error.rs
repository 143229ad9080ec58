use std::io;
use std::path::PathBuf;

/// Errors from record store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A required key component was empty.
    #[error("{what} must not be empty when {op}")]
    EmptyName {
        what: &'static str,
        op: &'static str,
    },

    /// A collection or resource name is not a usable path segment.
    #[error("invalid name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// Neither the bare path nor its suffixed variant exists.
    #[error("'{}' does not exist", path.display())]
    NotFound { path: PathBuf },

    /// A record was requested but the path names a directory.
    #[error("'{}' is a collection, not a record", path.display())]
    NotARecord { path: PathBuf },

    /// A collection was requested but the path names a file.
    #[error("'{}' is a record, not a collection", path.display())]
    NotACollection { path: PathBuf },

    /// The path exists but is neither a regular file nor a directory.
    #[error("'{}' is neither a record nor a collection", path.display())]
    UnsupportedEntry { path: PathBuf },

    /// Encoding a document failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Decoding a stored document failed.
    #[error("decode error in '{}': {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    /// I/O error from the underlying filesystem.
    #[error("failed to {op} '{}': {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// Returns `true` for errors caused by a missing record or collection.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Io { source, .. } => source.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }

    /// Returns `true` for errors the caller caused by passing bad names.
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::EmptyName { .. } | Self::InvalidName { .. })
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
