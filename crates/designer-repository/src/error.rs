//! Error types for designer-repository

/// Result type for designer-repository operations
pub type Result<T> = std::result::Result<T, Error>;

/// How a caller is expected to react to an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The caller referenced an asset or directory that does not exist.
    NotFound,
    /// An expected failure; the caller decides how to proceed.
    Recoverable,
    /// An environment or programming invariant was violated; abort the
    /// request.
    Fatal,
}

/// Errors that can occur in repository operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Asset identifier or path does not resolve to a readable asset
    #[error("Asset not found: {id}")]
    AssetNotFound { id: String },

    /// Source directory of a copy or move does not exist
    #[error("Directory does not exist: {location}")]
    DirectoryNotFound { location: String },

    #[error("Not a directory: {location}")]
    NotADirectory { location: String },

    #[error("Directory is not empty: {location}")]
    DirectoryNotEmpty { location: String },

    /// Destination of a copy or move lies inside its own source
    #[error("Cannot place {source_location} inside itself at {destination}")]
    InvalidDestination {
        source_location: String,
        destination: String,
    },

    /// Location resolves to a path outside the repository root
    #[error("Location escapes the repository root: {location}")]
    OutsideRoot { location: String },

    /// Repository root is not a usable absolute URI
    #[error("Invalid repository root '{root}': {message}")]
    InvalidRoot { root: String, message: String },

    /// Bound filesystem could not be resolved
    #[error("Cannot open filesystem for {uri}")]
    ProviderInit {
        uri: String,
        #[source]
        source: designer_fs::Error,
    },

    /// Content of a newly created asset could not be written
    #[error("Error when creating asset {path}")]
    AssetWrite {
        path: String,
        #[source]
        source: designer_fs::Error,
    },

    /// Filesystem error from designer-fs
    #[error(transparent)]
    Fs(#[from] designer_fs::Error),
}

impl Error {
    pub fn asset_not_found(id: impl Into<String>) -> Self {
        Self::AssetNotFound { id: id.into() }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            Self::AssetNotFound { .. } | Self::DirectoryNotFound { .. } => ErrorClass::NotFound,
            Self::InvalidRoot { .. } | Self::ProviderInit { .. } | Self::AssetWrite { .. } => {
                ErrorClass::Fatal
            }
            Self::NotADirectory { .. }
            | Self::DirectoryNotEmpty { .. }
            | Self::InvalidDestination { .. }
            | Self::OutsideRoot { .. }
            | Self::Fs(_) => ErrorClass::Recoverable,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.class() == ErrorClass::NotFound
    }

    pub fn is_fatal(&self) -> bool {
        self.class() == ErrorClass::Fatal
    }
}
