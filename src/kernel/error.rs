use crate::kernel::services::ports::FileError;

#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    #[error("workspace already exists: {0}")]
    AlreadyExists(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Listing a backend directory failed.
    #[error("failed to resolve {path}: {source}")]
    Resolution {
        path: String,
        #[source]
        source: FileError,
    },
    #[error("failed to write {path}: {source}")]
    WriteFailure {
        path: String,
        #[source]
        source: FileError,
    },
    #[error("no handler registered for {0}")]
    NoHandler(&'static str),
    #[error("side system {name} failed: {message}")]
    SideSystem { name: String, message: String },
    #[error(transparent)]
    File(#[from] FileError),
}

pub type PanelResult<T> = Result<T, PanelError>;
