//! Service ports: traits + data contracts.

pub mod config;
pub mod file;
pub mod runtime;

pub use config::{CodeSampleConfig, LogConfig, PanelConfig};
pub use file::{
    join_path, normalize_path, DirEntry, FileError, FileEvent, FileProvider, ProviderKind,
    Result as FileResult,
};
pub use runtime::BoxFuture;
