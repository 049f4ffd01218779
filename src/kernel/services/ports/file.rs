//! 文件系统 Provider trait
//!
//! 抽象存储后端（浏览器存储、本地守护进程、版本控制、代码片段），
//! 所有路径都是相对于 Provider 根目录的路径。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::{Component, Path};
use std::str::FromStr;
use tokio::sync::broadcast;

pub type Result<T> = std::result::Result<T, FileError>;

#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Already exists: {0}")]
    AlreadyExists(String),
    #[error("Not a directory: {0}")]
    NotADirectory(String),
    #[error("Not a file: {0}")]
    NotAFile(String),
    #[error("Invalid path: {0}")]
    InvalidPath(String),
    #[error("Provider is read-only: {0}")]
    ReadOnly(String),
    #[error("Provider not found: {0}")]
    ProviderNotFound(String),
    #[error("Provider disconnected: {0}")]
    Disconnected(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Browser,
    Localhost,
    VersionControl,
    Snippet,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::Browser,
        ProviderKind::Localhost,
        ProviderKind::VersionControl,
        ProviderKind::Snippet,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::Browser => "browser",
            ProviderKind::Localhost => "localhost",
            ProviderKind::VersionControl => "versioncontrol",
            ProviderKind::Snippet => "snippet",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = FileError;

    fn from_str(s: &str) -> Result<Self> {
        ProviderKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| FileError::ProviderNotFound(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Provider-relative path, no leading `/`.
    pub path: String,
    pub name: String,
    pub is_dir: bool,
}

impl DirEntry {
    pub fn new(path: impl Into<String>, is_dir: bool) -> Self {
        let path = path.into();
        let name = path.rsplit('/').next().unwrap_or_default().to_string();
        Self { path, name, is_dir }
    }
}

/// Notifications raised by a provider after its storage changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEvent {
    ExternallyChanged { path: String, content: String },
    Removed { path: String },
    Renamed { from: String, to: String, is_folder: bool },
    RenamedError { path: String, message: String },
    Added { path: String },
}

impl FileEvent {
    pub fn name(&self) -> &'static str {
        match self {
            FileEvent::ExternallyChanged { .. } => "fileExternallyChanged",
            FileEvent::Removed { .. } => "fileRemoved",
            FileEvent::Renamed { .. } => "fileRenamed",
            FileEvent::RenamedError { .. } => "fileRenamedError",
            FileEvent::Added { .. } => "fileAdded",
        }
    }
}

#[async_trait]
pub trait FileProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    fn readonly(&self) -> bool;

    fn base_path(&self) -> &str;

    /// Direct children of `path`, in the order the backend reports them.
    async fn resolve_directory(&self, path: &str) -> Result<Vec<DirEntry>>;

    async fn get(&self, path: &str) -> Result<String>;

    async fn set(&self, path: &str, content: &str) -> Result<()>;

    async fn remove(&self, path: &str) -> Result<()>;

    async fn rename(&self, from: &str, to: &str, is_folder: bool) -> Result<()>;

    async fn exists(&self, path: &str) -> Result<bool>;

    async fn create_dir(&self, path: &str) -> Result<()>;

    fn subscribe(&self) -> broadcast::Receiver<FileEvent>;
}

/// Strips leading/trailing separators and rejects parent or absolute components.
pub fn normalize_path(path: &str) -> Result<String> {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    let mut parts = Vec::new();
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().to_string()),
            Component::CurDir => {}
            _ => return Err(FileError::InvalidPath(path.to_string())),
        }
    }
    Ok(parts.join("/"))
}

pub fn join_path(parent: &str, name: &str) -> String {
    let parent = parent.trim_matches('/');
    let name = name.trim_matches('/');
    match (parent.is_empty(), name.is_empty()) {
        (true, _) => name.to_string(),
        (_, true) => parent.to_string(),
        _ => format!("{parent}/{name}"),
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/file.rs"]
mod tests;
