//! 本地文件系统 Provider
//!
//! 实现 FileProvider trait，所有路径都限制在根目录之下

use crate::kernel::services::ports::file::{
    join_path, normalize_path, DirEntry, FileError, FileEvent, FileProvider, ProviderKind, Result,
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 256;

pub struct LocalFileProvider {
    kind: ProviderKind,
    root: PathBuf,
    base_path: String,
    readonly: bool,
    events: broadcast::Sender<FileEvent>,
}

impl LocalFileProvider {
    pub fn new(kind: ProviderKind, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            kind,
            base_path: root.display().to_string(),
            root,
            readonly: false,
            events,
        }
    }

    pub fn with_readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<(String, PathBuf)> {
        let relative = normalize_path(path)?;
        let full = if relative.is_empty() {
            self.root.clone()
        } else {
            self.root.join(&relative)
        };
        Ok((relative, full))
    }

    fn ensure_writable(&self, path: &str) -> Result<()> {
        if self.readonly {
            return Err(FileError::ReadOnly(format!("{}/{}", self.kind, path)));
        }
        Ok(())
    }

    fn emit(&self, event: FileEvent) {
        tracing::trace!(provider = %self.kind, event = event.name(), "file event");
        let _ = self.events.send(event);
    }
}

async fn path_exists(path: &Path) -> Result<bool> {
    Ok(fs::try_exists(path).await?)
}

async fn is_dir(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|meta| meta.is_dir())
}

#[async_trait]
impl FileProvider for LocalFileProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn readonly(&self) -> bool {
        self.readonly
    }

    fn base_path(&self) -> &str {
        &self.base_path
    }

    async fn resolve_directory(&self, path: &str) -> Result<Vec<DirEntry>> {
        let (relative, full) = self.resolve(path)?;
        if !path_exists(&full).await? {
            return Err(FileError::NotFound(relative));
        }
        if !is_dir(&full).await {
            return Err(FileError::NotADirectory(relative));
        }

        let mut entries = Vec::new();
        let mut dir = fs::read_dir(&full).await?;
        while let Some(entry) = dir.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            let file_type = entry.file_type().await?;
            entries.push(DirEntry::new(join_path(&relative, &name), file_type.is_dir()));
        }

        entries.sort_by(|a, b| match (a.is_dir, b.is_dir) {
            (true, false) => std::cmp::Ordering::Less,
            (false, true) => std::cmp::Ordering::Greater,
            _ => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        });

        Ok(entries)
    }

    async fn get(&self, path: &str) -> Result<String> {
        let (relative, full) = self.resolve(path)?;
        if !path_exists(&full).await? {
            return Err(FileError::NotFound(relative));
        }
        if is_dir(&full).await {
            return Err(FileError::NotAFile(relative));
        }
        Ok(fs::read_to_string(&full).await?)
    }

    async fn set(&self, path: &str, content: &str) -> Result<()> {
        let (relative, full) = self.resolve(path)?;
        if relative.is_empty() {
            return Err(FileError::InvalidPath(path.to_string()));
        }
        self.ensure_writable(&relative)?;
        if is_dir(&full).await {
            return Err(FileError::NotAFile(relative));
        }

        let created = !path_exists(&full).await?;
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&full, content).await?;
        if created {
            self.emit(FileEvent::Added { path: relative });
        }
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<()> {
        let (relative, full) = self.resolve(path)?;
        if relative.is_empty() {
            return Err(FileError::InvalidPath(path.to_string()));
        }
        self.ensure_writable(&relative)?;
        if !path_exists(&full).await? {
            return Err(FileError::NotFound(relative));
        }

        if is_dir(&full).await {
            fs::remove_dir_all(&full).await?;
        } else {
            fs::remove_file(&full).await?;
        }
        self.emit(FileEvent::Removed { path: relative });
        Ok(())
    }

    async fn rename(&self, from: &str, to: &str, is_folder: bool) -> Result<()> {
        let (from_rel, from_full) = self.resolve(from)?;
        let (to_rel, to_full) = self.resolve(to)?;
        if from_rel.is_empty() || to_rel.is_empty() {
            return Err(FileError::InvalidPath(format!("{from} -> {to}")));
        }
        self.ensure_writable(&from_rel)?;

        let outcome = async {
            if !path_exists(&from_full).await? {
                return Err(FileError::NotFound(from_rel.clone()));
            }
            if path_exists(&to_full).await? {
                return Err(FileError::AlreadyExists(to_rel.clone()));
            }
            if let Some(parent) = to_full.parent() {
                fs::create_dir_all(parent).await.map_err(FileError::from)?;
            }
            fs::rename(&from_full, &to_full).await.map_err(FileError::from)
        }
        .await;

        match outcome {
            Ok(()) => {
                self.emit(FileEvent::Renamed {
                    from: from_rel,
                    to: to_rel,
                    is_folder,
                });
                Ok(())
            }
            Err(error) => {
                self.emit(FileEvent::RenamedError {
                    path: from_rel,
                    message: error.to_string(),
                });
                Err(error)
            }
        }
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        let (_, full) = self.resolve(path)?;
        path_exists(&full).await
    }

    async fn create_dir(&self, path: &str) -> Result<()> {
        let (relative, full) = self.resolve(path)?;
        self.ensure_writable(&relative)?;
        if path_exists(&full).await? {
            return Err(FileError::AlreadyExists(relative));
        }
        fs::create_dir_all(&full).await?;
        self.emit(FileEvent::Added { path: relative });
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<FileEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/file/local.rs"]
mod tests;
