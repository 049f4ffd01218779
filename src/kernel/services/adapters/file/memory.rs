//! 内存文件 Provider
//!
//! 浏览器存储的替身：有序的内存目录树，支持只读模式

use crate::kernel::services::ports::file::{
    join_path, normalize_path, DirEntry, FileError, FileEvent, FileProvider, ProviderKind, Result,
};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Dir,
    File(String),
}

pub struct MemoryFileProvider {
    kind: ProviderKind,
    readonly: bool,
    base_path: String,
    nodes: RwLock<BTreeMap<String, Node>>,
    events: broadcast::Sender<FileEvent>,
}

impl MemoryFileProvider {
    pub fn new(kind: ProviderKind) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            kind,
            readonly: false,
            base_path: kind.as_str().to_string(),
            nodes: RwLock::new(BTreeMap::new()),
            events,
        }
    }

    pub fn new_readonly(kind: ProviderKind) -> Self {
        Self {
            readonly: true,
            ..Self::new(kind)
        }
    }

    /// Seeds a file without raising notifications, ignoring the read-only flag.
    pub fn with_file(self, path: &str, content: &str) -> Result<Self> {
        let path = normalize_path(path)?;
        {
            let mut nodes = self.nodes.write();
            insert_parents(&mut nodes, &path)?;
            nodes.insert(path, Node::File(content.to_string()));
        }
        Ok(self)
    }

    /// Replaces file content the way an out-of-band writer would.
    pub fn notify_external_change(&self, path: &str, content: &str) -> Result<()> {
        let path = normalize_path(path)?;
        {
            let mut nodes = self.nodes.write();
            match nodes.get(&path) {
                Some(Node::File(_)) => {
                    nodes.insert(path.clone(), Node::File(content.to_string()));
                }
                Some(Node::Dir) => return Err(FileError::NotAFile(path)),
                None => return Err(FileError::NotFound(path)),
            }
        }
        self.emit(FileEvent::ExternallyChanged {
            path,
            content: content.to_string(),
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.read().is_empty()
    }

    fn emit(&self, event: FileEvent) {
        tracing::trace!(provider = %self.kind, event = event.name(), "file event");
        let _ = self.events.send(event);
    }

    fn ensure_writable(&self, path: &str) -> Result<()> {
        if self.readonly {
            return Err(FileError::ReadOnly(format!("{}/{}", self.kind, path)));
        }
        Ok(())
    }
}

fn insert_parents(nodes: &mut BTreeMap<String, Node>, path: &str) -> Result<()> {
    let mut current = String::new();
    let mut parts = path.split('/').peekable();
    while let Some(part) = parts.next() {
        if parts.peek().is_none() {
            break;
        }
        current = join_path(&current, part);
        match nodes.get(&current) {
            Some(Node::File(_)) => return Err(FileError::NotADirectory(current)),
            Some(Node::Dir) => {}
            None => {
                nodes.insert(current.clone(), Node::Dir);
            }
        }
    }
    Ok(())
}

fn is_within(key: &str, root: &str) -> bool {
    key == root
        || key
            .strip_prefix(root)
            .is_some_and(|rest| rest.starts_with('/'))
}

#[async_trait]
impl FileProvider for MemoryFileProvider {
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
        let path = normalize_path(path)?;
        let nodes = self.nodes.read();
        if !path.is_empty() {
            match nodes.get(&path) {
                Some(Node::Dir) => {}
                Some(Node::File(_)) => return Err(FileError::NotADirectory(path)),
                None => return Err(FileError::NotFound(path)),
            }
        }

        let prefix = if path.is_empty() {
            String::new()
        } else {
            format!("{path}/")
        };
        let entries = nodes
            .iter()
            .filter_map(|(key, node)| {
                let rest = key.strip_prefix(prefix.as_str())?;
                if rest.is_empty() || rest.contains('/') {
                    return None;
                }
                Some(DirEntry::new(key.clone(), matches!(node, Node::Dir)))
            })
            .collect();
        Ok(entries)
    }

    async fn get(&self, path: &str) -> Result<String> {
        let path = normalize_path(path)?;
        match self.nodes.read().get(&path) {
            Some(Node::File(content)) => Ok(content.clone()),
            Some(Node::Dir) => Err(FileError::NotAFile(path)),
            None => Err(FileError::NotFound(path)),
        }
    }

    async fn set(&self, path: &str, content: &str) -> Result<()> {
        let path = normalize_path(path)?;
        if path.is_empty() {
            return Err(FileError::InvalidPath("/".to_string()));
        }
        self.ensure_writable(&path)?;

        let created = {
            let mut nodes = self.nodes.write();
            if matches!(nodes.get(&path), Some(Node::Dir)) {
                return Err(FileError::NotAFile(path));
            }
            insert_parents(&mut nodes, &path)?;
            nodes
                .insert(path.clone(), Node::File(content.to_string()))
                .is_none()
        };
        if created {
            self.emit(FileEvent::Added { path });
        }
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<()> {
        let path = normalize_path(path)?;
        if path.is_empty() {
            return Err(FileError::InvalidPath("/".to_string()));
        }
        self.ensure_writable(&path)?;

        {
            let mut nodes = self.nodes.write();
            if !nodes.contains_key(&path) {
                return Err(FileError::NotFound(path));
            }
            nodes.retain(|key, _| !is_within(key, &path));
        }
        self.emit(FileEvent::Removed { path });
        Ok(())
    }

    async fn rename(&self, from: &str, to: &str, is_folder: bool) -> Result<()> {
        let from = normalize_path(from)?;
        let to = normalize_path(to)?;
        if from.is_empty() || to.is_empty() || is_within(&to, &from) {
            return Err(FileError::InvalidPath(format!("{from} -> {to}")));
        }
        self.ensure_writable(&from)?;

        let outcome = {
            let mut nodes = self.nodes.write();
            if !nodes.contains_key(&from) {
                Err(FileError::NotFound(from.clone()))
            } else if nodes.contains_key(&to) {
                Err(FileError::AlreadyExists(to.clone()))
            } else {
                insert_parents(&mut nodes, &to).map(|()| {
                    let moved: Vec<String> = nodes
                        .keys()
                        .filter(|key| is_within(key, &from))
                        .cloned()
                        .collect();
                    for key in moved {
                        if let Some(node) = nodes.remove(&key) {
                            let target = format!("{to}{}", &key[from.len()..]);
                            nodes.insert(target, node);
                        }
                    }
                })
            }
        };

        match outcome {
            Ok(()) => {
                self.emit(FileEvent::Renamed {
                    from,
                    to,
                    is_folder,
                });
                Ok(())
            }
            Err(error) => {
                self.emit(FileEvent::RenamedError {
                    path: from,
                    message: error.to_string(),
                });
                Err(error)
            }
        }
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        let path = normalize_path(path)?;
        Ok(path.is_empty() || self.nodes.read().contains_key(&path))
    }

    async fn create_dir(&self, path: &str) -> Result<()> {
        let path = normalize_path(path)?;
        if path.is_empty() {
            return Err(FileError::AlreadyExists("/".to_string()));
        }
        self.ensure_writable(&path)?;

        {
            let mut nodes = self.nodes.write();
            if nodes.contains_key(&path) {
                return Err(FileError::AlreadyExists(path));
            }
            insert_parents(&mut nodes, &path)?;
            nodes.insert(path.clone(), Node::Dir);
        }
        self.emit(FileEvent::Added { path });
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<FileEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/file/memory.rs"]
mod tests;
