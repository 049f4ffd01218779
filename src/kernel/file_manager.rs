//! Open tabs and the current file, kept consistent with every backend.
//!
//! Files are addressed as `<kind>/<provider path>`, e.g.
//! `browser/.workspaces/default_workspace/README.txt`.

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::kernel::services::adapters::FileProviders;
use crate::kernel::services::ports::{
    join_path, normalize_path, FileError, FileEvent, FileProvider, FileResult, PanelConfig,
    ProviderKind,
};

const EVENT_CAPACITY: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabId(u64);

impl TabId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenTab {
    pub id: TabId,
    pub provider: ProviderKind,
    /// Full `<kind>/<path>` address.
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileManagerEvent {
    CurrentFileChanged(String),
    FileClosed(String),
    NoFileSelected,
    FileExternallyChanged(String),
}

#[derive(Debug, Default)]
struct TabsState {
    tabs: Vec<OpenTab>,
    current: Option<String>,
    next_tab_id: u64,
}

impl TabsState {
    fn alloc_tab_id(&mut self) -> TabId {
        self.next_tab_id = self.next_tab_id.saturating_add(1);
        TabId::new(self.next_tab_id)
    }

    /// Drops tabs matching `pred`; returns closed paths and whether the current file went with them.
    fn close_where(&mut self, pred: impl Fn(&OpenTab) -> bool) -> (Vec<String>, bool) {
        let mut closed = Vec::new();
        self.tabs.retain(|tab| {
            if pred(tab) {
                closed.push(tab.path.clone());
                false
            } else {
                true
            }
        });
        let current_closed = self
            .current
            .as_ref()
            .is_some_and(|current| closed.contains(current));
        if current_closed {
            self.current = None;
        }
        (closed, current_closed)
    }
}

pub fn full_path(kind: ProviderKind, path: &str) -> String {
    join_path(kind.as_str(), path)
}

/// Splits `<kind>/<path>` into the backend kind and its provider-relative path.
pub fn split_path(path: &str) -> FileResult<(ProviderKind, String)> {
    let trimmed = path.trim_start_matches('/');
    let (prefix, rest) = trimmed.split_once('/').unwrap_or((trimmed, ""));
    let kind = prefix.parse::<ProviderKind>()?;
    Ok((kind, normalize_path(rest)?))
}

fn moved_path(path: &str, from: &str, to: &str) -> Option<String> {
    if path == from {
        return Some(to.to_string());
    }
    let rest = path.strip_prefix(from)?.strip_prefix('/')?;
    Some(join_path(to, rest))
}

fn is_within(path: &str, root: &str) -> bool {
    moved_path(path, root, root).is_some()
}

pub struct FileManager {
    providers: Arc<FileProviders>,
    workspaces_path: String,
    state: Mutex<TabsState>,
    listeners: Mutex<Vec<(ProviderKind, broadcast::Receiver<FileEvent>)>>,
    /// Backends whose notifications overflowed since the last resync.
    stale: Mutex<Vec<ProviderKind>>,
    events: broadcast::Sender<FileManagerEvent>,
}

impl FileManager {
    /// Subscribes to every registered backend.
    pub fn new(providers: Arc<FileProviders>, config: &PanelConfig) -> Self {
        let listeners = providers
            .iter()
            .map(|(kind, provider)| (kind, provider.subscribe()))
            .collect();
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            providers,
            workspaces_path: normalize_path(&config.workspaces_path).unwrap_or_default(),
            state: Mutex::new(TabsState::default()),
            listeners: Mutex::new(listeners),
            stale: Mutex::new(Vec::new()),
            events,
        }
    }

    pub fn providers(&self) -> &Arc<FileProviders> {
        &self.providers
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FileManagerEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: FileManagerEvent) {
        let _ = self.events.send(event);
    }

    fn provider_of(&self, path: &str) -> FileResult<(&Arc<dyn FileProvider>, String)> {
        let (kind, relative) = split_path(path)?;
        Ok((self.providers.get(kind)?, relative))
    }

    pub async fn read_file(&self, path: &str) -> FileResult<String> {
        let (provider, relative) = self.provider_of(path)?;
        provider.get(&relative).await
    }

    pub async fn write_file(&self, path: &str, content: &str) -> FileResult<()> {
        let (provider, relative) = self.provider_of(path)?;
        if provider.readonly() {
            return Err(FileError::ReadOnly(path.to_string()));
        }
        provider.set(&relative, content).await
    }

    pub async fn exists(&self, path: &str) -> FileResult<bool> {
        let (provider, relative) = self.provider_of(path)?;
        provider.exists(&relative).await
    }

    /// Opens (or focuses) a tab for an existing file and makes it current.
    pub async fn open_file(&self, path: &str) -> FileResult<()> {
        let (provider, relative) = self.provider_of(path)?;
        if !provider.exists(&relative).await? {
            return Err(FileError::NotFound(path.to_string()));
        }
        provider.get(&relative).await?;

        let kind = provider.kind();
        let path = full_path(kind, &relative);
        let changed = {
            let mut state = self.state.lock();
            if !state.tabs.iter().any(|tab| tab.path == path) {
                let id = state.alloc_tab_id();
                state.tabs.push(OpenTab {
                    id,
                    provider: kind,
                    path: path.clone(),
                });
            }
            let changed = state.current.as_deref() != Some(path.as_str());
            state.current = Some(path.clone());
            changed
        };
        if changed {
            tracing::debug!(path = %path, "current file changed");
            self.emit(FileManagerEvent::CurrentFileChanged(path));
        }
        Ok(())
    }

    pub fn close_file(&self, path: &str) -> bool {
        let (closed, current_closed) = self.state.lock().close_where(|tab| tab.path == path);
        self.announce_closed(closed.clone(), current_closed);
        !closed.is_empty()
    }

    pub fn current_file(&self) -> Option<String> {
        self.state.lock().current.clone()
    }

    pub fn open_tabs(&self) -> Vec<OpenTab> {
        self.state.lock().tabs.clone()
    }

    /// Closes every tab backed by `kind`; returns how many were closed.
    pub fn remove_tabs_of(&self, kind: ProviderKind) -> usize {
        let (closed, current_closed) = self.state.lock().close_where(|tab| tab.provider == kind);
        let count = closed.len();
        if count > 0 {
            tracing::debug!(provider = %kind, count, "detached tabs");
        }
        self.announce_closed(closed, current_closed);
        count
    }

    fn announce_closed(&self, closed: Vec<String>, current_closed: bool) {
        for path in closed {
            self.emit(FileManagerEvent::FileClosed(path));
        }
        if current_closed {
            self.emit(FileManagerEvent::NoFileSelected);
        }
    }

    pub fn workspace_dir(&self, name: &str) -> String {
        join_path(&self.workspaces_path, name)
    }

    /// Full address of a workspace folder on the workspace provider.
    pub fn workspace_path(&self, name: &str) -> String {
        full_path(self.providers.workspace_kind(), &self.workspace_dir(name))
    }

    pub async fn workspace_exists(&self, name: &str) -> FileResult<bool> {
        self.providers
            .workspace()
            .exists(&self.workspace_dir(name))
            .await
    }

    pub async fn create_workspace(&self, name: &str) -> FileResult<()> {
        let name = normalize_path(name)?;
        if name.is_empty() || name.contains('/') {
            return Err(FileError::InvalidPath(name));
        }
        self.providers
            .workspace()
            .create_dir(&self.workspace_dir(&name))
            .await
    }

    /// Applies every pending backend notification; returns how many were handled.
    ///
    /// A backend that dropped notifications is marked stale; [`Self::resync`]
    /// re-checks its tabs.
    pub fn drain_events(&self) -> usize {
        let mut pending = Vec::new();
        let mut lagged = Vec::new();
        {
            let mut listeners = self.listeners.lock();
            for (kind, rx) in listeners.iter_mut() {
                loop {
                    match rx.try_recv() {
                        Ok(event) => pending.push((*kind, event)),
                        Err(TryRecvError::Lagged(skipped)) => {
                            tracing::warn!(provider = %kind, skipped, "dropped file events");
                            lagged.push(*kind);
                        }
                        Err(TryRecvError::Empty | TryRecvError::Closed) => break,
                    }
                }
            }
        }

        if !lagged.is_empty() {
            let mut stale = self.stale.lock();
            for kind in lagged {
                if !stale.contains(&kind) {
                    stale.push(kind);
                }
            }
        }

        let count = pending.len();
        for (kind, event) in pending {
            self.handle_event(kind, event);
        }
        count
    }

    pub fn needs_resync(&self) -> bool {
        !self.stale.lock().is_empty()
    }

    /// Closes tabs of stale backends whose file is gone; returns how many were closed.
    pub async fn resync(&self) -> usize {
        let kinds = std::mem::take(&mut *self.stale.lock());
        let mut total = 0;
        for kind in kinds {
            let Ok(provider) = self.providers.get(kind) else {
                continue;
            };
            let tabs: Vec<OpenTab> = self
                .state
                .lock()
                .tabs
                .iter()
                .filter(|tab| tab.provider == kind)
                .cloned()
                .collect();

            let mut missing = Vec::new();
            for tab in tabs {
                match provider.exists(&rel(&tab)).await {
                    Ok(true) => {}
                    Ok(false) => missing.push(tab.path),
                    Err(error) => {
                        tracing::warn!(provider = %kind, path = %tab.path, error = %error, "resync check failed");
                    }
                }
            }
            if missing.is_empty() {
                continue;
            }

            let (closed, current_closed) = self
                .state
                .lock()
                .close_where(|tab| tab.provider == kind && missing.contains(&tab.path));
            tracing::info!(provider = %kind, count = closed.len(), "resynced tabs");
            total += closed.len();
            self.announce_closed(closed, current_closed);
        }
        total
    }

    /// Drains pending notifications, then resyncs any backend that overflowed.
    pub async fn sync(&self) -> usize {
        let handled = self.drain_events();
        if self.needs_resync() {
            self.resync().await;
        }
        handled
    }

    pub fn handle_event(&self, kind: ProviderKind, event: FileEvent) {
        match event {
            FileEvent::Renamed { from, to, .. } => self.on_renamed(kind, &from, &to),
            FileEvent::Removed { path } => {
                let (closed, current_closed) = self
                    .state
                    .lock()
                    .close_where(|tab| tab.provider == kind && is_within(&rel(tab), &path));
                self.announce_closed(closed, current_closed);
            }
            FileEvent::ExternallyChanged { path, .. } => {
                let path = full_path(kind, &path);
                let open = self.state.lock().tabs.iter().any(|tab| tab.path == path);
                if open {
                    self.emit(FileManagerEvent::FileExternallyChanged(path));
                }
            }
            FileEvent::RenamedError { path, message } => {
                tracing::warn!(provider = %kind, path = %path, error = %message, "rename failed");
            }
            FileEvent::Added { path } => {
                tracing::trace!(provider = %kind, path = %path, "file added");
            }
        }
    }

    fn on_renamed(&self, kind: ProviderKind, from: &str, to: &str) {
        let current_moved = {
            let mut state = self.state.lock();
            for tab in state.tabs.iter_mut().filter(|tab| tab.provider == kind) {
                if let Some(moved) = moved_path(&rel(tab), from, to) {
                    tab.path = full_path(kind, &moved);
                }
            }
            let moved = state.current.as_deref().and_then(|current| {
                let (current_kind, relative) = split_path(current).ok()?;
                if current_kind != kind {
                    return None;
                }
                moved_path(&relative, from, to).map(|moved| full_path(kind, &moved))
            });
            if let Some(path) = &moved {
                state.current = Some(path.clone());
            }
            moved
        };
        if let Some(path) = current_moved {
            self.emit(FileManagerEvent::CurrentFileChanged(path));
        }
    }
}

fn rel(tab: &OpenTab) -> String {
    tab.path
        .strip_prefix(tab.provider.as_str())
        .map(|rest| rest.trim_start_matches('/').to_string())
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/file_manager.rs"]
mod tests;
