//! Workspace lifecycle: creation, enumeration, activation and change relays.
//!
//! A workspace is a folder directly under the configured workspaces root of
//! the workspace provider. Callers await each lifecycle call before issuing
//! the next one; two concurrent `create_workspace` calls for the same name
//! are not serialized here.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::kernel::error::{PanelError, PanelResult};
use crate::kernel::samples::{starter_files, StarterFile};
use crate::kernel::services::ports::{join_path, normalize_path, FileError, ProviderKind};
use crate::kernel::services::{PanelBus, PanelContext, PanelEvent};
use crate::kernel::side_system::SideSystem;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub name: String,
    #[serde(default)]
    pub is_localhost: bool,
}

impl Workspace {
    pub fn new(name: impl Into<String>, is_localhost: bool) -> Self {
        Self {
            name: name.into(),
            is_localhost,
        }
    }
}

#[derive(Debug, Default)]
struct WorkspaceState {
    known: Vec<String>,
    current: Option<Workspace>,
}

pub struct WorkspaceManager {
    ctx: PanelContext,
    bus: PanelBus,
    side_system: Arc<dyn SideSystem>,
    catalog: Vec<StarterFile>,
    state: Mutex<WorkspaceState>,
}

impl WorkspaceManager {
    pub fn new(ctx: PanelContext, side_system: Arc<dyn SideSystem>) -> Self {
        let bus = PanelBus::new(ctx.config().event_capacity);
        Self {
            ctx,
            bus,
            side_system,
            catalog: starter_files(),
            state: Mutex::new(WorkspaceState::default()),
        }
    }

    pub fn with_catalog(mut self, catalog: Vec<StarterFile>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn context(&self) -> &PanelContext {
        &self.ctx
    }

    pub fn bus(&self) -> &PanelBus {
        &self.bus
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PanelEvent> {
        self.bus.subscribe()
    }

    pub fn workspaces(&self) -> Vec<String> {
        self.state.lock().known.clone()
    }

    pub fn current(&self) -> Option<Workspace> {
        self.state.lock().current.clone()
    }

    /// Creates the workspace folder, then writes every starter file into it.
    ///
    /// A starter file that cannot be written is logged and skipped.
    pub async fn create_workspace(&self, name: &str) -> PanelResult<()> {
        let name = name.trim();
        // A single plain path segment; `.` and `..` would address the root.
        let plain = normalize_path(name).is_ok_and(|normalized| normalized == name);
        if name.is_empty() || name.contains('/') || !plain {
            return Err(PanelError::InvalidArgument(format!(
                "invalid workspace name: {name:?}"
            )));
        }

        let file_manager = self.ctx.file_manager();
        if file_manager.workspace_exists(name).await? {
            return Err(PanelError::AlreadyExists(name.to_string()));
        }
        file_manager
            .create_workspace(name)
            .await
            .map_err(|error| match error {
                FileError::AlreadyExists(_) => PanelError::AlreadyExists(name.to_string()),
                other => PanelError::File(other),
            })?;
        tracing::info!(workspace = %name, "workspace created");

        let root = file_manager.workspace_path(name);
        for file in &self.catalog {
            let path = join_path(&root, &file.name);
            if let Err(source) = file_manager.write_file(&path, &file.content).await {
                let error = PanelError::WriteFailure { path, source };
                tracing::error!(workspace = %name, error = %error, "skipping starter file");
            }
        }
        Ok(())
    }

    /// Lists the folders under the workspaces root, in provider order.
    pub async fn get_workspaces(&self) -> PanelResult<Vec<String>> {
        let config = self.ctx.config();
        let root = format!("/{}", config.workspaces_path.trim_matches('/'));
        let prefix = config.workspaces_prefix();

        let listing = self
            .ctx
            .providers()
            .workspace()
            .resolve_directory(&root)
            .await;
        let entries = match listing {
            Ok(entries) => entries,
            Err(FileError::NotFound(_)) => Vec::new(),
            Err(source) => {
                let error = PanelError::Resolution { path: root, source };
                tracing::error!(error = %error, "failed to list workspaces");
                return Err(error);
            }
        };

        let workspaces: Vec<String> = entries
            .into_iter()
            .filter(|entry| entry.is_dir)
            .map(|entry| match entry.path.strip_prefix(prefix.as_str()) {
                Some(name) => name.to_string(),
                None => entry.path,
            })
            .collect();

        self.state.lock().known = workspaces.clone();
        self.bus
            .publish(PanelEvent::WorkspacesListed(workspaces.clone()));
        Ok(workspaces)
    }

    fn provider_of(&self, workspace: &Workspace) -> ProviderKind {
        if workspace.is_localhost {
            ProviderKind::Localhost
        } else {
            self.ctx.providers().workspace_kind()
        }
    }

    /// Makes `workspace` the active one.
    ///
    /// Called after the host already switched, so side system failures are
    /// logged and the switch is still announced.
    pub async fn set_workspace(&self, workspace: Workspace) {
        let previous = self.state.lock().current.clone();
        let detached = previous
            .as_ref()
            .map(|previous| self.provider_of(previous))
            .unwrap_or_else(|| self.ctx.providers().workspace_kind());
        self.ctx.file_manager().remove_tabs_of(detached);

        let side_system = &self.side_system;
        let result = if workspace.is_localhost {
            if side_system.is_active().await {
                Ok(())
            } else {
                side_system.activate().await
            }
        } else if side_system.is_active().await {
            side_system.deactivate().await
        } else {
            Ok(())
        };
        if let Err(error) = result {
            tracing::error!(
                side_system = side_system.name(),
                workspace = %workspace.name,
                error = %error,
                "side system switch failed"
            );
        }

        tracing::info!(workspace = %workspace.name, localhost = workspace.is_localhost, "workspace set");
        self.state.lock().current = Some(workspace.clone());
        self.bus.publish(PanelEvent::SetWorkspace(workspace));
    }

    pub fn workspace_renamed(&self, previous: &str, workspace: Workspace) {
        {
            let mut state = self.state.lock();
            if let Some(slot) = state.known.iter_mut().find(|name| *name == previous) {
                *slot = workspace.name.clone();
            }
            if let Some(current) = state.current.as_mut() {
                if current.name == previous {
                    current.name = workspace.name.clone();
                }
            }
        }
        self.bus.publish(PanelEvent::RenameWorkspace(workspace));
    }

    pub fn workspace_deleted(&self, workspace: Workspace) {
        {
            let mut state = self.state.lock();
            state.known.retain(|name| *name != workspace.name);
            if state
                .current
                .as_ref()
                .is_some_and(|current| current.name == workspace.name)
            {
                state.current = None;
            }
        }
        self.bus.publish(PanelEvent::DeleteWorkspace(workspace));
    }

    pub fn workspace_created(&self, workspace: Workspace) {
        {
            let mut state = self.state.lock();
            if !state.known.contains(&workspace.name) {
                state.known.push(workspace.name.clone());
            }
        }
        self.bus.publish(PanelEvent::CreateWorkspace(workspace));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/workspace.rs"]
mod tests;
