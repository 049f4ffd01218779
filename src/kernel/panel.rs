//! The file panel as seen by the host: lifecycle calls, host callbacks,
//! context menu registrations and the lifecycle event stream.

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::kernel::bootstrap::{self, BootstrapOutcome, BootstrapSignals, SnippetImporter};
use crate::kernel::context_menu::{ContextMenuRegistry, MenuItemDraft};
use crate::kernel::error::{PanelError, PanelResult};
use crate::kernel::profile::{PluginHost, PluginProfile, PROFILE};
use crate::kernel::request::PendingRequest;
use crate::kernel::services::{PanelContext, PanelEvent};
use crate::kernel::side_system::SideSystem;
use crate::kernel::workspace::{Workspace, WorkspaceManager};

pub struct FilePanel {
    workspaces: WorkspaceManager,
    menu: ContextMenuRegistry,
    request: Mutex<PendingRequest>,
    importer: Option<Arc<dyn SnippetImporter>>,
}

impl FilePanel {
    pub fn new(ctx: PanelContext, side_system: Arc<dyn SideSystem>) -> Self {
        let workspaces = WorkspaceManager::new(ctx, side_system);
        let menu = ContextMenuRegistry::new(workspaces.bus().clone());
        Self {
            workspaces,
            menu,
            request: Mutex::new(PendingRequest::default()),
            importer: None,
        }
    }

    pub fn with_importer(mut self, importer: Arc<dyn SnippetImporter>) -> Self {
        self.importer = Some(importer);
        self
    }

    pub fn context(&self) -> &PanelContext {
        self.workspaces.context()
    }

    pub fn workspaces(&self) -> &WorkspaceManager {
        &self.workspaces
    }

    pub fn menu(&self) -> &ContextMenuRegistry {
        &self.menu
    }

    pub fn profile(&self) -> &'static PluginProfile {
        &PROFILE
    }

    pub fn register_with(&self, host: &mut dyn PluginHost) {
        tracing::info!(profile = PROFILE.name, version = PROFILE.version, "registering panel");
        host.register(&PROFILE);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PanelEvent> {
        self.workspaces.subscribe()
    }

    pub fn set_request(&self, request: PendingRequest) {
        *self.request.lock() = request;
    }

    pub async fn create_new_file(&self) -> PanelResult<Option<String>> {
        let handler = self
            .request
            .lock()
            .create_new_file
            .clone()
            .ok_or(PanelError::NoHandler("createNewFile"))?;
        handler().await
    }

    pub async fn upload_file(&self) -> PanelResult<Vec<String>> {
        let handler = self
            .request
            .lock()
            .upload_file
            .clone()
            .ok_or(PanelError::NoHandler("uploadFile"))?;
        handler().await
    }

    /// Asks the host when it registered a handler, else answers from the
    /// last `set_workspace`.
    pub async fn get_current_workspace(&self) -> PanelResult<Option<Workspace>> {
        let handler = self.request.lock().get_workspaces.clone();
        if let Some(handler) = handler {
            return handler().await;
        }
        match self.workspaces.current() {
            Some(current) => Ok(Some(current)),
            None => Err(PanelError::NoHandler("getCurrentWorkspace")),
        }
    }

    pub async fn get_workspaces(&self) -> PanelResult<Vec<String>> {
        self.workspaces.get_workspaces().await
    }

    pub async fn create_workspace(&self, name: &str) -> PanelResult<()> {
        self.workspaces.create_workspace(name).await
    }

    pub async fn set_workspace(&self, workspace: Workspace) {
        self.workspaces.set_workspace(workspace).await;
    }

    pub fn workspace_renamed(&self, previous: &str, workspace: Workspace) {
        self.workspaces.workspace_renamed(previous, workspace);
    }

    pub fn workspace_deleted(&self, workspace: Workspace) {
        self.workspaces.workspace_deleted(workspace);
    }

    pub fn workspace_created(&self, workspace: Workspace) {
        self.workspaces.workspace_created(workspace);
    }

    pub fn register_context_menu_item(&self, item: Option<MenuItemDraft>) -> PanelResult<()> {
        self.menu.register(item)
    }

    pub async fn bootstrap(&self, signals: BootstrapSignals) -> BootstrapOutcome {
        bootstrap::bootstrap(&self.workspaces, signals, self.importer.as_deref()).await
    }

    /// Applies pending backend notifications to the open tabs.
    pub async fn sync_files(&self) -> usize {
        self.context().file_manager().sync().await
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/panel.rs"]
mod tests;
