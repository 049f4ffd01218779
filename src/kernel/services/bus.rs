use serde::Serialize;
use tokio::sync::broadcast;

use crate::kernel::workspace::Workspace;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum PanelEvent {
    SetWorkspace(Workspace),
    RenameWorkspace(Workspace),
    DeleteWorkspace(Workspace),
    CreateWorkspace(Workspace),
    /// The known-workspaces sequence was refreshed.
    WorkspacesListed(Vec<String>),
    /// Registered menu items changed; carries the new item count.
    MenuItemsChanged(usize),
}

impl PanelEvent {
    pub fn name(&self) -> &'static str {
        match self {
            PanelEvent::SetWorkspace(_) => "setWorkspace",
            PanelEvent::RenameWorkspace(_) => "renameWorkspace",
            PanelEvent::DeleteWorkspace(_) => "deleteWorkspace",
            PanelEvent::CreateWorkspace(_) => "createWorkspace",
            PanelEvent::WorkspacesListed(_) => "workspacesListed",
            PanelEvent::MenuItemsChanged(_) => "menuItemsChanged",
        }
    }

    pub fn is_lifecycle(&self) -> bool {
        matches!(
            self,
            PanelEvent::SetWorkspace(_)
                | PanelEvent::RenameWorkspace(_)
                | PanelEvent::DeleteWorkspace(_)
                | PanelEvent::CreateWorkspace(_)
        )
    }
}

#[derive(Clone)]
pub struct PanelBus {
    sender: broadcast::Sender<PanelEvent>,
}

impl PanelBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PanelEvent> {
        self.sender.subscribe()
    }

    /// Publishes to current subscribers; returns how many received it.
    pub fn publish(&self, event: PanelEvent) -> usize {
        tracing::debug!(event = event.name(), "panel event");
        self.sender.send(event).unwrap_or(0)
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/services/bus.rs"]
mod tests;
