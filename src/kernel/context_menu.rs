//! Context menu actions registered by other plugins.
//!
//! The registry only grows. Every registration swaps in a new sequence, so a
//! snapshot taken by [`ContextMenuRegistry::items`] never changes under its
//! holder.

use parking_lot::Mutex;
use regex::Regex;
use serde::Deserialize;
use std::sync::Arc;

use crate::kernel::error::{PanelError, PanelResult};
use crate::kernel::services::{PanelBus, PanelEvent};

/// Menu item as sent by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MenuItemDraft {
    pub id: Option<String>,
    pub name: Option<String>,
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub kinds: Vec<String>,
    pub path: Vec<String>,
    pub extension: Vec<String>,
    pub pattern: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuTarget {
    File,
    Folder,
}

impl MenuTarget {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "file" => Some(Self::File),
            "folder" | "dir" | "directory" => Some(Self::Folder),
            _ => None,
        }
    }

    fn accepts(self, is_dir: bool) -> bool {
        match self {
            Self::File => !is_dir,
            Self::Folder => is_dir,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegisteredMenuItem {
    pub id: String,
    pub name: String,
    pub label: Option<String>,
    pub targets: Vec<MenuTarget>,
    pub paths: Vec<String>,
    pub extensions: Vec<String>,
    pub patterns: Vec<Regex>,
}

impl RegisteredMenuItem {
    fn from_draft(draft: MenuItemDraft) -> PanelResult<Self> {
        let id = required(draft.id, "id")?;
        let name = required(draft.name, "name")?;
        if draft.kinds.is_empty()
            && draft.path.is_empty()
            && draft.extension.is_empty()
            && draft.pattern.is_empty()
        {
            return Err(PanelError::InvalidArgument(format!(
                "menu item {id} has no matching criterion"
            )));
        }

        let targets = draft
            .kinds
            .iter()
            .map(|raw| {
                MenuTarget::parse(raw).ok_or_else(|| {
                    PanelError::InvalidArgument(format!("menu item {id}: unknown type {raw:?}"))
                })
            })
            .collect::<PanelResult<Vec<_>>>()?;
        let patterns = draft
            .pattern
            .iter()
            .map(|raw| {
                Regex::new(raw).map_err(|e| {
                    PanelError::InvalidArgument(format!("menu item {id}: bad pattern {raw:?}: {e}"))
                })
            })
            .collect::<PanelResult<Vec<_>>>()?;
        let extensions = draft
            .extension
            .into_iter()
            .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
            .collect();
        let paths = draft
            .path
            .into_iter()
            .map(|path| path.trim_matches('/').to_string())
            .collect();

        Ok(Self {
            id,
            name,
            label: draft.label,
            targets,
            paths,
            extensions,
            patterns,
        })
    }

    /// True when any criterion accepts the entry at `path`.
    pub fn matches(&self, path: &str, is_dir: bool) -> bool {
        let path = path.trim_matches('/');
        if self.targets.iter().any(|target| target.accepts(is_dir)) {
            return true;
        }
        if self.paths.iter().any(|candidate| candidate == path) {
            return true;
        }
        if !is_dir {
            let ext = path
                .rsplit_once('.')
                .map(|(_, ext)| ext.to_ascii_lowercase());
            if let Some(ext) = ext {
                if self.extensions.iter().any(|candidate| *candidate == ext) {
                    return true;
                }
            }
        }
        self.patterns.iter().any(|pattern| pattern.is_match(path))
    }
}

fn required(value: Option<String>, field: &str) -> PanelResult<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| PanelError::InvalidArgument(format!("menu item is missing {field}")))
}

pub struct ContextMenuRegistry {
    items: Mutex<Arc<Vec<RegisteredMenuItem>>>,
    bus: PanelBus,
}

impl ContextMenuRegistry {
    pub fn new(bus: PanelBus) -> Self {
        Self {
            items: Mutex::new(Arc::new(Vec::new())),
            bus,
        }
    }

    pub fn register(&self, item: Option<MenuItemDraft>) -> PanelResult<()> {
        let draft =
            item.ok_or_else(|| PanelError::InvalidArgument("menu item is absent".into()))?;
        let item = RegisteredMenuItem::from_draft(draft)?;

        let count = {
            let mut items = self.items.lock();
            if items.iter().any(|existing| existing.id == item.id) {
                return Err(PanelError::InvalidArgument(format!(
                    "menu item {} is already registered",
                    item.id
                )));
            }
            let mut next = Vec::with_capacity(items.len() + 1);
            next.extend(items.iter().cloned());
            tracing::debug!(id = %item.id, name = %item.name, "menu item registered");
            next.push(item);
            let count = next.len();
            *items = Arc::new(next);
            count
        };
        self.bus.publish(PanelEvent::MenuItemsChanged(count));
        Ok(())
    }

    pub fn items(&self) -> Arc<Vec<RegisteredMenuItem>> {
        self.items.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// Items to show for the entry at `path`, in registration order.
    pub fn matching(&self, path: &str, is_dir: bool) -> Vec<RegisteredMenuItem> {
        self.items()
            .iter()
            .filter(|item| item.matches(path, is_dir))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/context_menu.rs"]
mod tests;
