//! Headless file panel core (workspaces, providers, bootstrap).

pub mod bootstrap;
pub mod context_menu;
pub mod error;
pub mod file_manager;
pub mod panel;
pub mod profile;
pub mod request;
pub mod samples;
pub mod services;
pub mod side_system;
pub mod workspace;

pub use bootstrap::{BootstrapOutcome, BootstrapSignals, SnippetImporter};
pub use context_menu::{ContextMenuRegistry, MenuItemDraft, RegisteredMenuItem};
pub use error::{PanelError, PanelResult};
pub use file_manager::{FileManager, FileManagerEvent, OpenTab, TabId};
pub use panel::FilePanel;
pub use profile::{PluginHost, PluginProfile, PROFILE};
pub use request::PendingRequest;
pub use side_system::{DaemonHandle, SideSystem};
pub use workspace::{Workspace, WorkspaceManager};
