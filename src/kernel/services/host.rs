use std::sync::Arc;

use super::adapters::FileProviders;
use super::ports::PanelConfig;
use crate::kernel::file_manager::FileManager;

/// Handles shared by every core component, passed in at construction.
#[derive(Clone)]
pub struct PanelContext {
    providers: Arc<FileProviders>,
    file_manager: Arc<FileManager>,
    config: Arc<PanelConfig>,
}

impl PanelContext {
    pub fn new(providers: FileProviders, config: PanelConfig) -> Self {
        let providers = Arc::new(providers);
        let file_manager = Arc::new(FileManager::new(Arc::clone(&providers), &config));
        Self {
            providers,
            file_manager,
            config: Arc::new(config),
        }
    }

    pub fn providers(&self) -> &Arc<FileProviders> {
        &self.providers
    }

    pub fn file_manager(&self) -> &Arc<FileManager> {
        &self.file_manager
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }
}
