//! Provider 查找表：按 ProviderKind 管理多个 FileProvider
//!
//! 其中一个 Provider 承载 workspaces 根目录

use crate::kernel::services::ports::file::{FileError, FileProvider, ProviderKind, Result};
use rustc_hash::FxHashMap;
use std::sync::Arc;

pub struct FileProviders {
    providers: FxHashMap<ProviderKind, Arc<dyn FileProvider>>,
    workspace_kind: ProviderKind,
}

impl FileProviders {
    pub fn new(workspace: Arc<dyn FileProvider>) -> Self {
        let workspace_kind = workspace.kind();
        let mut providers = FxHashMap::default();
        providers.insert(workspace_kind, workspace);
        Self {
            providers,
            workspace_kind,
        }
    }

    /// Adds a backend; a backend of the same kind is replaced.
    pub fn register(&mut self, provider: Arc<dyn FileProvider>) {
        let kind = provider.kind();
        if kind == self.workspace_kind {
            tracing::warn!(provider = %kind, "replacing workspace provider");
        }
        self.providers.insert(kind, provider);
    }

    pub fn with(mut self, provider: Arc<dyn FileProvider>) -> Self {
        self.register(provider);
        self
    }

    pub fn get(&self, kind: ProviderKind) -> Result<&Arc<dyn FileProvider>> {
        self.providers
            .get(&kind)
            .ok_or_else(|| FileError::ProviderNotFound(kind.to_string()))
    }

    pub fn workspace(&self) -> &Arc<dyn FileProvider> {
        &self.providers[&self.workspace_kind]
    }

    pub fn workspace_kind(&self) -> ProviderKind {
        self.workspace_kind
    }

    pub fn has_provider(&self, kind: ProviderKind) -> bool {
        self.providers.contains_key(&kind)
    }

    pub fn available_kinds(&self) -> Vec<ProviderKind> {
        ProviderKind::ALL
            .into_iter()
            .filter(|kind| self.providers.contains_key(kind))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProviderKind, &Arc<dyn FileProvider>)> {
        self.providers.iter().map(|(kind, provider)| (*kind, provider))
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/file/service.rs"]
mod tests;
