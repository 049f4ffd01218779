//! Callbacks the host hands to the panel for work only it can do.

use std::future::Future;
use std::sync::Arc;

use crate::kernel::error::PanelResult;
use crate::kernel::services::ports::BoxFuture;
use crate::kernel::workspace::Workspace;

pub type RequestHandler<T> = Arc<dyn Fn() -> BoxFuture<PanelResult<T>> + Send + Sync>;

fn handler<T: 'static, F, Fut>(f: F) -> RequestHandler<T>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = PanelResult<T>> + Send + 'static,
{
    Arc::new(move || Box::pin(f()) as BoxFuture<PanelResult<T>>)
}

/// Replaced wholesale by the host whenever its view re-renders.
#[derive(Clone, Default)]
pub struct PendingRequest {
    /// Resolves to the created file path, if the user completed the prompt.
    pub create_new_file: Option<RequestHandler<Option<String>>>,
    /// Resolves to the uploaded file paths.
    pub upload_file: Option<RequestHandler<Vec<String>>>,
    pub get_workspaces: Option<RequestHandler<Option<Workspace>>>,
}

impl PendingRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_create_new_file<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = PanelResult<Option<String>>> + Send + 'static,
    {
        self.create_new_file = Some(handler(f));
        self
    }

    pub fn on_upload_file<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = PanelResult<Vec<String>>> + Send + 'static,
    {
        self.upload_file = Some(handler(f));
        self
    }

    pub fn on_get_workspaces<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = PanelResult<Option<Workspace>>> + Send + 'static,
    {
        self.get_workspaces = Some(handler(f));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.create_new_file.is_none() && self.upload_file.is_none() && self.get_workspaces.is_none()
    }
}

impl std::fmt::Debug for PendingRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingRequest")
            .field("create_new_file", &self.create_new_file.is_some())
            .field("upload_file", &self.upload_file.is_some())
            .field("get_workspaces", &self.get_workspaces.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/request.rs"]
mod tests;
