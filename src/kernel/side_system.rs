//! Subsystems whose state follows the active workspace's kind.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::kernel::error::PanelResult;

#[async_trait]
pub trait SideSystem: Send + Sync {
    fn name(&self) -> &str;

    async fn activate(&self) -> PanelResult<()>;

    async fn deactivate(&self) -> PanelResult<()>;

    async fn is_active(&self) -> bool;
}

/// Connection switch for the remote development daemon.
pub struct DaemonHandle {
    name: String,
    active: AtomicBool,
    activations: AtomicUsize,
}

impl DaemonHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: AtomicBool::new(false),
            activations: AtomicUsize::new(0),
        }
    }

    pub fn activations(&self) -> usize {
        self.activations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SideSystem for DaemonHandle {
    fn name(&self) -> &str {
        &self.name
    }

    async fn activate(&self) -> PanelResult<()> {
        if !self.active.swap(true, Ordering::SeqCst) {
            self.activations.fetch_add(1, Ordering::SeqCst);
            tracing::info!(side_system = %self.name, "activated");
        }
        Ok(())
    }

    async fn deactivate(&self) -> PanelResult<()> {
        if self.active.swap(false, Ordering::SeqCst) {
            tracing::info!(side_system = %self.name, "deactivated");
        }
        Ok(())
    }

    async fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/side_system.rs"]
mod tests;
