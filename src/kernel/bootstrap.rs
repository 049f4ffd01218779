//! First workspace shown when the panel loads.
//!
//! Signals are checked in order and the first present one wins: a snippet
//! reference, then an inline base64 source payload, then the plain start
//! where an empty store gets the default workspace.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::kernel::error::{PanelError, PanelResult};
use crate::kernel::file_manager::FileManager;
use crate::kernel::services::ports::{join_path, CodeSampleConfig};
use crate::kernel::workspace::{Workspace, WorkspaceManager};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BootstrapSignals {
    #[serde(alias = "gist")]
    pub snippet: Option<String>,
    /// Base64 encoded source text.
    pub code: Option<String>,
}

impl BootstrapSignals {
    /// Picks the recognized keys out of query-style pairs; the last value wins.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut signals = Self::default();
        for (key, value) in pairs {
            let value = value.into();
            if value.trim().is_empty() {
                continue;
            }
            match key.as_ref() {
                "gist" | "snippet" => signals.snippet = Some(value),
                "code" => signals.code = Some(value),
                _ => {}
            }
        }
        signals
    }

    pub fn is_empty(&self) -> bool {
        self.snippet.is_none() && self.code.is_none()
    }
}

/// Loads a shared snippet into the workspace store.
#[async_trait]
pub trait SnippetImporter: Send + Sync {
    async fn import(&self, snippet: &str, file_manager: &FileManager) -> PanelResult<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// A snippet reference was present; nothing else ran.
    Snippet { imported: bool },
    /// The payload was written and opened at `path`.
    CodeSample { path: String },
    CodeSampleFailed,
    DefaultCreated,
    /// The store was left as it was and only enumerated.
    Existing,
}

/// `<prefix><first hex digits of sha256(payload)><extension>`.
pub fn code_sample_filename(payload: &str, config: &CodeSampleConfig) -> String {
    let digest = hex::encode(Sha256::digest(payload.as_bytes()));
    let len = config.hash_prefix_len.min(digest.len());
    format!("{}{}{}", config.file_prefix, &digest[..len], config.extension)
}

pub async fn bootstrap(
    manager: &WorkspaceManager,
    signals: BootstrapSignals,
    importer: Option<&dyn SnippetImporter>,
) -> BootstrapOutcome {
    if let Some(snippet) = signals.snippet {
        let Some(importer) = importer else {
            tracing::warn!(snippet = %snippet, "no snippet importer registered");
            return BootstrapOutcome::Snippet { imported: false };
        };
        let file_manager = manager.context().file_manager();
        return match importer.import(&snippet, file_manager).await {
            Ok(()) => {
                tracing::info!(snippet = %snippet, "snippet imported");
                BootstrapOutcome::Snippet { imported: true }
            }
            Err(error) => {
                tracing::error!(snippet = %snippet, error = %error, "snippet import failed");
                BootstrapOutcome::Snippet { imported: false }
            }
        };
    }

    if let Some(code) = signals.code {
        return match load_code_sample(manager, &code).await {
            Ok(path) => BootstrapOutcome::CodeSample { path },
            Err(error) => {
                tracing::error!(error = %error, "failed to load code sample");
                BootstrapOutcome::CodeSampleFailed
            }
        };
    }

    let outcome = seed_default(manager).await;
    if let Err(error) = manager.get_workspaces().await {
        tracing::error!(error = %error, "failed to publish workspaces");
    }
    outcome
}

async fn load_code_sample(manager: &WorkspaceManager, payload: &str) -> PanelResult<String> {
    let config = &manager.context().config().code_sample;
    let file_manager = manager.context().file_manager();
    let name = config.workspace.as_str();

    if !file_manager.workspace_exists(name).await? {
        file_manager.create_workspace(name).await?;
    }

    let path = join_path(
        &file_manager.workspace_path(name),
        &code_sample_filename(payload, config),
    );
    let decoded = BASE64
        .decode(payload.trim())
        .map_err(|e| PanelError::InvalidArgument(format!("code payload is not base64: {e}")))?;
    let content = String::from_utf8_lossy(&decoded);
    file_manager
        .write_file(&path, &content)
        .await
        .map_err(|source| PanelError::WriteFailure {
            path: path.clone(),
            source,
        })?;

    manager.set_workspace(Workspace::new(name, false)).await;
    file_manager.open_file(&path).await?;
    tracing::info!(path = %path, "code sample loaded");
    Ok(path)
}

async fn seed_default(manager: &WorkspaceManager) -> BootstrapOutcome {
    let listing = manager
        .context()
        .providers()
        .workspace()
        .resolve_directory("/")
        .await;
    match listing {
        Ok(entries) if entries.is_empty() => {
            let name = manager.context().config().default_workspace.clone();
            match manager.create_workspace(&name).await {
                Ok(()) => BootstrapOutcome::DefaultCreated,
                Err(error) => {
                    tracing::error!(workspace = %name, error = %error, "failed to create default workspace");
                    BootstrapOutcome::Existing
                }
            }
        }
        Ok(_) => BootstrapOutcome::Existing,
        Err(error) => {
            tracing::error!(error = %error, "failed to resolve workspace root");
            BootstrapOutcome::Existing
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/bootstrap.rs"]
mod tests;
