use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Parent folder of every workspace, relative to the workspace provider.
    pub workspaces_path: String,
    pub default_workspace: String,
    pub code_sample: CodeSampleConfig,
    /// Side system started for localhost workspaces.
    #[serde(alias = "daemon_plugin")]
    pub daemon: String,
    pub event_capacity: usize,
    pub log: LogConfig,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            workspaces_path: ".workspaces".to_string(),
            default_workspace: "default_workspace".to_string(),
            code_sample: CodeSampleConfig::default(),
            daemon: "remixd".to_string(),
            event_capacity: 64,
            log: LogConfig::default(),
        }
    }
}

impl PanelConfig {
    pub fn workspaces_prefix(&self) -> String {
        format!("{}/", self.workspaces_path.trim_matches('/'))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeSampleConfig {
    pub workspace: String,
    pub file_prefix: String,
    pub hash_prefix_len: usize,
    pub extension: String,
}

impl Default for CodeSampleConfig {
    fn default() -> Self {
        Self {
            workspace: "code-sample".to_string(),
            file_prefix: "contract-".to_string(),
            hash_prefix_len: 10,
            extension: ".sol".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Overrides the cache log directory.
    pub dir: Option<PathBuf>,
    /// Used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            dir: None,
            filter: "filepanel=info".to_string(),
        }
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/config.rs"]
mod tests;
