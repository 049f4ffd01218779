use serde::Serialize;

/// Static description of the panel handed to the plugin host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginProfile {
    pub name: &'static str,
    pub display_name: &'static str,
    pub methods: &'static [&'static str],
    pub events: &'static [&'static str],
    pub kind: &'static str,
    pub location: &'static str,
    pub version: &'static str,
}

pub const PROFILE: PluginProfile = PluginProfile {
    name: "fileExplorers",
    display_name: "File explorers",
    methods: &[
        "createNewFile",
        "uploadFile",
        "getCurrentWorkspace",
        "getWorkspaces",
        "createWorkspace",
    ],
    events: &[
        "setWorkspace",
        "renameWorkspace",
        "deleteWorkspace",
        "createWorkspace",
    ],
    kind: "fileexplorer",
    location: "sidePanel",
    version: env!("CARGO_PKG_VERSION"),
};

impl PluginProfile {
    pub fn exposes(&self, method: &str) -> bool {
        self.methods.contains(&method)
    }

    pub fn emits(&self, event: &str) -> bool {
        self.events.contains(&event)
    }
}

pub trait PluginHost {
    fn register(&mut self, profile: &PluginProfile);
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/profile.rs"]
mod tests;
