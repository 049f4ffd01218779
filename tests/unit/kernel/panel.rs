use super::*;
use crate::kernel::file_manager::{FileManager, FileManagerEvent};
use crate::kernel::services::adapters::{FileProviders, MemoryFileProvider};
use crate::kernel::services::ports::{FileProvider, PanelConfig, ProviderKind};
use crate::kernel::side_system::DaemonHandle;
use async_trait::async_trait;

fn panel() -> (FilePanel, Arc<MemoryFileProvider>) {
    let browser = Arc::new(MemoryFileProvider::new(ProviderKind::Browser));
    let providers = FileProviders::new(browser.clone());
    let ctx = PanelContext::new(providers, PanelConfig::default());
    (
        FilePanel::new(ctx, Arc::new(DaemonHandle::new("remixd"))),
        browser,
    )
}

#[derive(Default)]
struct RecordingHost {
    registered: Vec<&'static str>,
}

impl PluginHost for RecordingHost {
    fn register(&mut self, profile: &PluginProfile) {
        self.registered.push(profile.name);
    }
}

struct FailingImporter;

#[async_trait]
impl SnippetImporter for FailingImporter {
    async fn import(&self, snippet: &str, _file_manager: &FileManager) -> PanelResult<()> {
        Err(PanelError::InvalidArgument(format!("unknown snippet {snippet}")))
    }
}

#[tokio::test]
async fn test_requests_without_handler_fail() {
    let (panel, _) = panel();

    assert!(matches!(
        panel.create_new_file().await,
        Err(PanelError::NoHandler("createNewFile"))
    ));
    assert!(matches!(
        panel.upload_file().await,
        Err(PanelError::NoHandler("uploadFile"))
    ));
    assert!(matches!(
        panel.get_current_workspace().await,
        Err(PanelError::NoHandler("getCurrentWorkspace"))
    ));
}

#[tokio::test]
async fn test_requests_use_latest_handler() {
    let (panel, _) = panel();
    panel.set_request(PendingRequest::new().on_create_new_file(|| async { Ok(Some("a".into())) }));
    panel.set_request(PendingRequest::new().on_create_new_file(|| async { Ok(Some("b".into())) }));

    assert_eq!(panel.create_new_file().await.unwrap().as_deref(), Some("b"));
    assert!(panel.upload_file().await.is_err());
}

#[tokio::test]
async fn test_current_workspace_prefers_host_then_tracked() {
    let (panel, _) = panel();
    panel.set_workspace(Workspace::new("tracked", false)).await;
    assert_eq!(
        panel.get_current_workspace().await.unwrap(),
        Some(Workspace::new("tracked", false))
    );

    panel.set_request(
        PendingRequest::new().on_get_workspaces(|| async { Ok(Some(Workspace::new("host", true))) }),
    );
    assert_eq!(
        panel.get_current_workspace().await.unwrap(),
        Some(Workspace::new("host", true))
    );
}

#[tokio::test]
async fn test_menu_changes_share_lifecycle_channel() {
    let (panel, _) = panel();
    let mut rx = panel.subscribe();
    let item = MenuItemDraft {
        id: Some("flatten".into()),
        name: Some("flattenFile".into()),
        extension: vec![".sol".into()],
        ..MenuItemDraft::default()
    };

    panel.register_context_menu_item(Some(item)).unwrap();
    panel.workspace_created(Workspace::new("w", false));

    assert_eq!(rx.try_recv().unwrap(), PanelEvent::MenuItemsChanged(1));
    assert_eq!(
        rx.try_recv().unwrap(),
        PanelEvent::CreateWorkspace(Workspace::new("w", false))
    );
    assert_eq!(panel.menu().len(), 1);
}

#[test]
fn test_register_with_host() {
    let (panel, _) = panel();
    let mut host = RecordingHost::default();

    panel.register_with(&mut host);

    assert_eq!(host.registered, vec!["fileExplorers"]);
    assert!(panel.profile().exposes("createWorkspace"));
}

#[tokio::test]
async fn test_bootstrap_with_failing_importer_stops() {
    let (panel, browser) = panel();
    let panel = panel.with_importer(Arc::new(FailingImporter));

    let outcome = panel
        .bootstrap(BootstrapSignals::from_pairs([("gist", "missing")]))
        .await;

    assert_eq!(outcome, BootstrapOutcome::Snippet { imported: false });
    assert!(browser.is_empty());
}

#[tokio::test]
async fn test_sync_files_follows_backend_rename() {
    let (panel, browser) = panel();
    panel.create_workspace("w").await.unwrap();
    let fm = panel.context().file_manager().clone();
    fm.open_file("browser/.workspaces/w/README.txt").await.unwrap();
    panel.sync_files().await;
    let mut events = fm.subscribe();

    browser
        .rename(".workspaces/w", ".workspaces/renamed", true)
        .await
        .unwrap();
    assert_eq!(panel.sync_files().await, 1);

    assert_eq!(
        fm.current_file().as_deref(),
        Some("browser/.workspaces/renamed/README.txt")
    );
    assert_eq!(
        events.try_recv().unwrap(),
        FileManagerEvent::CurrentFileChanged("browser/.workspaces/renamed/README.txt".into())
    );
}
