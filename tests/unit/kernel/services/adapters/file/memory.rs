use super::*;

fn drain(rx: &mut broadcast::Receiver<FileEvent>) -> Vec<FileEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn test_set_creates_parents_and_lists_children() {
    let provider = MemoryFileProvider::new(ProviderKind::Browser);
    provider.set("/.workspaces/a/README.txt", "hi").await.unwrap();
    provider.set(".workspaces/notes.txt", "n").await.unwrap();

    let root = provider.resolve_directory("/").await.unwrap();
    assert_eq!(root, vec![DirEntry::new(".workspaces", true)]);

    let entries = provider.resolve_directory("/.workspaces").await.unwrap();
    assert_eq!(
        entries,
        vec![
            DirEntry::new(".workspaces/a", true),
            DirEntry::new(".workspaces/notes.txt", false),
        ]
    );
    assert_eq!(provider.get(".workspaces/a/README.txt").await.unwrap(), "hi");
}

#[tokio::test]
async fn test_resolve_missing_directory() {
    let provider = MemoryFileProvider::new(ProviderKind::Browser);
    let result = provider.resolve_directory("missing").await;
    assert!(matches!(result, Err(FileError::NotFound(_))));
}

#[tokio::test]
async fn test_set_emits_added_only_for_new_files() {
    let provider = MemoryFileProvider::new(ProviderKind::Browser);
    let mut rx = provider.subscribe();

    provider.set("a.txt", "1").await.unwrap();
    provider.set("a.txt", "2").await.unwrap();

    assert_eq!(drain(&mut rx), vec![FileEvent::Added { path: "a.txt".into() }]);
}

#[tokio::test]
async fn test_remove_folder_is_recursive() {
    let provider = MemoryFileProvider::new(ProviderKind::Browser);
    provider.set("w/a.txt", "1").await.unwrap();
    provider.set("w/sub/b.txt", "2").await.unwrap();
    provider.set("keep.txt", "3").await.unwrap();
    let mut rx = provider.subscribe();

    provider.remove("w").await.unwrap();

    assert!(!provider.exists("w/sub/b.txt").await.unwrap());
    assert!(provider.exists("keep.txt").await.unwrap());
    assert_eq!(drain(&mut rx), vec![FileEvent::Removed { path: "w".into() }]);
}

#[tokio::test]
async fn test_rename_folder_moves_subtree() {
    let provider = MemoryFileProvider::new(ProviderKind::Browser);
    provider.set("old/a.txt", "1").await.unwrap();
    provider.set("old/sub/b.txt", "2").await.unwrap();
    provider.set("older.txt", "3").await.unwrap();
    let mut rx = provider.subscribe();

    provider.rename("old", "new", true).await.unwrap();

    assert_eq!(provider.get("new/sub/b.txt").await.unwrap(), "2");
    assert!(!provider.exists("old").await.unwrap());
    assert!(provider.exists("older.txt").await.unwrap());
    assert_eq!(
        drain(&mut rx),
        vec![FileEvent::Renamed {
            from: "old".into(),
            to: "new".into(),
            is_folder: true,
        }]
    );
}

#[tokio::test]
async fn test_rename_conflict_emits_error() {
    let provider = MemoryFileProvider::new(ProviderKind::Browser);
    provider.set("a.txt", "1").await.unwrap();
    provider.set("b.txt", "2").await.unwrap();
    let mut rx = provider.subscribe();

    let result = provider.rename("a.txt", "b.txt", false).await;

    assert!(matches!(result, Err(FileError::AlreadyExists(_))));
    assert!(matches!(
        drain(&mut rx).as_slice(),
        [FileEvent::RenamedError { path, .. }] if path == "a.txt"
    ));
}

#[tokio::test]
async fn test_readonly_rejects_mutation() {
    let provider = MemoryFileProvider::new_readonly(ProviderKind::Snippet)
        .with_file("gist/a.txt", "seed")
        .unwrap();

    assert!(provider.readonly());
    assert_eq!(provider.get("gist/a.txt").await.unwrap(), "seed");
    assert!(matches!(
        provider.set("gist/a.txt", "x").await,
        Err(FileError::ReadOnly(_))
    ));
    assert!(matches!(
        provider.create_dir("other").await,
        Err(FileError::ReadOnly(_))
    ));
}

#[tokio::test]
async fn test_create_dir_twice_fails() {
    let provider = MemoryFileProvider::new(ProviderKind::Browser);
    provider.create_dir(".workspaces/w").await.unwrap();
    assert!(matches!(
        provider.create_dir(".workspaces/w").await,
        Err(FileError::AlreadyExists(_))
    ));
}

#[tokio::test]
async fn test_external_change_notification() {
    let provider = MemoryFileProvider::new(ProviderKind::Browser);
    provider.set("a.txt", "1").await.unwrap();
    let mut rx = provider.subscribe();

    provider.notify_external_change("a.txt", "2").unwrap();

    assert_eq!(provider.get("a.txt").await.unwrap(), "2");
    assert_eq!(
        drain(&mut rx),
        vec![FileEvent::ExternallyChanged {
            path: "a.txt".into(),
            content: "2".into(),
        }]
    );
}
