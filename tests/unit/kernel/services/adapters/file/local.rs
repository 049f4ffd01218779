use super::*;
use tempfile::tempdir;

#[tokio::test]
async fn test_read_write_file() {
    let dir = tempdir().unwrap();
    let provider = LocalFileProvider::new(ProviderKind::Localhost, dir.path());

    provider.set("/project/main.sol", "Hello, World!").await.unwrap();
    assert!(provider.exists("project/main.sol").await.unwrap());
    assert!(dir.path().join("project/main.sol").is_file());

    let content = provider.get("project/main.sol").await.unwrap();
    assert_eq!(content, "Hello, World!");
}

#[tokio::test]
async fn test_resolve_directory_lists_dirs_first() {
    let dir = tempdir().unwrap();
    std::fs::create_dir(dir.path().join("subdir")).unwrap();
    std::fs::write(dir.path().join("b.txt"), "").unwrap();
    std::fs::write(dir.path().join("A.txt"), "").unwrap();

    let provider = LocalFileProvider::new(ProviderKind::Browser, dir.path());
    let entries = provider.resolve_directory("/").await.unwrap();

    let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["subdir", "A.txt", "b.txt"]);
    assert!(entries[0].is_dir);
    assert_eq!(entries[0].path, "subdir");
}

#[tokio::test]
async fn test_create_and_remove_dir() {
    let dir = tempdir().unwrap();
    let provider = LocalFileProvider::new(ProviderKind::Browser, dir.path());

    provider.create_dir(".workspaces/w").await.unwrap();
    assert!(dir.path().join(".workspaces/w").is_dir());
    assert!(matches!(
        provider.create_dir(".workspaces/w").await,
        Err(FileError::AlreadyExists(_))
    ));

    provider.remove(".workspaces").await.unwrap();
    assert!(!provider.exists(".workspaces").await.unwrap());
}

#[tokio::test]
async fn test_rename_emits_event() {
    let dir = tempdir().unwrap();
    let provider = LocalFileProvider::new(ProviderKind::Localhost, dir.path());
    provider.set("old.txt", "content").await.unwrap();
    let mut rx = provider.subscribe();

    provider.rename("old.txt", "nested/new.txt", false).await.unwrap();

    assert!(!provider.exists("old.txt").await.unwrap());
    assert_eq!(provider.get("nested/new.txt").await.unwrap(), "content");
    assert_eq!(
        rx.try_recv().unwrap(),
        FileEvent::Renamed {
            from: "old.txt".into(),
            to: "nested/new.txt".into(),
            is_folder: false,
        }
    );
}

#[tokio::test]
async fn test_rename_missing_source() {
    let dir = tempdir().unwrap();
    let provider = LocalFileProvider::new(ProviderKind::Localhost, dir.path());
    let mut rx = provider.subscribe();

    let result = provider.rename("nope.txt", "new.txt", false).await;

    assert!(matches!(result, Err(FileError::NotFound(_))));
    assert!(matches!(rx.try_recv(), Ok(FileEvent::RenamedError { .. })));
}

#[tokio::test]
async fn test_rename_into_unusable_parent_reports_error() {
    let dir = tempdir().unwrap();
    let provider = LocalFileProvider::new(ProviderKind::Localhost, dir.path());
    provider.set("old.txt", "content").await.unwrap();
    provider.set("blocker", "a file, not a folder").await.unwrap();
    let mut rx = provider.subscribe();

    let result = provider.rename("old.txt", "blocker/new.txt", false).await;

    assert!(result.is_err());
    assert_eq!(provider.get("old.txt").await.unwrap(), "content");
    assert!(matches!(
        rx.try_recv(),
        Ok(FileEvent::RenamedError { path, .. }) if path == "old.txt"
    ));
}

#[tokio::test]
async fn test_parent_components_rejected() {
    let dir = tempdir().unwrap();
    let provider = LocalFileProvider::new(ProviderKind::Localhost, dir.path());
    let result = provider.get("../etc/passwd").await;
    assert!(matches!(result, Err(FileError::InvalidPath(_))));
}

#[tokio::test]
async fn test_not_found_error() {
    let dir = tempdir().unwrap();
    let provider = LocalFileProvider::new(ProviderKind::Localhost, dir.path());
    let result = provider.get("missing/file.txt").await;
    assert!(matches!(result, Err(FileError::NotFound(_))));
}

#[tokio::test]
async fn test_readonly_provider() {
    let dir = tempdir().unwrap();
    let provider =
        LocalFileProvider::new(ProviderKind::VersionControl, dir.path()).with_readonly(true);
    assert!(matches!(
        provider.set("a.txt", "x").await,
        Err(FileError::ReadOnly(_))
    ));
}
