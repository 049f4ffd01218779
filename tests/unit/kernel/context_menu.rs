use super::*;

fn draft(id: &str) -> MenuItemDraft {
    MenuItemDraft {
        id: Some(id.to_string()),
        name: Some(format!("{id} action")),
        ..MenuItemDraft::default()
    }
}

fn registry() -> (ContextMenuRegistry, tokio::sync::broadcast::Receiver<PanelEvent>) {
    let bus = PanelBus::new(8);
    let rx = bus.subscribe();
    (ContextMenuRegistry::new(bus), rx)
}

#[test]
fn test_register_rejects_missing_item_and_fields() {
    let (registry, _) = registry();

    assert!(matches!(
        registry.register(None),
        Err(PanelError::InvalidArgument(_))
    ));

    let mut no_name = draft("a");
    no_name.name = None;
    no_name.extension = vec!["sol".into()];
    assert!(matches!(
        registry.register(Some(no_name)),
        Err(PanelError::InvalidArgument(_))
    ));

    let mut no_id = draft("a");
    no_id.id = Some("  ".into());
    no_id.extension = vec!["sol".into()];
    assert!(matches!(
        registry.register(Some(no_id)),
        Err(PanelError::InvalidArgument(_))
    ));
    assert!(registry.is_empty());
}

#[test]
fn test_register_without_criterion_leaves_registry_unchanged() {
    let (registry, mut rx) = registry();
    let mut first = draft("compile");
    first.extension = vec![".sol".into()];
    registry.register(Some(first)).unwrap();
    let before = registry.items();

    let result = registry.register(Some(draft("empty")));

    assert!(matches!(result, Err(PanelError::InvalidArgument(_))));
    let after = registry.items();
    assert!(Arc::ptr_eq(&before, &after));
    assert_eq!(after.len(), 1);
    assert_eq!(rx.try_recv().unwrap(), PanelEvent::MenuItemsChanged(1));
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_register_replaces_sequence_in_order() {
    let (registry, _) = registry();
    let mut a = draft("a");
    a.kinds = vec!["file".into()];
    registry.register(Some(a)).unwrap();
    let snapshot = registry.items();

    let mut b = draft("b");
    b.kinds = vec!["folder".into()];
    registry.register(Some(b)).unwrap();

    assert_eq!(snapshot.len(), 1);
    let ids: Vec<_> = registry.items().iter().map(|item| item.id.clone()).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[test]
fn test_register_rejects_duplicate_id_and_bad_pattern() {
    let (registry, _) = registry();
    let mut a = draft("a");
    a.path = vec!["contracts".into()];
    registry.register(Some(a.clone())).unwrap();
    assert!(registry.register(Some(a)).is_err());

    let mut bad = draft("bad");
    bad.pattern = vec!["(".into()];
    assert!(matches!(
        registry.register(Some(bad)),
        Err(PanelError::InvalidArgument(_))
    ));

    let mut unknown = draft("unknown");
    unknown.kinds = vec!["socket".into()];
    assert!(registry.register(Some(unknown)).is_err());
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_matching_by_criterion() {
    let (registry, _) = registry();
    let mut by_ext = draft("ext");
    by_ext.extension = vec!["SOL".into()];
    let mut by_path = draft("path");
    by_path.path = vec!["/scripts".into()];
    let mut by_pattern = draft("pattern");
    by_pattern.pattern = vec![r"\.test\.js$".into()];
    let mut folders = draft("folders");
    folders.kinds = vec!["folder".into()];
    for item in [by_ext, by_path, by_pattern, folders] {
        registry.register(Some(item)).unwrap();
    }

    let ids = |path: &str, is_dir: bool| -> Vec<String> {
        registry
            .matching(path, is_dir)
            .into_iter()
            .map(|item| item.id)
            .collect()
    };

    assert_eq!(ids("contracts/1_Storage.sol", false), vec!["ext"]);
    assert_eq!(ids("scripts", true), vec!["path", "folders"]);
    assert_eq!(ids("tests/storage.test.js", false), vec!["pattern"]);
    assert!(ids("README.txt", false).is_empty());
}

#[test]
fn test_draft_from_host_json() {
    let draft: MenuItemDraft = serde_json::from_str(
        r#"{"id":"run","name":"runScript","type":["file"],"extension":[".js"]}"#,
    )
    .unwrap();

    assert_eq!(draft.kinds, vec!["file"]);
    assert_eq!(draft.extension, vec![".js"]);
    assert!(draft.pattern.is_empty());
}
