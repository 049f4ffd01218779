use super::*;
use tokio::time::{timeout, Duration};

fn workspace() -> Workspace {
    Workspace::new("alpha", false)
}

#[tokio::test]
async fn publish_and_receive_event() {
    let bus = PanelBus::new(8);
    let mut rx = bus.subscribe();

    assert_eq!(bus.publish(PanelEvent::SetWorkspace(workspace())), 1);

    let received = timeout(Duration::from_millis(100), rx.recv())
        .await
        .expect("timeout")
        .expect("recv");
    assert!(matches!(received, PanelEvent::SetWorkspace(ref w) if w.name == "alpha"));
}

#[tokio::test]
async fn multiple_subscribers_receive_event() {
    let bus = PanelBus::new(8);
    let mut rx1 = bus.subscribe();
    let mut rx2 = bus.subscribe();

    bus.publish(PanelEvent::DeleteWorkspace(workspace()));

    let event1 = rx1.recv().await.expect("recv1");
    let event2 = rx2.recv().await.expect("recv2");
    assert_eq!(event1, event2);
    assert_eq!(event1.name(), "deleteWorkspace");
}

#[test]
fn publish_without_subscribers_is_dropped() {
    let bus = PanelBus::new(8);
    assert_eq!(bus.publish(PanelEvent::MenuItemsChanged(1)), 0);
}

#[test]
fn event_serializes_with_type_tag() {
    let json = serde_json::to_value(PanelEvent::CreateWorkspace(workspace())).unwrap();
    assert_eq!(json["type"], "createWorkspace");
    assert_eq!(json["payload"]["name"], "alpha");
    assert_eq!(json["payload"]["isLocalhost"], false);
    assert!(PanelEvent::CreateWorkspace(workspace()).is_lifecycle());
    assert!(!PanelEvent::WorkspacesListed(Vec::new()).is_lifecycle());
}
