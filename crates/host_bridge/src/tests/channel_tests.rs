use super::*;

use std::time::Duration;

use serde_json::json;
use tokio::sync::mpsc;
use tokio::time::timeout;

use crate::standalone::StandaloneHost;

const RECV_WINDOW: Duration = Duration::from_secs(1);
const QUIET_WINDOW: Duration = Duration::from_millis(100);

fn standalone_channel() -> (Arc<StandaloneHost>, EventChannel) {
    let host = Arc::new(StandaloneHost::new());
    let channel = EventChannel::new(host.clone());
    (host, channel)
}

fn collecting_handler() -> (impl FnMut(Value) + Send + 'static, mpsc::UnboundedReceiver<Value>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        move |payload: Value| {
            let _ = tx.send(payload);
        },
        rx,
    )
}

async fn next(rx: &mut mpsc::UnboundedReceiver<Value>) -> Value {
    timeout(RECV_WINDOW, rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("handler channel closed")
}

#[tokio::test]
async fn delivers_payloads_in_emit_order() {
    let (host, channel) = standalone_channel();
    let (handler, mut rx) = collecting_handler();
    let _sub = channel.subscribe("task-progress", handler).expect("subscribe");

    for step in 1..=3 {
        host.emit("task-progress", json!({ "step": step }));
    }

    assert_eq!(next(&mut rx).await, json!({ "step": 1 }));
    assert_eq!(next(&mut rx).await, json!({ "step": 2 }));
    assert_eq!(next(&mut rx).await, json!({ "step": 3 }));
}

#[tokio::test]
async fn cancelling_twice_neither_fails_nor_redelivers() {
    let (host, channel) = standalone_channel();
    let (handler, mut rx) = collecting_handler();
    let sub = channel.subscribe("theme-updated", handler).expect("subscribe");

    host.emit("theme-updated", json!("dark"));
    assert_eq!(next(&mut rx).await, json!("dark"));

    sub.cancel();
    sub.cancel();

    host.emit("theme-updated", json!("light"));
    assert!(
        timeout(QUIET_WINDOW, rx.recv()).await.is_err(),
        "handler must not run after cancellation"
    );
}

#[tokio::test]
async fn subscriptions_to_one_event_are_independent() {
    let (host, channel) = standalone_channel();
    let (first_handler, mut first_rx) = collecting_handler();
    let (second_handler, mut second_rx) = collecting_handler();

    let first = channel.subscribe("window-updated", first_handler).expect("subscribe");
    let _second = channel.subscribe("window-updated", second_handler).expect("subscribe");

    host.emit("window-updated", json!({ "width": 800 }));
    assert_eq!(next(&mut first_rx).await, json!({ "width": 800 }));
    assert_eq!(next(&mut second_rx).await, json!({ "width": 800 }));

    first.cancel();

    host.emit("window-updated", json!({ "width": 1024 }));
    assert_eq!(next(&mut second_rx).await, json!({ "width": 1024 }));
    assert!(
        timeout(QUIET_WINDOW, first_rx.recv()).await.is_err(),
        "cancelled handler must stay silent"
    );
}

#[tokio::test]
async fn cancel_after_transport_teardown_is_harmless() {
    let (host, channel) = standalone_channel();
    let (handler, mut rx) = collecting_handler();
    let sub = channel.subscribe("dock-updated", handler).expect("subscribe");

    host.emit("dock-updated", json!({ "badge": "1" }));
    assert_eq!(next(&mut rx).await, json!({ "badge": "1" }));

    // Dropping every topic owner closes the broadcast sender, which ends
    // the forwarding task on its own.
    drop(channel);
    drop(host);

    let deadline = tokio::time::Instant::now() + RECV_WINDOW;
    while sub.is_active() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "subscription should wind down once the transport is gone"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    sub.cancel();
    sub.cancel();
}
