use std::{sync::Arc, time::Duration};

use anyhow::Result;
use clap::Parser;
use serde_json::json;

use host_bridge::{kube_config, DockMonitor, EventChannel, ExecutionBridge, StandaloneHost};
use shared::{domain::ExecutionMode, kube::KubeConfig, protocol};

#[derive(Parser, Debug)]
struct Args {
    /// Kubeconfig path forwarded to the host command.
    #[arg(long)]
    kubeconfig: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    // Nothing embeds this binary, so the whole shell runs standalone:
    // commands are stubbed, pushes are simulated in-process.
    let host = Arc::new(StandaloneHost::new());
    let bridge = ExecutionBridge::new(ExecutionMode::Standalone, host.clone());
    let channel = EventChannel::new(host.clone());
    let dock = DockMonitor::attach(&channel)?;

    let outcome = kube_config::load(&bridge, args.kubeconfig.as_deref()).await;
    println!("standalone kubeconfig load: {outcome:?}");

    // A host working through a queue would push updates like these.
    for step in 0..=4 {
        host.emit(
            protocol::PROGRESS_UPDATED,
            json!({ "progress": step as f64 / 4.0 }),
        );
        tokio::time::sleep(Duration::from_millis(50)).await;
        let state = dock.snapshot();
        println!(
            "dock: progress={}% badge={:?}",
            state.progress_percent().unwrap_or(0),
            state.badge
        );
    }
    host.emit(protocol::BADGE_UPDATED, json!({ "badge": "3" }));
    host.emit(protocol::PROGRESS_UPDATED, json!({ "progress": null }));
    tokio::time::sleep(Duration::from_millis(50)).await;
    println!("dock after clear: {:?}", dock.snapshot());

    // Walk a canned document the way the context picker would.
    let sample: KubeConfig = serde_json::from_value(json!({
        "currentContext": "dev",
        "clusters": [{"name": "c1", "cluster": {"server": "https://127.0.0.1:6443"}}],
        "contexts": [{"name": "dev", "context": {"cluster": "c1", "user": "u1"}}],
        "users": [{"name": "u1", "user": {"token": "dummy-token"}}]
    }))?;
    let resolved = sample.resolve(sample.current_context.as_deref());
    if let (Some(context), Some(cluster)) = (resolved.context, resolved.cluster) {
        println!(
            "context {} -> cluster {} ({}) namespace {}",
            context.name,
            cluster.name,
            cluster.cluster.server,
            context.effective_namespace()
        );
    }

    dock.detach();
    Ok(())
}
