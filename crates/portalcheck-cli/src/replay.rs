//! Drive a full session from a scripted list of flow events.

use std::path::Path;

use anyhow::Context as _;

use portalcheck_core::{AppConfig, RewardsConfig};
use portalcheck_engine::{ContextBus, FlowEvent, FlowService};
use portalcheck_store::JsonFileStore;

pub(crate) async fn run(
    config: &AppConfig,
    script: &Path,
    rewards: RewardsConfig,
) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(script)
        .with_context(|| format!("failed to read event script {}", script.display()))?;
    let events: Vec<FlowEvent> =
        serde_json::from_str(&raw).context("event script must be a JSON array of flow events")?;

    let store = JsonFileStore::new(&config.store_path);
    let service = FlowService::new(
        store,
        ContextBus::new(config.bus_capacity),
        rewards,
        config.session_ttl_ms,
    );
    let ctx = service.restore().await;
    tracing::info!(state = %ctx.state, session_id = ?ctx.session_id, "session ready");

    for event in events {
        let kind = event.kind();
        match service.send(event).await {
            Ok(ctx) => {
                tracing::info!(event = kind, state = %ctx.state, step = ctx.active_step(), "event applied");
            }
            Err(e) => {
                tracing::warn!(event = kind, error = %e, "event rejected");
            }
        }
    }

    let final_ctx = service.context().await;
    println!("{}", serde_json::to_string_pretty(&final_ctx)?);
    Ok(())
}
