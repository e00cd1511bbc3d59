//! Print the persisted session record without touching it.

use chrono::Utc;

use portalcheck_core::AppConfig;
use portalcheck_engine::service::SESSION_KEY;
use portalcheck_engine::FlowContext;
use portalcheck_store::{JsonFileStore, SessionStore};

pub(crate) async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let store = JsonFileStore::new(&config.store_path);
    let Some(raw) = store.get(SESSION_KEY).await? else {
        println!("no persisted session");
        return Ok(());
    };

    match serde_json::from_str::<FlowContext>(&raw) {
        Ok(ctx) => {
            let age_ms = Utc::now().timestamp_millis() - ctx.last_updated;
            if age_ms >= config.session_ttl_ms {
                println!("session expired ({age_ms} ms old, ttl {} ms)", config.session_ttl_ms);
            }
            println!("{}", serde_json::to_string_pretty(&ctx)?);
        }
        Err(e) => {
            println!("session record is corrupt: {e}");
        }
    }
    Ok(())
}
