use std::sync::Arc;

use qab_core::{config::Config, store::ActivationStore};
use qab_supabase::SupabaseStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    qab_core::logging::init("qab")?;

    let cfg = Arc::new(Config::load()?);
    tracing::info!(supabase_url = %cfg.supabase_url, "configuration loaded");

    let store: Arc<dyn ActivationStore> = Arc::new(SupabaseStore::new(
        cfg.supabase_url.clone(),
        cfg.supabase_key.clone(),
        cfg.supabase_timeout,
    )?);

    if let Err(e) = qab_telegram::router::run(cfg, store).await {
        tracing::error!(error = %e, "bot stopped with an error");
        return Err(e);
    }

    Ok(())
}
