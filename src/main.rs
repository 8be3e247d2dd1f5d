use anyhow::Result;
use minrepo_sync::{
    config::Config,
    fetch::HttpPageSource,
    pipeline,
    store::SheetsStore,
};
use reqwest::Client;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    std::panic::set_hook(Box::new(|info| {
        eprintln!("panic: {:?}", info);
    }));

    // ─── 2) scrape + upsert ──────────────────────────────────────────
    // Store errors (missing token, auth, API) are handled inside the
    // pipeline's upsert boundary; only scrape failures land here.
    let cfg = Config::default();
    let pages = HttpPageSource::new(cfg.page_wait)?;
    pipeline::run(&pages, &cfg, || {
        SheetsStore::open(Client::new(), &cfg.spreadsheet_key)
    })
    .await?;

    info!("all done");
    Ok(())
}
