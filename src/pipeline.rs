use anyhow::Result;
use chrono::Local;
use tracing::{error, info};

use crate::config::Config;
use crate::fetch::{discover_detail_links, force_all_machine_types, PageSource};
use crate::process::{date, extract, merge, Table, DATE_COLUMN};
use crate::store::{TableStore, ValueInput};

/// One full run: scrape, then merge the results into the store.
///
/// The store is opened lazily through `open_store` so the credential is
/// only read once there is something to write, and so its failure falls
/// inside the same boundary as every other store error: anything that
/// goes wrong from store open through the final write is logged and
/// swallowed, ending the run cleanly. Scrape failures propagate.
pub async fn run<P, S, F>(pages: &P, cfg: &Config, open_store: F) -> Result<()>
where
    P: PageSource,
    S: TableStore,
    F: FnOnce() -> Result<S>,
{
    let scraped = scrape(pages, cfg).await?;
    if scraped.is_empty() {
        info!("no data; sheet left untouched");
        return Ok(());
    }

    let result = async {
        let store = open_store()?;
        upsert(&store, scraped).await
    }
    .await;

    if let Err(e) = result {
        error!("sheet update failed: {e:#}");
    }
    Ok(())
}

/// Visit the listing page and every discovered detail page in sequence,
/// returning one table per page that had data. Each table is tagged with
/// the date inferred from its page title. Fetch failures propagate; pages
/// without a usable table are logged and skipped.
pub async fn scrape<P: PageSource>(pages: &P, cfg: &Config) -> Result<Vec<Table>> {
    let listing = pages.page_source(&cfg.list_url).await?;
    let links = discover_detail_links(&listing, &cfg.list_url, cfg.max_pages);
    info!(count = links.len(), "discovered detail pages");

    let today = Local::now().date_naive();
    let mut scraped = Vec::new();
    for link in &links {
        let url = force_all_machine_types(link);
        let html = pages.page_source(&url).await?;
        match extract::extract_machine_table(&html) {
            Some(mut table) => {
                let date = date::infer_date(&extract::page_title(&html), today);
                table.prepend_column(DATE_COLUMN, &date);
                info!(url = %link, rows = table.rows.len(), "scraped");
                scraped.push(table);
            }
            None => info!(url = %link, "no data"),
        }
    }
    Ok(scraped)
}

/// Merge the scraped tables into whatever the store already holds and
/// replace its contents: column-aligned concat, keep-last dedup,
/// chronological sort, numeric coercion, then clear + full rewrite with
/// auto-typed values.
pub async fn upsert<S: TableStore>(store: &S, scraped: Vec<Table>) -> Result<()> {
    let existing = Table::from_raw_rows(store.read_all().await?);

    let fresh = scraped
        .into_iter()
        .reduce(|acc, t| merge::concat(acc, t))
        .unwrap_or_default();
    let combined = merge::merge(existing, fresh);

    store.clear().await?;
    store
        .write_all(&combined.to_raw_rows(), ValueInput::UserEntered)
        .await?;
    info!(rows = combined.rows.len(), "sheet updated");
    Ok(())
}
