use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use scraper::Html;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

use crate::cli::ScrapeArgs;
use crate::detail::{DetailSelectors, SpecTable};
use crate::export::OutputConfig;
use crate::fetch::{FetchOptions, Fetcher};
use crate::listing::{ListingItem, ListingSelectors};
use crate::record::{Record, RecordStore};

#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    pub listing_url: Url,
    /// Maximum detail pages fetched at once; 1 processes items strictly one after another.
    pub concurrency: usize,
    pub fetch: FetchOptions,
}

#[derive(Debug)]
pub struct ScrapeReport {
    pub store: RecordStore,
    pub listed: usize,
    pub skipped: usize,
}

pub async fn run(args: ScrapeArgs) -> anyhow::Result<()> {
    if args.delimiter.is_empty() {
        anyhow::bail!("--delimiter must not be empty");
    }
    if args.concurrency == 0 {
        anyhow::bail!("--concurrency must be at least 1");
    }
    let listing_url = crate::fetch::parse_http_url(&args.url).context("parse --url")?;

    let options = ScrapeOptions {
        listing_url,
        concurrency: args.concurrency,
        fetch: FetchOptions {
            timeout: Duration::from_secs(args.timeout_secs),
            retries: args.retries,
            retry_delay: Duration::from_millis(args.retry_delay_ms),
        },
    };
    let output = OutputConfig {
        path: PathBuf::from(&args.out),
        delimiter: args.delimiter,
        format: args.format,
    };

    let report = scrape_listing(&options).await?;
    tracing::info!(
        listed = report.listed,
        written = report.store.len(),
        skipped = report.skipped,
        "scrape finished"
    );

    crate::export::write(report.store, &output).context("write output")?;
    Ok(())
}

/// Fetches the listing page and every product's detail page, returning records in listing order.
///
/// Only a failure to get the listing page itself is an error; per-item failures are logged and
/// the item is either skipped or kept with placeholder spec fields.
pub async fn scrape_listing(options: &ScrapeOptions) -> anyhow::Result<ScrapeReport> {
    let fetcher = Fetcher::new(options.fetch)?;
    let listing_selectors = ListingSelectors::new()?;
    let detail_selectors = Arc::new(DetailSelectors::new()?);

    let page = fetcher
        .fetch(&options.listing_url)
        .await
        .with_context(|| format!("fetch listing page: {}", options.listing_url))?;
    let origin = crate::fetch::origin_of(&page.url).context("derive listing origin")?;

    let items = {
        let document = Html::parse_document(&page.body);
        crate::listing::listing_items(&document, &listing_selectors).collect::<Vec<_>>()
    };
    let listed = items.len();
    tracing::info!(url = %page.url, items = listed, "listing fetched");

    let permits = Arc::new(Semaphore::new(options.concurrency.max(1)));
    let mut tasks = JoinSet::new();
    for (index, item) in items.into_iter().enumerate() {
        let permit = Arc::clone(&permits)
            .acquire_owned()
            .await
            .context("acquire fetch permit")?;
        let fetcher = fetcher.clone();
        let selectors = Arc::clone(&detail_selectors);
        let origin = origin.clone();
        tasks.spawn(async move {
            let record = scrape_item(&fetcher, &selectors, &origin, item).await;
            drop(permit);
            (index, record)
        });
    }

    let mut results = Vec::with_capacity(listed);
    while let Some(joined) = tasks.join_next().await {
        results.push(joined.context("join item task")?);
    }
    results.sort_by_key(|(index, _)| *index);

    let mut store = RecordStore::new();
    let mut skipped = 0_usize;
    for (_, record) in results {
        match record {
            Some(record) => store.push(record),
            None => skipped += 1,
        }
    }

    Ok(ScrapeReport {
        store,
        listed,
        skipped,
    })
}

/// Builds the record for one listing item, or `None` when its detail page could not be fetched.
async fn scrape_item(
    fetcher: &Fetcher,
    selectors: &DetailSelectors,
    origin: &Url,
    item: ListingItem,
) -> Option<Record> {
    let ListingItem { name, price, link } = item;

    let Some(detail_url) = link
        .as_deref()
        .and_then(|link| crate::fetch::resolve_link(origin, link))
    else {
        tracing::warn!(?name, ?link, "listing item has no usable detail link");
        return Some(Record::build(name, price, &SpecTable::default()));
    };

    match crate::detail::fetch_specs(fetcher, selectors, &detail_url).await {
        Ok(specs) => {
            tracing::debug!(url = %detail_url, specs = specs.len(), "detail page parsed");
            Some(Record::build(name, price, &specs))
        }
        Err(err) if err.is_structural() => {
            tracing::warn!(url = %detail_url, err = %err, "detail page has no spec table");
            Some(Record::build(name, price, &SpecTable::default()))
        }
        Err(err) => {
            tracing::warn!(url = %detail_url, err = %err, "skipping item");
            None
        }
    }
}
