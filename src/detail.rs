use std::io::Write as _;
use std::time::Duration;

use anyhow::Context as _;
use scraper::{Html, Selector};
use serde::ser::SerializeMap as _;
use url::Url;

use crate::cli::SpecsArgs;
use crate::error::ItemError;
use crate::fetch::{FetchOptions, Fetcher};
use crate::markup;

/// Label → value mapping of one detail page, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecTable {
    entries: Vec<(String, String)>,
}

impl SpecTable {
    /// Builds the table like a dictionary: a repeated label keeps its first position and takes
    /// the later value.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut entries: Vec<(String, String)> = Vec::new();
        for (label, value) in pairs {
            match entries.iter_mut().find(|(existing, _)| *existing == label) {
                Some(entry) => entry.1 = value,
                None => entries.push((label, value)),
            }
        }
        Self { entries }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(label, value)| (label.as_str(), value.as_str()))
    }
}

impl serde::Serialize for SpecTable {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, value) in &self.entries {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

/// Pairs the i-th label with the i-th value.
///
/// The site emits labels and values in two separate places, so nothing ties them together but
/// their position. Entries past the shorter sequence are dropped without notice.
pub fn pair_labels_with_values(
    labels: impl IntoIterator<Item = String>,
    values: impl IntoIterator<Item = String>,
) -> SpecTable {
    SpecTable::from_pairs(labels.into_iter().zip(values))
}

#[derive(Debug)]
pub struct DetailSelectors {
    value: Selector,
    dictionary: Selector,
    label: Selector,
}

impl DetailSelectors {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            value: markup::compile(markup::SPEC_VALUE)?,
            dictionary: markup::compile(markup::SPEC_DICTIONARY)?,
            label: markup::compile(markup::SPEC_LABEL)?,
        })
    }
}

pub fn parse_spec_table(
    html: &str,
    url: &str,
    selectors: &DetailSelectors,
) -> Result<SpecTable, ItemError> {
    let document = Html::parse_document(html);

    let values = document
        .select(&selectors.value)
        .map(|node| node.text().collect::<String>())
        .collect::<Vec<_>>();

    let dictionary = document
        .select(&selectors.dictionary)
        .next()
        .ok_or_else(|| ItemError::MissingNode {
            url: url.to_owned(),
            selector: markup::SPEC_DICTIONARY.to_owned(),
        })?;
    let labels = dictionary
        .select(&selectors.label)
        .map(|node| node.text().collect::<String>())
        .filter(|text| text != markup::LABEL_SEPARATOR)
        .collect::<Vec<_>>();

    if labels.len() != values.len() {
        tracing::debug!(
            url,
            labels = labels.len(),
            values = values.len(),
            "spec label and value counts differ"
        );
    }

    Ok(pair_labels_with_values(labels, values))
}

pub async fn run(args: SpecsArgs) -> anyhow::Result<()> {
    let url = crate::fetch::parse_http_url(&args.url).context("parse --url")?;
    let fetcher = Fetcher::new(FetchOptions {
        timeout: Duration::from_secs(args.timeout_secs),
        ..FetchOptions::default()
    })?;
    let selectors = DetailSelectors::new()?;

    let table = fetch_specs(&fetcher, &selectors, &url)
        .await
        .with_context(|| format!("extract specs: {url}"))?;
    tracing::info!(%url, specs = table.len(), "spec table extracted");

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &table).context("write spec table json")?;
    stdout.write_all(b"\n").context("write newline")?;
    Ok(())
}

/// Fetches one detail page and extracts its spec table.
pub async fn fetch_specs(
    fetcher: &Fetcher,
    selectors: &DetailSelectors,
    url: &Url,
) -> Result<SpecTable, ItemError> {
    let page = fetcher.fetch(url).await?;
    parse_spec_table(&page.body, page.url.as_str(), selectors)
}
