//! CSS markers of the target site's markup.
//!
//! These follow the metalmarket.eu templates and break silently when the site changes them;
//! `coinscrape specs --url <detail page>` shows what the detail markers currently pick up.

use anyhow::Context as _;
use scraper::Selector;

pub const PRODUCT_WRAPPER: &str = "div.product_wrapper";
pub const PRODUCT_NAME: &str = "a.product-name";
pub const PRODUCT_PRICE: &str = "span.price";

pub const SPEC_VALUE: &str = "div.n54117_item_b_sub";
pub const SPEC_DICTIONARY: &str = "table.n54117_dictionary";
pub const SPEC_LABEL: &str = "span";

/// Label text that separates a label from its value and is not a label itself.
pub const LABEL_SEPARATOR: &str = ":";

pub fn compile(css: &str) -> anyhow::Result<Selector> {
    Selector::parse(css)
        .map_err(|err| anyhow::anyhow!("{err:?}"))
        .with_context(|| format!("parse selector: {css}"))
}
