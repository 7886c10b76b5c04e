use scraper::{ElementRef, Html, Selector};

use crate::markup;

/// Summary of one product as shown on the listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingItem {
    pub name: Option<String>,
    pub price: Option<String>,
    /// `href` of the product-name anchor, usually site-relative.
    pub link: Option<String>,
}

#[derive(Debug)]
pub struct ListingSelectors {
    wrapper: Selector,
    name: Selector,
    price: Selector,
}

impl ListingSelectors {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            wrapper: markup::compile(markup::PRODUCT_WRAPPER)?,
            name: markup::compile(markup::PRODUCT_NAME)?,
            price: markup::compile(markup::PRODUCT_PRICE)?,
        })
    }
}

/// Yields every product wrapper on the page in document order.
pub fn listing_items<'a>(
    document: &'a Html,
    selectors: &'a ListingSelectors,
) -> impl Iterator<Item = ListingItem> + 'a {
    document
        .select(&selectors.wrapper)
        .map(|wrapper| listing_item(wrapper, selectors))
}

fn listing_item(wrapper: ElementRef<'_>, selectors: &ListingSelectors) -> ListingItem {
    let anchor = wrapper.select(&selectors.name).next();
    let price = wrapper.select(&selectors.price).next();

    ListingItem {
        name: anchor.map(|node| node.text().collect()),
        price: price.map(|node| node.text().collect()),
        link: anchor
            .and_then(|node| node.value().attr("href"))
            .map(ToOwned::to_owned),
    }
}
