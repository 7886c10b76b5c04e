#![forbid(unsafe_code)]

pub mod cli;
pub mod detail;
pub mod error;
pub mod export;
pub mod fetch;
pub mod listing;
pub mod logging;
pub mod markup;
pub mod record;
pub mod scrape;
