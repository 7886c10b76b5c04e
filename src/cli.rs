use clap::{Args, Parser, Subcommand, ValueEnum};

pub const DEFAULT_LISTING_URL: &str =
    "https://www.metalmarket.eu/en/menu/coins/1-ounce-coins-802.html?filter_traits%5B1%5D=367";

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scrape the listing and every product page into one output file.
    Scrape(ScrapeArgs),
    /// Print the spec table of a single product page as JSON.
    Specs(SpecsArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Header row plus one delimiter-joined row per product.
    Delimited,
    /// One JSON object per product.
    Jsonl,
}

#[derive(Debug, Args)]
pub struct ScrapeArgs {
    /// Listing page URL (must be http/https).
    #[arg(long, default_value = DEFAULT_LISTING_URL)]
    pub url: String,

    /// Output file; replaced if it exists.
    #[arg(long, default_value = "out.csv")]
    pub out: String,

    /// Field delimiter for delimited output.
    #[arg(long, default_value = ";")]
    pub delimiter: String,

    #[arg(long, value_enum, default_value_t = OutputFormat::Delimited)]
    pub format: OutputFormat,

    /// Maximum concurrent product page requests.
    #[arg(long, default_value_t = 1)]
    pub concurrency: usize,

    /// Per-request timeout.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Extra attempts for requests that fail with a transport error or 5xx.
    #[arg(long, default_value_t = 0)]
    pub retries: u32,

    /// Base delay between attempts, multiplied by the attempt number.
    #[arg(long, default_value_t = 500)]
    pub retry_delay_ms: u64,
}

#[derive(Debug, Args)]
pub struct SpecsArgs {
    /// Product page URL (must be http/https).
    #[arg(long)]
    pub url: String,

    /// Per-request timeout.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}
