use anyhow::Context as _;
use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "info";

/// Logs go to stderr so that stdout carries only command output.
pub fn init() -> anyhow::Result<()> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(directives.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("initialize tracing subscriber: {err}"))
}

/// `RUST_LOG` directives when they parse, `info` otherwise.
fn build_filter(directives: Option<&str>) -> anyhow::Result<EnvFilter> {
    match directives.map(EnvFilter::try_new) {
        Some(Ok(filter)) => Ok(filter),
        _ => EnvFilter::try_new(DEFAULT_DIRECTIVES).context("build log filter"),
    }
}
