use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write as _};
use std::path::PathBuf;

use anyhow::Context as _;

use crate::cli::OutputFormat;
use crate::record::{FIELD_NAMES, Record, RecordStore};

#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub path: PathBuf,
    pub delimiter: String,
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("out.csv"),
            delimiter: ";".to_owned(),
            format: OutputFormat::Delimited,
        }
    }
}

/// Writes every record to the configured destination, replacing whatever was there.
pub fn write(store: RecordStore, config: &OutputConfig) -> anyhow::Result<()> {
    let path = &config.path;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir: {}", parent.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("open output: {}", path.display()))?;
    let mut out = BufWriter::new(file);

    let count = store.len();
    let records = store.into_records();
    match config.format {
        OutputFormat::Delimited => write_delimited(&mut out, &records, &config.delimiter)
            .with_context(|| format!("write output: {}", path.display()))?,
        OutputFormat::Jsonl => write_jsonl(&mut out, &records)
            .with_context(|| format!("write output: {}", path.display()))?,
    }
    out.flush()
        .with_context(|| format!("flush output: {}", path.display()))?;

    tracing::info!(path = %path.display(), records = count, "output written");
    Ok(())
}

/// Header row of field names, then one row per record. Values are written as they are, so a
/// value containing the delimiter shifts that row's columns.
pub fn write_delimited(
    out: &mut impl io::Write,
    records: &[Record],
    delimiter: &str,
) -> io::Result<()> {
    writeln!(out, "{}", FIELD_NAMES.join(delimiter))?;
    for record in records {
        writeln!(out, "{}", record.values().join(delimiter))?;
    }
    Ok(())
}

pub fn write_jsonl(out: &mut impl io::Write, records: &[Record]) -> anyhow::Result<()> {
    for record in records {
        serde_json::to_writer(&mut *out, record).context("serialize record json")?;
        out.write_all(b"\n").context("write record newline")?;
    }
    Ok(())
}
