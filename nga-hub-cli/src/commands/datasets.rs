use anyhow::{Context, Result};
use nga_hub::{CatalogResponse, DatasetSummary};
use std::io::{self, Write};

use super::{build_client, ClientOptions};

const NAME_WIDTH: usize = 32;
const CREATED_WIDTH: usize = 26;
const SOURCE_WIDTH: usize = 24;
const TITLE_WIDTH: usize = 48;

pub async fn run(options: ClientOptions, json: bool, csv: bool) -> Result<()> {
    let client = build_client(options)?;

    let response = client
        .fetch_datasets()
        .await
        .with_context(|| format!("Failed to fetch datasets from {}", client.url()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if json {
        serde_json::to_writer_pretty(&mut out, &response)?;
        writeln!(out)?;
    } else if csv {
        write_csv(&mut out, &response.datasets)?;
    } else {
        write_table(&mut out, &response)?;
    }

    Ok(())
}

/// Write one CSV row per dataset. Tags are joined with `;`, `null` fields are empty.
fn write_csv<W: Write>(out: W, datasets: &[DatasetSummary]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    writer.write_record(["name", "title", "snippet", "tags", "created", "source"])?;
    for dataset in datasets {
        let tags = dataset.tags.as_deref().unwrap_or_default().join(";");
        writer.write_record([
            dataset.name.as_str(),
            dataset.title.as_deref().unwrap_or_default(),
            dataset.snippet.as_deref().unwrap_or_default(),
            tags.as_str(),
            dataset.created.as_str(),
            dataset.source.as_deref().unwrap_or_default(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn write_table<W: Write>(mut out: W, response: &CatalogResponse) -> Result<()> {
    if response.datasets.is_empty() {
        writeln!(out, "No datasets found")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:<NAME_WIDTH$} {:<CREATED_WIDTH$} {:<SOURCE_WIDTH$} {}",
        "NAME", "CREATED", "SOURCE", "TITLE"
    )?;
    writeln!(
        out,
        "{}",
        "-".repeat(NAME_WIDTH + CREATED_WIDTH + SOURCE_WIDTH + TITLE_WIDTH + 3)
    )?;

    for dataset in &response.datasets {
        writeln!(
            out,
            "{:<NAME_WIDTH$} {:<CREATED_WIDTH$} {:<SOURCE_WIDTH$} {}",
            truncate(&dataset.name, NAME_WIDTH),
            dataset.created,
            truncate(dataset.source.as_deref().unwrap_or("-"), SOURCE_WIDTH),
            truncate(dataset.title.as_deref().unwrap_or("-"), TITLE_WIDTH),
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Total: {} datasets", response.total_datasets)?;
    Ok(())
}

/// Shorten `text` to at most `width` characters, marking the cut with `…`.
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut shortened: String = text.chars().take(width.saturating_sub(1)).collect();
    shortened.push('…');
    shortened
}
