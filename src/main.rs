mod cli;
mod expression;
mod facts_file;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use expression::{expand_file_selectors, strip_outer_quotes};
use page_select::{SelectionResult, select_pages};
use std::io::Write;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let document = facts_file::load_document(&cli.facts)?;
    let expression = expand_file_selectors(strip_outer_quotes(&cli.extract_pages))?;
    info!(pages = document.len(), %expression, "selecting pages");

    let result = select_pages(&expression, &document, &cli.select_options())
        .with_context(|| format!("failed to evaluate {expression:?}"))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        serde_json::to_writer_pretty(&mut out, &result).context("failed to write JSON")?;
        writeln!(out)?;
    } else {
        print_groups(&mut out, &result)?;
    }
    Ok(())
}

fn print_groups(out: &mut impl Write, result: &SelectionResult) -> Result<()> {
    if result.is_empty() {
        writeln!(out, "No pages selected")?;
        return Ok(());
    }
    for group in &result.groups {
        let pages: Vec<String> = group.pages.iter().map(ToString::to_string).collect();
        writeln!(out, "{}\t{}\t{}", group.label(), pages.join(" "), group.source)?;
    }
    Ok(())
}
