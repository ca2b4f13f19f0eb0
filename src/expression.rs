use anyhow::{Context, Result, bail};
use page_syntax::split_segments;
use std::{fs, path::Path};
use tracing::info;

/// Removes one pair of matching quotes wrapping the whole flag value, left
/// behind when a shell passes `--flag="'1,3'"` through verbatim.
pub fn strip_outer_quotes(value: &str) -> &str {
    let trimmed = value.trim();
    for quote in ['"', '\''] {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            return &trimmed[1..trimmed.len() - 1];
        }
    }
    trimmed
}

/// Replaces every `file:PATH` segment with the selectors listed in PATH.
///
/// The file holds one selector per line. Blank lines and lines starting with
/// `#` are skipped.
pub fn expand_file_selectors(expression: &str) -> Result<String> {
    let segments = split_segments(expression)
        .with_context(|| format!("failed to split expression {expression:?}"))?;
    if !segments.iter().any(|segment| is_file_selector(segment.text)) {
        return Ok(expression.to_string());
    }

    let mut expanded = Vec::with_capacity(segments.len());
    for segment in segments {
        if !is_file_selector(segment.text) {
            expanded.push(segment.text.to_string());
            continue;
        }
        let path = segment.text[5..].trim();
        if path.is_empty() {
            bail!("file selector is missing a path: {:?}", segment.text);
        }
        let selectors = load_selector_file(Path::new(strip_outer_quotes(path)))?;
        expanded.extend(selectors);
    }
    Ok(expanded.join(","))
}

fn is_file_selector(segment: &str) -> bool {
    segment
        .get(..5)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("file:"))
}

fn load_selector_file(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read page selector file {}", path.display()))?;
    let selectors: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();
    if selectors.is_empty() {
        bail!("no page selectors found in {}", path.display());
    }
    info!(
        count = selectors.len(),
        path = %path.display(),
        "loaded page selectors from file"
    );
    Ok(selectors)
}
