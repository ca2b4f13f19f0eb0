use anyhow::{Context, Result};
use page_select::{Document, PageFacts};
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Deserialize)]
#[serde(untagged)]
enum FactsFile {
    Pages(Vec<PageFacts>),
    Document { pages: Vec<PageFacts> },
}

/// Reads page facts from either a bare JSON array or `{"pages": [...]}`.
/// Pages are numbered by their position in the file.
pub fn load_document(path: &Path) -> Result<Document> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read page facts from {}", path.display()))?;
    parse_document(&raw).with_context(|| format!("invalid page facts in {}", path.display()))
}

pub fn parse_document(raw: &str) -> Result<Document> {
    let pages = match serde_json::from_str(raw)? {
        FactsFile::Pages(pages) | FactsFile::Document { pages } => pages,
    };
    Ok(Document::new(pages))
}

#[cfg(test)]
mod tests {
    use super::*;
    use page_select::{ContentKind, PageFactsProvider};

    #[test]
    fn accepts_array_and_object_forms() {
        let array = r#"[
            {"byte_size": 10, "content_type": "text", "text": "a"},
            {"byte_size": 20, "content_type": "image"}
        ]"#;
        let doc = parse_document(array).unwrap();
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.page(2).map(|page| page.content_type), Some(ContentKind::Image));
        assert_eq!(doc.page(2).map(|page| page.index), Some(2));

        let object = r#"{"pages": [{"index": 7, "byte_size": 1, "content_type": "empty"}]}"#;
        let doc = parse_document(object).unwrap();
        assert_eq!(doc.page(1).map(|page| page.index), Some(1));
    }

    #[test]
    fn rejects_unknown_content_type() {
        let raw = r#"[{"byte_size": 10, "content_type": "vector"}]"#;
        assert!(parse_document(raw).is_err());
    }
}
