use page_syntax::ContentKind;
use serde::{Deserialize, Serialize};

/// Read-only snapshot of one page, supplied by whatever extracted the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageFacts {
    /// 1-based position in the document.
    #[serde(default)]
    pub index: usize,
    pub byte_size: u64,
    pub content_type: ContentKind,
    #[serde(default)]
    pub text: String,
}

impl PageFacts {
    pub fn new(byte_size: u64, content_type: ContentKind, text: impl Into<String>) -> Self {
        Self {
            index: 0,
            byte_size,
            content_type,
            text: text.into(),
        }
    }
}

/// Source of page facts for one evaluation. Page `i` lives at `pages()[i - 1]`.
pub trait PageFactsProvider: Sync {
    fn pages(&self) -> &[PageFacts];

    fn page_count(&self) -> usize {
        self.pages().len()
    }

    fn page(&self, index: usize) -> Option<&PageFacts> {
        index.checked_sub(1).and_then(|idx| self.pages().get(idx))
    }
}

/// An ordered, immutable set of pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pages: Vec<PageFacts>,
}

impl Document {
    /// Takes ownership of `pages` in document order and renumbers them `1..=N`.
    pub fn new(mut pages: Vec<PageFacts>) -> Self {
        for (idx, page) in pages.iter_mut().enumerate() {
            page.index = idx + 1;
        }
        Self { pages }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl FromIterator<PageFacts> for Document {
    fn from_iter<T: IntoIterator<Item = PageFacts>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl PageFactsProvider for Document {
    fn pages(&self) -> &[PageFacts] {
        &self.pages
    }
}
