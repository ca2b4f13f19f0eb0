use crate::resolve::Resolution;
use hashbrown::HashSet;
use itertools::Itertools;
use serde::Serialize;

/// How segment results become output groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GroupingMode {
    /// Everything is merged into one group, duplicates removed.
    #[default]
    SingleDocument,
    /// Contiguous ranges and pattern sections stay together, other picks
    /// become single pages.
    RespectGroups,
    /// Same as `RespectGroups`, then every group is exploded into one-page
    /// groups once filtering is done.
    SeparateFiles,
}

/// Ordered page indices treated as one output unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    pub pages: Vec<usize>,
    /// Which segment (or pipeline stage) produced this group.
    pub source: String,
}

impl Group {
    pub fn new(pages: Vec<usize>, source: impl Into<String>) -> Self {
        Self {
            pages,
            source: source.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Two or more pages, each one after the previous.
    pub fn is_range(&self) -> bool {
        self.pages.len() > 1 && is_contiguous(&self.pages)
    }

    /// Filename-safe label: `page7`, `pages1-3` or `pages1,3,5`.
    ///
    /// ```
    /// use page_select::Group;
    /// assert_eq!(Group::new(vec![7], "7").label(), "page7");
    /// assert_eq!(Group::new(vec![1, 2, 3], "1-3").label(), "pages1-3");
    /// assert_eq!(Group::new(vec![1, 3, 5], "odd").label(), "pages1,3,5");
    /// ```
    pub fn label(&self) -> String {
        match self.pages.as_slice() {
            [] => "empty".to_string(),
            [page] => format!("page{page}"),
            [first, .., last] if self.is_range() => format!("pages{first}-{last}"),
            pages => format!("pages{}", pages.iter().join(",")),
        }
    }
}

/// Ordered groups returned by [`crate::select_pages`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionResult {
    pub groups: Vec<Group>,
}

impl SelectionResult {
    pub fn new(groups: Vec<Group>) -> Self {
        Self { groups }
    }

    /// No page was selected. Not an error: the caller decides whether to report it.
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(Group::is_empty)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Every selected page in group order, including repeats across groups.
    pub fn pages(&self) -> Vec<usize> {
        self.groups
            .iter()
            .flat_map(|group| group.pages.iter().copied())
            .collect()
    }

    pub fn page_groups(&self) -> Vec<Vec<usize>> {
        self.groups.iter().map(|group| group.pages.clone()).collect()
    }
}

pub(crate) fn is_contiguous(pages: &[usize]) -> bool {
    pages.windows(2).all(|pair| pair[1] == pair[0] + 1)
}

/// Merges per-segment results, in segment order, into groups.
pub fn assemble(segments: &[(String, Resolution)], mode: GroupingMode) -> Vec<Group> {
    match mode {
        GroupingMode::SingleDocument => merge_single_document(segments),
        GroupingMode::RespectGroups | GroupingMode::SeparateFiles => segments
            .iter()
            .flat_map(|(text, resolution)| segment_groups(text, resolution))
            .collect(),
    }
}

fn merge_single_document(segments: &[(String, Resolution)]) -> Vec<Group> {
    let mut seen = HashSet::new();
    let mut pages = Vec::new();
    for (_, resolution) in segments {
        let selected: Box<dyn Iterator<Item = usize> + '_> = match resolution {
            Resolution::Pages(list) => Box::new(list.iter().copied()),
            Resolution::Spans(spans) => Box::new(spans.iter().flat_map(|span| span.clone())),
        };
        for page in selected {
            if seen.insert(page) {
                pages.push(page);
            }
        }
    }
    if pages.is_empty() {
        return Vec::new();
    }
    let source = segments.iter().map(|(text, _)| text).join(", ");
    vec![Group::new(pages, source)]
}

fn segment_groups(text: &str, resolution: &Resolution) -> Vec<Group> {
    match resolution {
        Resolution::Pages(pages) if pages.len() > 1 && is_contiguous(pages) => {
            vec![Group::new(pages.clone(), text)]
        }
        Resolution::Pages(pages) => pages
            .iter()
            .map(|&page| Group::new(vec![page], text))
            .collect(),
        Resolution::Spans(spans) => spans
            .iter()
            .enumerate()
            .map(|(idx, span)| {
                Group::new(span.clone().collect(), format!("{text} (section {})", idx + 1))
            })
            .collect(),
    }
}

/// One group per page, keeping each page's source.
pub fn explode(groups: Vec<Group>) -> Vec<Group> {
    groups
        .into_iter()
        .flat_map(|group| {
            let Group { pages, source } = group;
            pages
                .into_iter()
                .map(move |page| Group::new(vec![page], source.clone()))
        })
        .collect()
}
