use crate::model::{normalize_for_search, Dataset, Item};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The trimmed query was empty; callers show history and initial content.
    NoActiveQuery,
    Matches(Vec<Item>),
}

impl SearchOutcome {
    pub fn matches(&self) -> Option<&[Item]> {
        match self {
            Self::NoActiveQuery => None,
            Self::Matches(items) => Some(items),
        }
    }
}

pub fn search(dataset: &Dataset, raw_query: &str) -> SearchOutcome {
    let trimmed = raw_query.trim();
    if trimmed.is_empty() {
        return SearchOutcome::NoActiveQuery;
    }

    let normalized_query = normalize_for_search(trimmed);
    let results = dataset
        .items()
        .iter()
        .filter(|item| matches(item, &normalized_query))
        .cloned()
        .collect();

    SearchOutcome::Matches(results)
}

/// `normalized_query` must already be normalized.
pub fn matches(item: &Item, normalized_query: &str) -> bool {
    item.normalized_nome().contains(normalized_query)
        || item.normalized_descricao().contains(normalized_query)
        || item
            .normalized_tags()
            .iter()
            .any(|tag| tag.contains(normalized_query))
}
