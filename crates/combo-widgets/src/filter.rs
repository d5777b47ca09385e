#![forbid(unsafe_code)]

//! Filter engine.
//!
//! Matching is case-insensitive substring containment against a fixed,
//! ordered reference list. Results keep the reference order; there is no
//! ranking. A query that matches nothing produces the [`MatchList::NoResults`]
//! sentinel, which renders as exactly one "No results" row and can never be
//! highlighted.
//!
//! # Invariants
//!
//! 1. `Matches` indices are strictly ascending (reference order).
//! 2. `Matches` is never empty; zero matches is always `NoResults`.
//! 3. An empty query matches every entry.

/// Label of the single row shown when nothing matches.
pub const NO_RESULTS_LABEL: &str = "No results";

/// The fixed, ordered list of values the combobox offers.
///
/// Lowercased forms are computed once at construction so a keystroke costs
/// one substring scan per entry and no allocation per entry.
#[derive(Debug, Clone, Default)]
pub struct ReferenceList {
    entries: Vec<String>,
    folded: Vec<String>,
}

impl ReferenceList {
    /// Build from any sequence of strings. Order is preserved.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries: Vec<String> = entries.into_iter().map(Into::into).collect();
        let folded = entries.iter().map(|e| e.to_lowercase()).collect();
        Self { entries, folded }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the list has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// Entries in reference order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Exact, case-sensitive membership.
    pub fn contains_exact(&self, value: &str) -> bool {
        self.position_exact(value).is_some()
    }

    /// Index of the entry equal to `value`, case-sensitive.
    pub fn position_exact(&self, value: &str) -> Option<usize> {
        self.entries.iter().position(|e| e == value)
    }

    /// Compute the match list for `query`.
    pub fn filter(&self, query: &str) -> MatchList {
        let needle = query.to_lowercase();
        let hits: Vec<usize> = self
            .folded
            .iter()
            .enumerate()
            .filter(|(_, folded)| folded.contains(needle.as_str()))
            .map(|(i, _)| i)
            .collect();

        combo_core::trace!(query, matches = hits.len(), "filter recomputed");

        if hits.is_empty() {
            MatchList::NoResults
        } else {
            MatchList::Matches(hits)
        }
    }
}

impl<S: Into<String>> FromIterator<S> for ReferenceList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Result of filtering: matching reference indices, or the sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchList {
    /// Non-empty, ascending indices into the reference list.
    Matches(Vec<usize>),
    /// Nothing matched; rendered as a single "No results" row.
    NoResults,
}

impl MatchList {
    /// Rows the popup renders (the sentinel counts as one).
    pub fn row_count(&self) -> usize {
        match self {
            Self::Matches(hits) => hits.len(),
            Self::NoResults => 1,
        }
    }

    /// Rows that can be highlighted (zero for the sentinel).
    pub fn navigable_len(&self) -> usize {
        match self {
            Self::Matches(hits) => hits.len(),
            Self::NoResults => 0,
        }
    }

    /// True for the "No results" sentinel.
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Self::NoResults)
    }

    /// Reference index shown at `row`, if that row is a real match.
    pub fn entry_index(&self, row: usize) -> Option<usize> {
        match self {
            Self::Matches(hits) => hits.get(row).copied(),
            Self::NoResults => None,
        }
    }

    /// Resolve the rows to display text.
    pub fn labels<'a>(&self, reference: &'a ReferenceList) -> Vec<&'a str> {
        match self {
            Self::Matches(hits) => hits.iter().filter_map(|&i| reference.get(i)).collect(),
            Self::NoResults => vec![NO_RESULTS_LABEL],
        }
    }
}

/// Case-insensitive substring test used by [`ReferenceList::filter`].
pub fn matches(entry: &str, query: &str) -> bool {
    entry.to_lowercase().contains(&query.to_lowercase())
}

/// Filter a plain slice without building a [`ReferenceList`].
pub fn filter<S: AsRef<str>>(query: &str, reference: &[S]) -> MatchList {
    let hits: Vec<usize> = reference
        .iter()
        .enumerate()
        .filter(|(_, entry)| matches(entry.as_ref(), query))
        .map(|(i, _)| i)
        .collect();
    if hits.is_empty() {
        MatchList::NoResults
    } else {
        MatchList::Matches(hits)
    }
}
