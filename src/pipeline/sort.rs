use std::cmp::Reverse;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::listable::Listable;
use crate::model::course::{STATUS_ACCEPTED, STATUS_REJECTED};

/// Named orderings offered by the sort dropdowns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortSpec {
    /// The "Sort by" placeholder: keep fetch order.
    #[default]
    Unsorted,
    Newest,
    Oldest,
    Accepted,
    Rejected,
    TitleAsc,
}

impl SortSpec {
    pub fn all() -> &'static [SortSpec] {
        &[
            SortSpec::Unsorted,
            SortSpec::Newest,
            SortSpec::Oldest,
            SortSpec::Accepted,
            SortSpec::Rejected,
            SortSpec::TitleAsc,
        ]
    }

    /// Unknown names fall back to `Unsorted`.
    pub fn parse(name: &str) -> SortSpec {
        match name.trim().to_lowercase().as_str() {
            "newest" => SortSpec::Newest,
            "oldest" => SortSpec::Oldest,
            "accepted" => SortSpec::Accepted,
            "rejected" => SortSpec::Rejected,
            "title" | "titleasc" | "a-z" => SortSpec::TitleAsc,
            _ => SortSpec::Unsorted,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SortSpec::Unsorted => "Sort by",
            SortSpec::Newest => "Newest",
            SortSpec::Oldest => "Oldest",
            SortSpec::Accepted => "Accepted",
            SortSpec::Rejected => "Rejected",
            SortSpec::TitleAsc => "Title",
        }
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Stable in-place sort. Items without a parseable date go last for both
/// date orderings; the status orderings only move matches to the front.
pub fn sort<T: Listable>(items: &mut [T], spec: SortSpec) {
    match spec {
        SortSpec::Unsorted => {},
        SortSpec::Newest => items.sort_by_cached_key(|item| {
            let at = item.created_at();
            (at.is_none(), Reverse(at))
        }),
        SortSpec::Oldest => items.sort_by_cached_key(|item| {
            let at = item.created_at();
            (at.is_none(), at)
        }),
        SortSpec::Accepted => items.sort_by_key(|item| item.status() != Some(STATUS_ACCEPTED)),
        SortSpec::Rejected => items.sort_by_key(|item| item.status() != Some(STATUS_REJECTED)),
        SortSpec::TitleAsc => items.sort_by_cached_key(|item| item.title().to_lowercase()),
    }
}
