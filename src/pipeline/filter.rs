use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::listable::{Listable, FACET_PRICE};
use crate::model::PriceBand;

/// Selected values per facet key.
///
/// Values inside one facet are OR-ed, facets are AND-ed. A facet with no
/// selected value does not constrain anything.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetSet {
    facets: BTreeMap<String, BTreeSet<String>>,
}

impl FacetSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(
        mut self,
        key: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.set(key, values);
        self
    }

    /// Replace the selection of `key`.
    pub fn set(
        &mut self,
        key: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) {
        let values: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        let key = key.into();
        if values.is_empty() {
            self.facets.remove(&key);
        } else {
            self.facets.insert(key, values);
        }
    }

    /// Add `value` to `key`, or remove it when already selected. Returns
    /// whether the value is selected afterwards.
    pub fn toggle(&mut self, key: &str, value: &str) -> bool {
        let selected = self.facets.entry(key.to_string()).or_default();
        let now = if selected.remove(value) {
            false
        } else {
            selected.insert(value.to_string());
            true
        };
        if selected.is_empty() {
            self.facets.remove(key);
        }
        now
    }

    pub fn clear(&mut self, key: &str) {
        self.facets.remove(key);
    }

    /// `All` clears the price facet.
    pub fn set_price(&mut self, band: PriceBand) {
        match band {
            PriceBand::All => self.clear(FACET_PRICE),
            other => self.set(FACET_PRICE, [other.name()]),
        }
    }

    pub fn selected(&self, key: &str) -> Option<&BTreeSet<String>> {
        self.facets.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.facets.values().all(BTreeSet::is_empty)
    }

    pub fn active(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.facets.iter().filter(|(_, values)| !values.is_empty())
    }

    /// An item passes when, for each active facet, its value is one of the
    /// selected ones. A missing value never matches an active facet.
    pub fn matches<T: Listable + ?Sized>(&self, item: &T) -> bool {
        self.active()
            .all(|(key, values)| item.facet(key).is_some_and(|v| values.contains(&v)))
    }
}

/// Case-insensitive substring match, the empty query matches everything.
pub fn matches_query(title: &str, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    title.to_lowercase().contains(&query.to_lowercase())
}

/// Items whose title contains `query` and that satisfy every facet, in
/// their original order.
pub fn filter<'a, T: Listable>(items: &'a [T], query: &str, facets: &FacetSet) -> Vec<&'a T> {
    items
        .iter()
        .filter(|item| matches_query(item.title(), query) && facets.matches(*item))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Course;
    use crate::pipeline::listable::{FACET_CATEGORY, FACET_LEVEL};

    fn courses() -> Vec<Course> {
        serde_json::from_value(serde_json::json!([
            {"_id":"1","title":"Rust for Beginners","price":0,"level":"Beginner","category":"dev"},
            {"_id":"2","title":"Advanced RUST","price":20,"level":"Advanced","category":"dev"},
            {"_id":"3","title":"Watercolor","price":0,"level":"Beginner","category":"art"},
            {"_id":"4","title":"Sketching","price":15,"category":"art"}
        ]))
        .unwrap()
    }

    fn ids(items: &[&Course]) -> Vec<String> {
        items.iter().map(|c| c.id.to_string()).collect()
    }

    #[test]
    fn test_query_case_insensitive() {
        let all = courses();
        let hits = filter(&all, "rust", &FacetSet::new());
        assert_eq!(ids(&hits), vec!["1", "2"]);
        assert!(hits.iter().all(|c| c.title.to_lowercase().contains("rust")));
    }

    #[test]
    fn test_empty_inputs() {
        let none: Vec<Course> = Vec::new();
        assert!(filter(&none, "x", &FacetSet::new()).is_empty());
        assert_eq!(filter(&courses(), "", &FacetSet::new()).len(), 4);
    }

    #[test]
    fn test_free_price_facet() {
        let items: Vec<Course> = serde_json::from_value(serde_json::json!([
            {"_id":"a","price":0},{"_id":"b","price":20},{"_id":"c","price":0}
        ]))
        .unwrap();
        let mut facets = FacetSet::new();
        facets.set_price(PriceBand::Free);
        let hits = filter(&items, "", &facets);
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|c| c.price == Some(0.0)));

        facets.set_price(PriceBand::All);
        assert_eq!(filter(&items, "", &facets).len(), 3);
    }

    #[test]
    fn test_or_within_and_across() {
        let all = courses();
        let facets =
            FacetSet::new().with(FACET_CATEGORY, ["dev", "art"]).with(FACET_LEVEL, ["Beginner"]);
        assert_eq!(ids(&filter(&all, "", &facets)), vec!["1", "3"]);

        // course 4 has no level and must not pass an active level facet
        let facets = FacetSet::new().with(FACET_LEVEL, ["Beginner", "Advanced"]);
        assert_eq!(ids(&filter(&all, "", &facets)), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_toggle_and_empty_selection() {
        let mut facets = FacetSet::new();
        assert!(facets.toggle(FACET_CATEGORY, "dev"));
        assert!(!facets.is_empty());
        assert!(!facets.toggle(FACET_CATEGORY, "dev"));
        assert!(facets.is_empty());

        facets.set(FACET_CATEGORY, Vec::<String>::new());
        assert_eq!(filter(&courses(), "", &facets).len(), 4);
    }
}
