use chrono::{DateTime, Utc};

use crate::tools::datetime::display_date;

pub const FACET_CATEGORY: &str = "category";
pub const FACET_PRICE: &str = "price";
pub const FACET_LEVEL: &str = "level";
pub const FACET_LANGUAGE: &str = "language";
pub const FACET_STATUS: &str = "status";

/// A record a list screen can filter, sort and page.
pub trait Listable {
    /// Opaque unique id.
    fn id(&self) -> &str;

    /// Title or name, the field the free-text query searches.
    fn title(&self) -> &str;

    /// `None` when the backend sent no timestamp or one that does not parse.
    fn created_at(&self) -> Option<DateTime<Utc>>;

    /// Date column of the admin tables, `N/A` when unknown.
    fn created_label(&self) -> String {
        display_date(self.created_at().as_ref())
    }

    fn status(&self) -> Option<&str> {
        None
    }

    /// Value of the facet `key`, `None` when the item has no such field.
    fn facet(&self, key: &str) -> Option<String> {
        match key {
            FACET_STATUS => self.status().map(str::to_string),
            _ => None,
        }
    }
}

impl<T: Listable + ?Sized> Listable for &T {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn title(&self) -> &str {
        (**self).title()
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        (**self).created_at()
    }

    fn status(&self) -> Option<&str> {
        (**self).status()
    }

    fn facet(&self, key: &str) -> Option<String> {
        (**self).facet(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;

    #[test]
    fn test_created_label() {
        let dated: Category =
            serde_json::from_str(r#"{"_id":"k1","createdAt":"2025-03-05T10:00:00Z"}"#).unwrap();
        assert_eq!(dated.created_label(), "05 Mar 2025");
        assert_eq!((&dated).created_label(), "05 Mar 2025");

        let undated: Category = serde_json::from_str(r#"{"_id":"k2","createdAt":"soon"}"#).unwrap();
        assert_eq!(undated.created_label(), "N/A");
    }
}
