use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::value::{lenient_string, lenient_usize, raw_timestamp, RecordId};
use crate::pipeline::listable::Listable;
use crate::tools::datetime::parse_timestamp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(flatten)]
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, alias = "coursesCount", deserialize_with = "lenient_usize")]
    pub course_count: usize,
    #[serde(default, deserialize_with = "raw_timestamp")]
    pub created_at: Option<String>,
}

impl Listable for Category {
    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn title(&self) -> &str {
        &self.name
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }
}

/// Body of `POST /categories` and `PUT /categories/:id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CategoryName {
    #[validate(length(min = 1, message = "Category name is required."))]
    pub name: String,
}

impl CategoryName {
    pub fn new(name: &str) -> Self {
        Self { name: name.trim().to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode() {
        let json = r#"{"_id":"k1","id":"k1","name":"Design","coursesCount":4}"#;
        let c: Category = serde_json::from_str(json).unwrap();
        assert_eq!(c.id, "k1");
        assert_eq!(c.title(), "Design");
        assert_eq!(c.course_count, 4);
        assert!(Listable::created_at(&c).is_none());
    }

    #[test]
    fn test_blank_name_rejected() {
        assert!(CategoryName::new("   ").validate().is_err());
        assert!(CategoryName::new(" Design ").validate().is_ok());
        assert_eq!(CategoryName::new(" Design ").name, "Design");
    }
}
