use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::value::{lenient_string, lenient_usize, raw_timestamp, RecordId};
use crate::pipeline::listable::Listable;
use crate::tools::datetime::parse_timestamp;

pub const FACET_LOCATION: &str = "location";

/// Entry of `studentDetails` from the admin students endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(flatten)]
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(default, alias = "totalCourse", deserialize_with = "lenient_usize")]
    pub enrolled_courses_count: usize,
    #[serde(default, deserialize_with = "raw_timestamp")]
    pub created_at: Option<String>,
}

impl Student {
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "Unknown"
        } else {
            &self.name
        }
    }

    /// The email domain stands in for a location on the student cards.
    pub fn location(&self) -> Option<&str> {
        self.email.split_once('@').map(|(_, domain)| domain).filter(|d| !d.is_empty())
    }
}

impl Listable for Student {
    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn title(&self) -> &str {
        &self.name
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }

    fn facet(&self, key: &str) -> Option<String> {
        match key {
            FACET_LOCATION => self.location().map(str::to_string),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_and_location() {
        let s: Student = serde_json::from_str(
            r#"{"_id":"s1","name":"Grace","email":"grace@navy.mil","enrolledCoursesCount":3}"#,
        )
        .unwrap();
        assert_eq!(s.enrolled_courses_count, 3);
        assert_eq!(s.location(), Some("navy.mil"));
        assert_eq!(s.facet(FACET_LOCATION).as_deref(), Some("navy.mil"));

        let s: Student = serde_json::from_str(r#"{"_id":"s2"}"#).unwrap();
        assert_eq!(s.display_name(), "Unknown");
        assert_eq!(s.location(), None);
    }
}
