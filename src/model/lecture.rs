use serde::{Deserialize, Serialize};
use validator::Validate;

use super::value::{lenient_bool, lenient_string, populated, RecordId};

pub const RESOURCE_VIDEO: &str = "video";
pub const RESOURCE_PDF: &str = "pdf";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lecture {
    #[serde(flatten)]
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_premium: bool,
    /// Populated topics, as `GET /courses/:id/lectures` returns them.
    #[serde(default, deserialize_with = "populated")]
    pub topics: Vec<Topic>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    #[serde(flatten)]
    pub id: RecordId,
    #[serde(default, alias = "title", deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, alias = "type", deserialize_with = "lenient_string")]
    pub resource_type: String,
    #[serde(default, alias = "url", deserialize_with = "lenient_string")]
    pub resource_link: String,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub completed: bool,
}

impl Topic {
    pub fn is_video(&self) -> bool {
        self.resource_type == RESOURCE_VIDEO
    }
}

/// Body of `POST /courses/:id/lectures`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewLecture {
    #[validate(length(min = 1, message = "Lecture title is required."))]
    pub title: String,
}

/// Body of `POST /lectures/:id/topics`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewTopic {
    #[validate(length(min = 1, message = "Topic name and resource type are required."))]
    pub name: String,
    pub description: String,
    #[validate(length(min = 1, message = "Topic name and resource type are required."))]
    pub resource_type: String,
    #[validate(length(min = 1, message = "Please provide a file or URL."))]
    pub resource_link: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_aliases() {
        let t: Topic = serde_json::from_value(serde_json::json!({
            "_id": "t1",
            "name": "Setup",
            "resourceType": "video",
            "resourceLink": "https://v/1",
            "completed": true
        }))
        .unwrap();
        assert!(t.is_video());
        assert!(t.completed);

        let json = r#"{"id":"t2","title":"Notes","type":"pdf","url":"https://d/2"}"#;
        let t: Topic = serde_json::from_str(json).unwrap();
        assert_eq!(t.name, "Notes");
        assert_eq!(t.resource_type, RESOURCE_PDF);
        assert!(!t.completed);
    }

    #[test]
    fn test_new_topic_needs_link() {
        let topic = NewTopic {
            name: "Setup".into(),
            resource_type: RESOURCE_VIDEO.into(),
            ..Default::default()
        };
        let err = topic.validate().unwrap_err();
        assert!(err.field_errors().contains_key("resource_link"));
    }

    #[test]
    fn test_lecture_keeps_populated_topics() {
        let l: Lecture = serde_json::from_str(
            r#"{"_id":"l1","id":"l1","title":"Intro","topics":["t0",{"_id":"t1","name":"Setup"}]}"#,
        )
        .unwrap();
        assert_eq!(l.id, "l1");
        assert_eq!(l.topics.len(), 1);
        assert_eq!(l.topics[0].name, "Setup");

        let l: Lecture = serde_json::from_str(r#"{"_id":"l2"}"#).unwrap();
        assert!(l.topics.is_empty());
    }
}
