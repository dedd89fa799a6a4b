use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::value::{
    id_or_document, lenient_bool, lenient_f64, lenient_string, lenient_usize, raw_timestamp,
    RecordId,
};
use crate::pipeline::listable::{
    Listable, FACET_CATEGORY, FACET_LANGUAGE, FACET_LEVEL, FACET_PRICE, FACET_STATUS,
};
use crate::tools::datetime::parse_timestamp;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_ACCEPTED: &str = "accepted";
pub const STATUS_REJECTED: &str = "rejected";

pub const DEFAULT_LEVEL: &str = "All Level";

/// Course as listed by `GET /courses`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(flatten)]
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub short_description: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "id_or_document")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub pricing_model: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub level: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub language: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub course_image: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub course_time: String,
    #[serde(default, deserialize_with = "lenient_usize")]
    pub total_lecture: usize,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub featured: bool,
    #[serde(default, deserialize_with = "raw_timestamp")]
    pub created_at: Option<String>,
    /// Embedded lecture stubs, present on the enrolled-courses endpoint.
    #[serde(default)]
    pub lectures: Vec<LectureStub>,
}

/// A lecture reference inside a course document: a bare id or `{ _id, title, topics }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value")]
pub struct LectureStub {
    pub id: String,
    pub title: String,
    /// Topic ids in display order.
    pub topics: Vec<String>,
}

impl From<serde_json::Value> for LectureStub {
    fn from(value: serde_json::Value) -> Self {
        let as_id = |v: &serde_json::Value| match v {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(m) => {
                m.get("_id").or_else(|| m.get("id")).and_then(|i| i.as_str()).map(str::to_string)
            },
            _ => None,
        };

        let id = as_id(&value).unwrap_or_default();
        let title = value.get("title").and_then(|t| t.as_str()).unwrap_or_default().to_string();
        let topics = value
            .get("topics")
            .and_then(|t| t.as_array())
            .map(|topics| topics.iter().filter_map(as_id).collect())
            .unwrap_or_default();

        LectureStub { id, title, topics }
    }
}

/// Price filter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceBand {
    All,
    Free,
    Paid,
}

impl PriceBand {
    pub fn name(&self) -> &'static str {
        match self {
            PriceBand::All => "All",
            PriceBand::Free => "Free",
            PriceBand::Paid => "Paid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseStatus {
    Pending,
    Accepted,
    Rejected,
    Other,
}

impl Course {
    /// `pricingModel` wins over the number, so `{ price: 20, pricingModel: "free" }`
    /// is Free here rather than in neither band. No price at all counts as free.
    pub fn price_band(&self) -> PriceBand {
        match self.pricing_model.to_lowercase().as_str() {
            "free" => PriceBand::Free,
            "paid" => PriceBand::Paid,
            _ => match self.price {
                Some(p) if p > 0.0 => PriceBand::Paid,
                _ => PriceBand::Free,
            },
        }
    }

    pub fn is_free(&self) -> bool {
        self.price_band() == PriceBand::Free
    }

    /// Missing status means the course still awaits review.
    pub fn status_or_pending(&self) -> &str {
        if self.status.is_empty() {
            STATUS_PENDING
        } else {
            &self.status
        }
    }

    pub fn course_status(&self) -> CourseStatus {
        match self.status_or_pending() {
            STATUS_PENDING => CourseStatus::Pending,
            STATUS_ACCEPTED => CourseStatus::Accepted,
            STATUS_REJECTED => CourseStatus::Rejected,
            _ => CourseStatus::Other,
        }
    }

    pub fn level_or_default(&self) -> &str {
        if self.level.is_empty() {
            DEFAULT_LEVEL
        } else {
            &self.level
        }
    }

    /// `N20` style label, `Free` for free courses.
    pub fn price_label(&self) -> String {
        match (self.price_band(), self.price) {
            (PriceBand::Paid, Some(p)) if p.fract() == 0.0 => format!("N{}", p as i64),
            (PriceBand::Paid, Some(p)) => format!("N{:.2}", p),
            _ => "Free".to_string(),
        }
    }
}

impl Listable for Course {
    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }

    fn status(&self) -> Option<&str> {
        Some(self.status_or_pending())
    }

    fn facet(&self, key: &str) -> Option<String> {
        let non_empty = |s: &str| if s.is_empty() { None } else { Some(s.to_string()) };
        match key {
            FACET_CATEGORY => self.category.clone(),
            FACET_PRICE => Some(self.price_band().name().to_string()),
            FACET_LEVEL => non_empty(&self.level),
            FACET_LANGUAGE => non_empty(&self.language),
            FACET_STATUS => Some(self.status_or_pending().to_string()),
            _ => None,
        }
    }
}

/// Body of `POST /courses`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewCourse {
    #[validate(length(min = 1, message = "Course title is required."))]
    pub title: String,
    pub short_description: String,
    #[validate(length(min = 1, message = "Please select a category."))]
    pub category: String,
    pub level: String,
    pub language: String,
    pub featured: bool,
    pub course_time: String,
    pub total_lecture: String,
    pub price: String,
    pub discount_price: String,
    pub discount_enabled: bool,
    pub description: String,
    #[validate(url(message = "Course image must be a url."))]
    pub course_image: Option<String>,
    #[serde(rename = "videoURL")]
    pub video_url: String,
}

impl NewCourse {
    /// Blank optional fields get the defaults the course form uses.
    pub fn normalized(&self) -> NewCourse {
        let mut course = self.clone();
        course.title = course.title.trim().to_string();
        if course.level.is_empty() {
            course.level = DEFAULT_LEVEL.to_string();
        }
        course.course_image = course.course_image.filter(|url| !url.is_empty());
        course
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn course(json: &str) -> Course {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_decode_wire_names() {
        let c = course(
            r#"{"_id":"c1","title":"Rust","category":{"_id":"cat9","name":"Dev"},
                "price":"25","level":"Beginner","courseImage":"https://img/x.png",
                "createdAt":"2025-03-05T10:00:00Z","totalLecture":"12",
                "lectures":["l1",{"_id":"l2","title":"Intro","topics":["t1",{"_id":"t2"}]}]}"#,
        );
        assert_eq!(c.id, "c1");
        assert_eq!(c.category.as_deref(), Some("cat9"));
        assert_eq!(c.price, Some(25.0));
        assert_eq!(c.total_lecture, 12);
        assert_eq!(c.lectures.len(), 2);
        assert_eq!(c.lectures[0].id, "l1");
        assert_eq!(c.lectures[1].topics, vec!["t1".to_string(), "t2".to_string()]);
        assert!(Listable::created_at(&c).is_some());
    }

    #[test]
    fn test_price_band() {
        assert_eq!(course(r#"{"_id":"a","price":0}"#).price_band(), PriceBand::Free);
        assert_eq!(course(r#"{"_id":"a","price":20}"#).price_band(), PriceBand::Paid);
        assert_eq!(course(r#"{"_id":"a"}"#).price_band(), PriceBand::Free);
        let disagreeing = course(r#"{"_id":"a","price":20,"pricingModel":"free"}"#);
        assert_eq!(disagreeing.price_band(), PriceBand::Free);
        assert_eq!(course(r#"{"_id":"a","pricingModel":"paid"}"#).price_band(), PriceBand::Paid);
        assert_eq!(course(r#"{"_id":"a","price":20}"#).price_label(), "N20");
        assert_eq!(course(r#"{"_id":"a","price":0}"#).price_label(), "Free");
    }

    #[test]
    fn test_status_defaults_to_pending() {
        let c = course(r#"{"_id":"a"}"#);
        assert_eq!(c.course_status(), CourseStatus::Pending);
        assert_eq!(c.facet(FACET_STATUS).as_deref(), Some(STATUS_PENDING));
        assert_eq!(c.facet(FACET_LEVEL), None);
        assert_eq!(c.level_or_default(), DEFAULT_LEVEL);
    }

    #[test]
    fn test_new_course_validation() {
        let mut draft = NewCourse { title: "Rust".into(), ..Default::default() };
        let err = draft.validate().unwrap_err();
        assert!(err.field_errors().contains_key("category"));

        draft.category = "cat1".into();
        draft.course_image = Some("not a url".into());
        assert!(draft.validate().is_err());

        draft.course_image = Some(String::new());
        assert!(draft.normalized().validate().is_ok());
        assert_eq!(draft.normalized().level, DEFAULT_LEVEL);
    }
}
