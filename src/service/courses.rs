use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::screen::Screen;
use crate::erx::{Erx, ResultE};
use crate::fetcher::{Endpoint, Fetcher};
use crate::model::{Course, Lecture};
use crate::pipeline::{Listable, SortSpec};
use crate::web::url::segment;

pub const ADMIN_COURSES_PAGE_SIZE: usize = 5;
pub const CATALOG_PAGE_SIZE: usize = 9;

pub fn courses_endpoint() -> Endpoint {
    Endpoint::public("/courses")
}

pub fn lectures_endpoint(course_id: &str) -> Endpoint {
    Endpoint::public(format!("/courses/{}/lectures", segment(course_id)))
}

/// Admin course table.
#[derive(Default)]
pub struct AdminCourses;

#[async_trait]
impl Screen for AdminCourses {
    type Item = Course;

    fn name(&self) -> &str {
        "admin-courses"
    }

    fn page_size(&self) -> usize {
        ADMIN_COURSES_PAGE_SIZE
    }

    fn default_sort(&self) -> SortSpec {
        SortSpec::Newest
    }

    async fn fetch(&self, fetcher: &Fetcher) -> ResultE<Vec<Course>> {
        fetcher.list(&courses_endpoint()).await
    }
}

/// Catalog card: a course plus its lecture count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseSummary {
    #[serde(flatten)]
    pub course: Course,
    pub lecture_count: usize,
}

impl Listable for CourseSummary {
    fn id(&self) -> &str {
        self.course.id()
    }

    fn title(&self) -> &str {
        self.course.title()
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        Listable::created_at(&self.course)
    }

    fn status(&self) -> Option<&str> {
        Listable::status(&self.course)
    }

    fn facet(&self, key: &str) -> Option<String> {
        self.course.facet(key)
    }
}

/// Public course grid. Lecture counts are fetched per course; a failed
/// count shows as 0.
#[derive(Default)]
pub struct Catalog;

#[async_trait]
impl Screen for Catalog {
    type Item = CourseSummary;

    fn name(&self) -> &str {
        "catalog"
    }

    fn page_size(&self) -> usize {
        CATALOG_PAGE_SIZE
    }

    async fn fetch(&self, fetcher: &Fetcher) -> ResultE<Vec<CourseSummary>> {
        let courses: Vec<Course> = fetcher.list(&courses_endpoint()).await?;
        let counts = Fetcher::fan_out_or(&courses, 0usize, |course| async move {
            fetcher.count(&lectures_endpoint(&course.id)).await
        })
        .await;

        Ok(courses
            .into_iter()
            .zip(counts)
            .map(|(course, lecture_count)| CourseSummary { course, lecture_count })
            .collect())
    }
}

/// Lectures of one course with their populated topics, `GET /courses/:id/lectures`.
pub async fn course_lectures(fetcher: &Fetcher, course_id: &str) -> ResultE<Vec<Lecture>> {
    fetcher.list(&lectures_endpoint(course_id)).await
}

/// A course page: the course and its curriculum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseDetail {
    pub course: Course,
    pub lectures: Vec<Lecture>,
}

impl CourseDetail {
    pub fn lecture_count(&self) -> usize {
        self.lectures.len()
    }
}

/// One course by id, `GET /courses/:id`, fetched together with its lectures.
/// The course may come bare or wrapped as `{ course }`. A failed lecture
/// list leaves the curriculum empty; a failed course fails the call.
pub async fn course_detail(fetcher: &Fetcher, course_id: &str) -> ResultE<CourseDetail> {
    let endpoint = Endpoint::public(format!("/courses/{}", segment(course_id)));
    let (course, lectures) =
        tokio::join!(fetcher.value(&endpoint), course_lectures(fetcher, course_id));

    let course = match course? {
        Value::Object(mut map) if map.get("course").map(Value::is_object).unwrap_or(false) => {
            map.remove("course").unwrap_or_default()
        },
        Value::Null => {
            return Err(Erx::decode(&format!("course {} missing from response", course_id)));
        },
        other => other,
    };
    let course: Course = serde_json::from_value(course)?;

    let lectures = lectures.unwrap_or_else(|e| {
        warn!("{}", Erx::partial(&format!("lectures of course {}", course_id), &e));
        Vec::new()
    });

    Ok(CourseDetail { course, lectures })
}
