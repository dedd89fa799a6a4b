use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::admin::{metrics_warning, tally};
use super::courses::courses_endpoint;
use super::screen::Screen;
use crate::erx::ResultE;
use crate::fetcher::{Access, Endpoint, Fetcher};
use crate::model::envelope::{self, Shape};
use crate::model::{Course, Topic};
use crate::pipeline::Listable;
use crate::web::url::segment;

pub const ENROLLED_PAGE_SIZE: usize = 5;

/// A single course document carries a `lectures` array itself, so only the
/// course wrappers count as list keys here.
pub const ENROLLED_KEYS: &[&str] = &["courses", "enrolledCourses", "data"];

pub fn enrolled_endpoint() -> Endpoint {
    Endpoint::bearer("/courses/user/courses").shape(Shape::keyed(ENROLLED_KEYS).or_single())
}

pub fn topics_endpoint(lecture_id: &str) -> Endpoint {
    Endpoint::bearer(format!("/lectures/{}/topics", segment(lecture_id)))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrolledLecture {
    pub id: String,
    pub title: String,
    pub topics: Vec<Topic>,
}

impl EnrolledLecture {
    pub fn completed_topics(&self) -> usize {
        self.topics.iter().filter(|t| t.completed).count()
    }

    pub fn progress(&self) -> u8 {
        percent(self.completed_topics(), self.topics.len())
    }
}

/// An enrolled course with its lectures and topic progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrolledCourse {
    pub course: Course,
    pub lectures: Vec<EnrolledLecture>,
}

impl EnrolledCourse {
    pub fn total_topics(&self) -> usize {
        self.lectures.iter().map(|l| l.topics.len()).sum()
    }

    pub fn completed_topics(&self) -> usize {
        self.lectures.iter().map(EnrolledLecture::completed_topics).sum()
    }

    /// Whole percent, truncated. 0 for a course without topics.
    pub fn progress(&self) -> u8 {
        percent(self.completed_topics(), self.total_topics())
    }

    pub fn is_complete(&self) -> bool {
        self.total_topics() > 0 && self.completed_topics() == self.total_topics()
    }

    /// Locally mark a topic done after the backend accepted it.
    pub fn mark_completed(&mut self, lecture_id: &str, topic_id: &str) -> bool {
        let topic = self
            .lectures
            .iter_mut()
            .filter(|l| l.id == lecture_id)
            .flat_map(|l| l.topics.iter_mut())
            .find(|t| t.id == topic_id);
        match topic {
            Some(topic) => {
                topic.completed = true;
                true
            },
            None => false,
        }
    }
}

fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    (done.min(total) * 100 / total) as u8
}

impl Listable for EnrolledCourse {
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

/// The student's courses. Topic lists are fetched per lecture, across all
/// courses at once; a failed list shows as empty.
#[derive(Default)]
pub struct EnrolledCourses;

#[async_trait]
impl Screen for EnrolledCourses {
    type Item = EnrolledCourse;

    fn name(&self) -> &str {
        "enrolled-courses"
    }

    fn page_size(&self) -> usize {
        ENROLLED_PAGE_SIZE
    }

    async fn fetch(&self, fetcher: &Fetcher) -> ResultE<Vec<EnrolledCourse>> {
        let courses: Vec<Course> = fetcher.list(&enrolled_endpoint()).await?;

        let stubs: Vec<(usize, &str, &str)> = courses
            .iter()
            .enumerate()
            .flat_map(|(index, course)| {
                course.lectures.iter().map(move |l| (index, l.id.as_str(), l.title.as_str()))
            })
            .filter(|(_, id, _)| !id.is_empty())
            .collect();

        let none = Vec::<Topic>::new();
        let topics = Fetcher::fan_out_or(&stubs, none, |(_, lecture_id, _)| async move {
            fetcher.list::<Topic>(&topics_endpoint(lecture_id)).await
        })
        .await;

        let mut lectures: Vec<Vec<EnrolledLecture>> = vec![Vec::new(); courses.len()];
        for ((index, id, title), topics) in stubs.iter().zip(topics) {
            let lecture = EnrolledLecture { id: id.to_string(), title: title.to_string(), topics };
            lectures[*index].push(lecture);
        }

        Ok(courses
            .iter()
            .cloned()
            .zip(lectures)
            .map(|(course, lectures)| EnrolledCourse { course, lectures })
            .collect())
    }
}

/// Student dashboard counters. A failed counter stays 0 and adds a warning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentMetrics {
    pub total_courses: usize,
    pub enrolled: usize,
    pub warnings: Vec<String>,
}

impl StudentMetrics {
    pub fn is_partial(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn warning(&self) -> Option<String> {
        metrics_warning(&self.warnings)
    }
}

/// `{ count }` when the backend sends one, otherwise the number of courses
/// in whatever shape the enrolled endpoint answered with.
fn enrolled_count(value: Value) -> ResultE<usize> {
    if let Some(n) = value.get("count").and_then(Value::as_u64) {
        return Ok(n as usize);
    }
    let shape = Shape::keyed(ENROLLED_KEYS).or_single();
    Ok(envelope::normalize::<Value>(value, shape)?.len())
}

/// Platform course total next to the student's own enrollments. Only a
/// missing session fails.
pub async fn student_dashboard(fetcher: &Fetcher) -> ResultE<StudentMetrics> {
    fetcher.authorize(Access::Bearer)?;

    let enrolled = async { enrolled_count(fetcher.value(&enrolled_endpoint()).await?) };
    let courses_ep = courses_endpoint();
    let (courses, enrolled) = tokio::join!(fetcher.count(&courses_ep), enrolled);

    let mut warnings = Vec::new();
    let total_courses = tally(&mut warnings, "total courses", courses);
    let enrolled = tally(&mut warnings, "enrolled courses", enrolled);

    Ok(StudentMetrics { total_courses, enrolled, warnings })
}
