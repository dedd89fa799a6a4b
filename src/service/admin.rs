use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::courses::courses_endpoint;
use super::screen::Screen;
use crate::erx::{Erx, ResultE};
use crate::fetcher::{Access, Endpoint, Fetcher};
use crate::model::envelope::Shape;
use crate::model::{Category, Student};

pub const CATEGORIES_PAGE_SIZE: usize = 8;
pub const STUDENTS_PAGE_SIZE: usize = 8;

pub const STUDENT_KEYS: &[&str] = &["studentDetails", "students", "data"];

pub fn categories_endpoint() -> Endpoint {
    Endpoint::public("/categories")
}

/// `GET /total`, the admin student listing. An empty search is not sent.
pub fn students_endpoint(search: &str) -> Endpoint {
    Endpoint::admin("/total").query("search", search).shape(Shape::keyed(STUDENT_KEYS))
}

#[derive(Default)]
pub struct Categories;

#[async_trait]
impl Screen for Categories {
    type Item = Category;

    fn name(&self) -> &str {
        "categories"
    }

    fn page_size(&self) -> usize {
        CATEGORIES_PAGE_SIZE
    }

    async fn fetch(&self, fetcher: &Fetcher) -> ResultE<Vec<Category>> {
        fetcher.list(&categories_endpoint()).await
    }
}

/// Admin student list, searched server side.
#[derive(Default)]
pub struct Students {
    pub search: String,
}

impl Students {
    pub fn search(search: &str) -> Self {
        Self { search: search.trim().to_string() }
    }
}

#[async_trait]
impl Screen for Students {
    type Item = Student;

    fn name(&self) -> &str {
        "students"
    }

    fn page_size(&self) -> usize {
        STUDENTS_PAGE_SIZE
    }

    async fn fetch(&self, fetcher: &Fetcher) -> ResultE<Vec<Student>> {
        fetcher.list(&students_endpoint(&self.search)).await
    }
}

/// Dashboard counters. A failed counter stays 0 and adds a warning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub total_courses: usize,
    pub total_students: usize,
    pub warnings: Vec<String>,
}

impl DashboardMetrics {
    pub fn is_partial(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Banner text, `None` when every counter loaded.
    pub fn warning(&self) -> Option<String> {
        metrics_warning(&self.warnings)
    }
}

/// Load both counters in parallel. Only a missing or non-admin session fails.
pub async fn dashboard(fetcher: &Fetcher) -> ResultE<DashboardMetrics> {
    fetcher.authorize(Access::Admin)?;

    let courses = Endpoint::admin(courses_endpoint().path());
    let students = students_endpoint("");
    let (courses, students) = tokio::join!(fetcher.count(&courses), fetcher.count(&students));

    let mut warnings = Vec::new();
    let total_courses = tally(&mut warnings, "total courses", courses);
    let total_students = tally(&mut warnings, "total students", students);

    Ok(DashboardMetrics { total_courses, total_students, warnings })
}

/// Value of one dashboard counter; a failure counts as 0 and is recorded.
pub(crate) fn tally(warnings: &mut Vec<String>, what: &str, result: ResultE<usize>) -> usize {
    match result {
        Ok(n) => n,
        Err(e) => {
            let partial = Erx::partial(what, &e);
            warn!("{}", partial);
            warnings.push(partial.message_string());
            0
        },
    }
}

/// Banner text for the counters that failed, `None` when all loaded.
pub(crate) fn metrics_warning(warnings: &[String]) -> Option<String> {
    if warnings.is_empty() {
        return None;
    }
    Some(format!("Failed to load some metrics: {}", warnings.join("; ")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_students_endpoint() {
        assert_eq!(students_endpoint("").path(), "/total");
        assert_eq!(students_endpoint("ada").path(), "/total?search=ada");
        assert_eq!(Students::search("  ada ").search, "ada");
    }

    #[test]
    fn test_metrics_warning() {
        let mut metrics = DashboardMetrics { total_courses: 3, ..Default::default() };
        assert_eq!(metrics.warning(), None);
        metrics.warnings.push("total students : down".into());
        assert!(metrics.is_partial());
        assert_eq!(
            metrics.warning().as_deref(),
            Some("Failed to load some metrics: total students : down")
        );
    }
}
