//! Screens and actions built on the fetcher and the list pipeline.

pub mod actions;
pub mod admin;
pub mod courses;
pub mod learning;
pub mod screen;
pub mod upload;

pub use admin::{dashboard, Categories, DashboardMetrics, Students};
pub use courses::{
    course_detail, course_lectures, AdminCourses, Catalog, CourseDetail, CourseSummary,
};
pub use learning::{
    student_dashboard, EnrolledCourse, EnrolledCourses, EnrolledLecture, StudentMetrics,
};
pub use screen::{load, Screen, ScreenState};
pub use upload::{MediaUploader, UploadHandle, Uploaded};
