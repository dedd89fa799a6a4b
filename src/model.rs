//! Records returned by the EduGlobal backend, decoded leniently from the
//! wire names the API uses (`_id`, `createdAt`, `courseImage`, ...).

pub mod category;
pub mod course;
pub mod envelope;
pub mod lecture;
pub mod student;
pub mod value;

pub use category::Category;
pub use course::{Course, CourseStatus, PriceBand};
pub use envelope::Shape;
pub use lecture::{Lecture, Topic};
pub use student::Student;
