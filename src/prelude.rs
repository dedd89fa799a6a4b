pub use crate::erx::{Erx, ResultE};
pub use crate::fetcher::{Access, Endpoint, Fetcher};
pub use crate::model::{Category, Course, PriceBand, Student, Topic};
pub use crate::pipeline::{FacetSet, ListView, Listable, Page, SortSpec};
pub use crate::service::{load, Screen, ScreenState};
pub use crate::web::{CookieSession, Notice, Session, SessionSource};
