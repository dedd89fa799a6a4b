//! Client-side list pipeline: filter → sort → paginate over fetched items.
//!
//! Every stage works on borrowed items; the fetched list is never mutated.

pub mod filter;
pub mod listable;
pub mod pagination;
pub mod sort;
pub mod view;

pub use filter::{filter, FacetSet};
pub use listable::Listable;
pub use pagination::{chunks, paginate, Page, PageControl, PaginationMeta};
pub use sort::{sort, SortSpec};
pub use view::ListView;
