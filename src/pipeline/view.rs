use super::filter::{filter, FacetSet};
use super::listable::Listable;
use super::pagination::{paginate, Page, PaginationMeta};
use super::sort::{sort, SortSpec};
use crate::model::PriceBand;

/// Items of one screen plus its query, facet, sort and page state.
#[derive(Clone, Debug)]
pub struct ListView<T> {
    items: Vec<T>,
    query: String,
    facets: FacetSet,
    sort: SortSpec,
    page_size: usize,
    current_page: usize,
}

impl<T: Listable> ListView<T> {
    pub fn new(items: Vec<T>, page_size: usize) -> Self {
        Self {
            items,
            query: String::new(),
            facets: FacetSet::new(),
            sort: SortSpec::Unsorted,
            page_size: page_size.max(1),
            current_page: 1,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn facets(&self) -> &FacetSet {
        &self.facets
    }

    pub fn sort_spec(&self) -> SortSpec {
        self.sort
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_query(&mut self, query: impl Into<String>) -> &mut Self {
        self.query = query.into();
        self.current_page = 1;
        self
    }

    pub fn set_facet(
        &mut self,
        key: &str,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> &mut Self {
        self.facets.set(key, values);
        self.current_page = 1;
        self
    }

    pub fn toggle_facet(&mut self, key: &str, value: &str) -> &mut Self {
        self.facets.toggle(key, value);
        self.current_page = 1;
        self
    }

    pub fn set_price(&mut self, band: PriceBand) -> &mut Self {
        self.facets.set_price(band);
        self.current_page = 1;
        self
    }

    pub fn clear_facets(&mut self) -> &mut Self {
        self.facets = FacetSet::new();
        self.current_page = 1;
        self
    }

    pub fn set_sort(&mut self, spec: SortSpec) -> &mut Self {
        self.sort = spec;
        self.current_page = 1;
        self
    }

    pub fn set_page_size(&mut self, page_size: usize) -> &mut Self {
        self.page_size = page_size.max(1);
        self.current_page = 1;
        self
    }

    /// Swap in freshly fetched items, keeping the query state.
    pub fn replace_items(&mut self, items: Vec<T>) -> &mut Self {
        self.items = items;
        self.current_page = 1;
        self
    }

    /// Filtered and sorted, before paging.
    pub fn visible(&self) -> Vec<&T> {
        let mut visible = filter(&self.items, &self.query, &self.facets);
        sort(&mut visible, self.sort);
        visible
    }

    pub fn meta(&self) -> PaginationMeta {
        let total = filter(&self.items, &self.query, &self.facets).len();
        PaginationMeta::new(self.current_page, self.page_size, total)
    }

    pub fn page(&self) -> Page<&T> {
        paginate(&self.visible(), self.page_size, self.current_page)
    }

    pub fn go_to(&mut self, page: usize) -> &mut Self {
        self.current_page = page;
        self.current_page = self.meta().current_page;
        self
    }

    pub fn next(&mut self) -> &mut Self {
        let next = self.current_page.saturating_add(1);
        self.go_to(next)
    }

    pub fn prev(&mut self) -> &mut Self {
        let prev = self.current_page.saturating_sub(1);
        self.go_to(prev)
    }
}
