use serde::{Deserialize, Serialize};

use crate::erx::{Erx, ResultE};

/// Page numbers are 1-indexed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub current_page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    /// `page_size` below 1 is taken as 1; `current_page` is clamped to
    /// `[1, total_pages]`, or 1 when there are no pages.
    pub fn new(current_page: usize, page_size: usize, total_items: usize) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total_items.div_ceil(page_size);
        let current_page = current_page.clamp(1, total_pages.max(1));

        Self {
            current_page,
            page_size,
            total_items,
            total_pages,
            has_next: current_page < total_pages,
            has_prev: current_page > 1,
        }
    }

    pub fn offset(&self) -> usize {
        (self.current_page - 1) * self.page_size
    }

    /// 1-indexed first and last entry on this page, `(0, 0)` when empty.
    pub fn window(&self) -> (usize, usize) {
        if self.total_items == 0 {
            return (0, 0);
        }
        let first = self.offset() + 1;
        let last = (self.offset() + self.page_size).min(self.total_items);
        (first, last)
    }
}

/// One navigation button.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageControl {
    Prev { enabled: bool },
    Number { page: usize, active: bool },
    Next { enabled: bool },
}

impl PageControl {
    pub fn enabled(&self) -> bool {
        match self {
            PageControl::Prev { enabled } | PageControl::Next { enabled } => *enabled,
            PageControl::Number { .. } => true,
        }
    }
}

/// A window over a derived list.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(flatten)]
    pub meta: PaginationMeta,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> usize {
        self.meta.total_pages
    }

    pub fn current_page(&self) -> usize {
        self.meta.current_page
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Prev, one button per page, next. Always present, boundaries disabled.
    pub fn controls(&self) -> Vec<PageControl> {
        let meta = &self.meta;
        let mut controls = Vec::with_capacity(meta.total_pages + 2);
        controls.push(PageControl::Prev { enabled: meta.has_prev });
        controls.extend(
            (1..=meta.total_pages)
                .map(|page| PageControl::Number { page, active: page == meta.current_page }),
        );
        controls.push(PageControl::Next { enabled: meta.has_next });
        controls
    }

    /// `Showing 6 to 10 of 12 entries`.
    pub fn showing(&self) -> String {
        let (first, last) = self.meta.window();
        format!("Showing {} to {} of {} entries", first, last, self.meta.total_items)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page { items: self.items.into_iter().map(f).collect(), meta: self.meta }
    }
}

/// Slice `items` into the page `current_page` of size `page_size`.
pub fn paginate<T: Clone>(items: &[T], page_size: usize, current_page: usize) -> Page<T> {
    let meta = PaginationMeta::new(current_page, page_size, items.len());
    let start = meta.offset().min(items.len());
    let end = (start + meta.page_size).min(items.len());
    Page { items: items[start..end].to_vec(), meta }
}

/// Split into rows of `size`, the last row may be shorter.
pub fn chunks<T: Clone>(items: &[T], size: usize) -> ResultE<Vec<Vec<T>>> {
    if size == 0 {
        return Err(Erx::validation("size", "chunk size must be greater than 0"));
    }
    Ok(items.chunks(size).map(<[T]>::to_vec).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_partial_page() {
        let items: Vec<u32> = (1..=12).collect();
        let page = paginate(&items, 5, 3);
        assert_eq!(page.items, vec![11, 12]);
        assert_eq!(page.total_pages(), 3);
        assert!(page.meta.has_prev);
        assert!(!page.meta.has_next);
        assert_eq!(page.showing(), "Showing 11 to 12 of 12 entries");
    }

    #[test]
    fn test_clamping() {
        let items: Vec<u32> = (1..=12).collect();
        assert_eq!(paginate(&items, 5, 0).current_page(), 1);
        assert_eq!(paginate(&items, 5, 99).items, vec![11, 12]);

        let empty: Vec<u32> = Vec::new();
        let page = paginate(&empty, 5, 4);
        assert_eq!(page.current_page(), 1);
        assert_eq!(page.total_pages(), 0);
        assert!(page.is_empty());
        assert_eq!(page.showing(), "Showing 0 to 0 of 0 entries");

        assert_eq!(paginate(&items, 0, 2).items, vec![2]);
    }

    #[test]
    fn test_page_bounds_hold() {
        let items: Vec<u32> = (0..23).collect();
        for size in 1..=9 {
            let first = paginate(&items, size, 1);
            assert_eq!(first.total_pages(), items.len().div_ceil(size));
            for p in 1..=first.total_pages() {
                assert!(paginate(&items, size, p).items.len() <= size);
            }
        }
    }

    #[test]
    fn test_controls() {
        let items: Vec<u32> = (1..=12).collect();
        let controls = paginate(&items, 5, 1).controls();
        assert_eq!(controls.len(), 5);
        assert_eq!(controls[0], PageControl::Prev { enabled: false });
        assert_eq!(controls[1], PageControl::Number { page: 1, active: true });
        assert_eq!(controls[4], PageControl::Next { enabled: true });

        let empty: Vec<u32> = Vec::new();
        let controls = paginate(&empty, 5, 1).controls();
        let expected =
            vec![PageControl::Prev { enabled: false }, PageControl::Next { enabled: false }];
        assert_eq!(controls, expected);
    }

    #[test]
    fn test_chunks() {
        let rows = chunks(&[1, 2, 3, 4, 5], 2).unwrap();
        assert_eq!(rows, vec![vec![1, 2], vec![3, 4], vec![5]]);
        assert!(chunks(&[1], 0).unwrap_err().is_validation());
        assert!(chunks::<u8>(&[], 3).unwrap().is_empty());
    }
}
