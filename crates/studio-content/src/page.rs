//! Pagination
//!
//! Page numbers are 1-based and clamped into range: asking for page 0 or a
//! page past the end returns the nearest valid page rather than an error.

use serde::Serialize;

/// One page of a listing
#[derive(Clone, Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    /// Slice `items` into the requested page
    pub fn paginate(items: Vec<T>, page: usize, per_page: usize) -> Self {
        let per_page = per_page.max(1);
        let total_items = items.len();
        let total_pages = total_items.div_ceil(per_page).max(1);
        let page = page.clamp(1, total_pages);

        let start = (page - 1) * per_page;
        let items: Vec<T> = items
            .into_iter()
            .skip(start)
            .take(per_page)
            .collect();

        Self {
            items,
            page,
            per_page,
            total_items,
            total_pages,
            has_next: page < total_pages,
            has_previous: page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_the_requested_page() {
        let page = Page::paginate((1..=20).collect(), 2, 6);
        assert_eq!(page.items, vec![7, 8, 9, 10, 11, 12]);
        assert_eq!(page.total_pages, 4);
        assert!(page.has_next);
        assert!(page.has_previous);
    }

    #[test]
    fn clamps_out_of_range_pages() {
        let page = Page::paginate((1..=5).collect::<Vec<_>>(), 99, 9);
        assert_eq!(page.page, 1);
        assert_eq!(page.items.len(), 5);

        let page = Page::paginate((1..=5).collect::<Vec<_>>(), 0, 2);
        assert_eq!(page.page, 1);
    }

    #[test]
    fn empty_listing_is_one_empty_page() {
        let page = Page::paginate(Vec::<i32>::new(), 1, 9);
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
        assert!(!page.has_next);
        assert!(!page.has_previous);
    }
}
