//! Fixed-size, 1-based pagination.

/// Items per listing page.
pub const PAGE_SIZE: usize = 30;

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number that was requested.
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T: Clone> Page<T> {
    /// Slice `items` into the requested page.
    #[must_use]
    pub fn of(items: &[T], number: usize) -> Self {
        Self {
            items: paginate(items, number).to_vec(),
            number,
            total_pages: total_pages(items.len()),
            total_items: items.len(),
        }
    }

    /// Whether a later page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    /// Whether an earlier page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.number > 1 && self.number <= self.total_pages
    }
}

/// Items on 1-based page `number`. Out-of-range pages (including 0) are empty.
#[must_use]
pub fn paginate<T>(items: &[T], number: usize) -> &[T] {
    let Some(start) = number
        .checked_sub(1)
        .and_then(|index| index.checked_mul(PAGE_SIZE))
    else {
        return &[];
    };
    let end = start.saturating_add(PAGE_SIZE).min(items.len());
    items.get(start..end).unwrap_or(&[])
}

/// Number of pages needed for `len` items.
#[must_use]
pub const fn total_pages(len: usize) -> usize {
    len.div_ceil(PAGE_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_concatenate_to_full_sequence() {
        let items: Vec<usize> = (0..95).collect();
        let pages = total_pages(items.len());
        assert_eq!(pages, 4);

        let rebuilt: Vec<usize> = (1..=pages)
            .flat_map(|n| paginate(&items, n).iter().copied())
            .collect();
        assert_eq!(rebuilt, items);
    }

    #[test]
    fn test_out_of_range_pages_are_empty() {
        let items: Vec<usize> = (0..10).collect();
        assert!(paginate(&items, 0).is_empty());
        assert!(paginate(&items, 2).is_empty());
        assert!(paginate(&items, usize::MAX).is_empty());
        assert_eq!(paginate(&items, 1).len(), 10);
    }

    #[test]
    fn test_exact_multiple_has_no_trailing_page() {
        assert_eq!(total_pages(60), 2);
        assert_eq!(total_pages(0), 0);
        assert_eq!(total_pages(61), 3);
    }

    #[test]
    fn test_page_navigation_flags() {
        let items: Vec<usize> = (0..45).collect();
        let first = Page::of(&items, 1);
        assert!(first.has_next());
        assert!(!first.has_previous());
        assert_eq!(first.items.len(), 30);

        let last = Page::of(&items, 2);
        assert!(!last.has_next());
        assert!(last.has_previous());
        assert_eq!(last.items.len(), 15);
        assert_eq!(last.total_items, 45);
    }
}
