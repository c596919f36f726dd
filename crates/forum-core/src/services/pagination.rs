//! Offset/limit page windows over a counted listing.

/// The slice of the listing that one page covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub offset: u64,
    pub limit: u64,
    pub total_pages: u64,
}

/// Coerce a raw page parameter into a 1-based page number.
///
/// Absent or non-numeric input means page 1; values below 1 clamp to 1.
pub fn page_number(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .map_or(1, |n| n.max(1).unsigned_abs())
}

/// Compute the window for `page` given the page size and the current row count.
///
/// There is no upper clamp: a page past the end yields a window the storage
/// gateway answers with an empty slice.
pub fn paginate(page: u64, page_size: u64, total_count: u64) -> PageWindow {
    let page = page.max(1);
    let page_size = page_size.max(1);

    PageWindow {
        page,
        offset: (page - 1).saturating_mul(page_size),
        limit: page_size,
        total_pages: total_count.div_ceil(page_size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirteen_rows_in_pages_of_five() {
        let first = paginate(1, 5, 13);
        assert_eq!((first.offset, first.limit, first.total_pages), (0, 5, 3));

        let third = paginate(3, 5, 13);
        assert_eq!((third.offset, third.limit), (10, 5));

        let fourth = paginate(4, 5, 13);
        assert_eq!(fourth.offset, 15);
        assert_eq!(fourth.total_pages, 3);
    }

    #[test]
    fn empty_listing_has_zero_pages() {
        assert_eq!(paginate(1, 5, 0).total_pages, 0);
    }

    #[test]
    fn exact_multiple_does_not_add_a_page() {
        assert_eq!(paginate(1, 6, 12).total_pages, 2);
        assert_eq!(paginate(1, 6, 13).total_pages, 3);
    }

    #[test]
    fn page_number_defaults_and_clamps() {
        assert_eq!(page_number(None), 1);
        assert_eq!(page_number(Some("")), 1);
        assert_eq!(page_number(Some("abc")), 1);
        assert_eq!(page_number(Some("0")), 1);
        assert_eq!(page_number(Some("-4")), 1);
        assert_eq!(page_number(Some("3")), 3);
    }

    #[test]
    fn huge_pages_saturate_instead_of_overflowing() {
        let window = paginate(u64::MAX, 5, 13);
        assert_eq!(window.offset, u64::MAX);
    }
}
