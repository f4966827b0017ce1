//! Paging constants and helpers shared by every list screen.

/// Page sizes offered by the "Show N entries" selector.
pub const PAGE_SIZE_OPTIONS: &[u32] = &[5, 10, 25, 50, 75, 100, 125, 150];

/// Page size a list screen starts with.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Page size used when loading lookup options for a select box.
pub const LOOKUP_PAGE_SIZE: u32 = 100;

/// Number of pages needed to show `count` rows, `ceil(count / page_size)`.
///
/// A page size of zero yields zero pages rather than dividing by zero.
pub fn total_pages(count: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = count.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Keep `current` when it is still a valid page, otherwise fall back to 1.
pub fn clamp_page(current: u32, total_pages: u32) -> u32 {
    if current == 0 || current > total_pages {
        1
    } else {
        current
    }
}

/// One-based serial number shown in the "Sr No." column.
pub fn row_serial(index: usize, page: u32, page_size: u32) -> u64 {
    index as u64 + 1 + u64::from(page.saturating_sub(1)) * u64::from(page_size)
}

/// Whether `size` is one of the selectable page sizes.
pub fn is_offered_page_size(size: u32) -> bool {
    PAGE_SIZE_OPTIONS.contains(&size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(107, 25), 5);
        assert_eq!(total_pages(100, 25), 4);
        assert_eq!(total_pages(1, 25), 1);
        assert_eq!(total_pages(0, 25), 0);
    }

    #[test]
    fn total_pages_with_zero_page_size() {
        assert_eq!(total_pages(10, 0), 0);
    }

    #[test]
    fn clamp_page_resets_out_of_range() {
        assert_eq!(clamp_page(3, 5), 3);
        assert_eq!(clamp_page(6, 5), 1);
        assert_eq!(clamp_page(1, 0), 1);
        assert_eq!(clamp_page(0, 4), 1);
    }

    #[test]
    fn row_serial_continues_across_pages() {
        assert_eq!(row_serial(0, 1, 10), 1);
        assert_eq!(row_serial(9, 1, 10), 10);
        assert_eq!(row_serial(0, 3, 10), 21);
    }

    #[test]
    fn offered_page_sizes() {
        assert!(is_offered_page_size(DEFAULT_PAGE_SIZE));
        assert!(is_offered_page_size(150));
        assert!(!is_offered_page_size(7));
    }
}
