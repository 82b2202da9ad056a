//! Offset pagination envelope shared by dashboard list views.
//!
//! The dashboard slices fully materialised, already-filtered lists in memory,
//! so pagination here is plain offset arithmetic over a slice plus the
//! metadata a pager control needs: total count, total pages, and whether a
//! next or previous page exists. Pages are 1-based; a page below 1 is
//! clamped to the first page rather than rejected, because pager controls
//! routinely underflow when the result set shrinks underneath them.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

/// Metadata describing one page of a larger result set.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
///
/// let page = pagination::paginate(&[1, 2, 3], 1, NonZeroUsize::new(2).unwrap());
/// assert_eq!(page.meta.total_pages, 2);
/// assert!(page.meta.has_next);
/// assert!(!page.meta.has_prev);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// 1-based page number this slice was taken from.
    pub page: usize,
    /// Requested page size.
    pub page_size: usize,
    /// Total number of items across all pages.
    pub total: usize,
    /// Number of pages needed to cover `total` items.
    pub total_pages: usize,
    /// Whether a page exists after this one.
    pub has_next: bool,
    /// Whether a page exists before this one.
    pub has_prev: bool,
}

/// One page of items together with its [`PageMeta`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items belonging to the requested page, in input order.
    pub items: Vec<T>,
    /// Pagination metadata for the whole result set.
    pub meta: PageMeta,
}

/// Slice `items` into the 1-based `page` of `page_size` entries.
///
/// Out-of-range pages yield an empty slice with truthful metadata; an empty
/// input yields zero total pages for any page.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
///
/// let size = NonZeroUsize::new(10).unwrap();
/// let page = pagination::paginate(&["a", "b", "c"], 1, size);
/// assert_eq!(page.items.len(), 3);
/// assert_eq!(page.meta.total_pages, 1);
/// ```
#[must_use]
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: NonZeroUsize) -> Page<T> {
    let page = page.max(1);
    let size = page_size.get();
    let total = items.len();
    let start = (page - 1).saturating_mul(size);

    Page {
        items: items.iter().skip(start).take(size).cloned().collect(),
        meta: PageMeta {
            page,
            page_size: size,
            total,
            total_pages: total.div_ceil(size),
            has_next: page.saturating_mul(size) < total,
            has_prev: page > 1,
        },
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the pagination algebra.

    use super::*;
    use rstest::rstest;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).expect("page size must be non-zero")
    }

    #[rstest]
    #[case::first_of_three(1, 4, 10, 4, 3, true, false)]
    #[case::middle(2, 4, 10, 4, 3, true, true)]
    #[case::last_partial(3, 4, 10, 2, 3, false, true)]
    #[case::past_the_end(4, 4, 10, 0, 3, false, true)]
    #[case::exact_fit(2, 5, 10, 5, 2, false, true)]
    #[case::single_page(1, 50, 10, 10, 1, false, false)]
    fn slices_and_reports_metadata(
        #[case] page: usize,
        #[case] page_size: usize,
        #[case] total: usize,
        #[case] expected_len: usize,
        #[case] expected_pages: usize,
        #[case] has_next: bool,
        #[case] has_prev: bool,
    ) {
        let items: Vec<usize> = (0..total).collect();
        let result = paginate(&items, page, size(page_size));

        assert_eq!(result.items.len(), expected_len, "slice length");
        assert_eq!(result.meta.total, total);
        assert_eq!(result.meta.total_pages, expected_pages);
        assert_eq!(result.meta.has_next, has_next, "has_next");
        assert_eq!(result.meta.has_prev, has_prev, "has_prev");
    }

    #[test]
    fn preserves_input_order_within_a_page() {
        let items = vec!["a", "b", "c", "d", "e"];
        let result = paginate(&items, 2, size(2));
        assert_eq!(result.items, vec!["c", "d"]);
    }

    #[rstest]
    #[case::first(1)]
    #[case::arbitrary(7)]
    fn empty_input_yields_zero_pages(#[case] page: usize) {
        let result = paginate::<u8>(&[], page, size(10));
        assert!(result.items.is_empty());
        assert_eq!(result.meta.total_pages, 0);
        assert!(!result.meta.has_next);
    }

    #[test]
    fn page_zero_clamps_to_first_page() {
        let items = vec![1, 2, 3];
        let result = paginate(&items, 0, size(2));
        assert_eq!(result.items, vec![1, 2]);
        assert_eq!(result.meta.page, 1);
        assert!(!result.meta.has_prev);
    }

    #[test]
    fn meta_serialises_with_camel_case_keys() {
        let result = paginate(&[1, 2, 3], 1, size(2));
        let json = serde_json::to_value(result.meta).expect("meta serialises");
        assert_eq!(json["totalPages"], 2);
        assert_eq!(json["hasNext"], true);
        assert_eq!(json["hasPrev"], false);
    }
}
