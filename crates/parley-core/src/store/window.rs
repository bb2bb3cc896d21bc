//! Limit/reverse selection shared by every `RecordStore` implementation.

/// Apply `read(limit, reverse)` semantics to a chronological record list.
///
/// Takes the last `limit` records by position (all of them for `None`,
/// `Some(0)` or a limit larger than the list), then reverses the selection
/// when `reverse` is set.
pub fn select_window<R>(mut records: Vec<R>, limit: Option<usize>, reverse: bool) -> Vec<R> {
    if let Some(n) = limit.filter(|n| *n > 0) {
        if n < records.len() {
            records.drain(..records.len() - n);
        }
    }
    if reverse {
        records.reverse();
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> Vec<u32> {
        vec![1, 2, 3, 4, 5]
    }

    #[test]
    fn test_no_limit_keeps_order() {
        assert_eq!(select_window(ids(), None, false), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_no_limit_reversed() {
        assert_eq!(select_window(ids(), None, true), vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_limit_takes_most_recent() {
        assert_eq!(select_window(ids(), Some(2), false), vec![4, 5]);
    }

    #[test]
    fn test_limit_then_reverse() {
        assert_eq!(select_window(ids(), Some(3), true), vec![5, 4, 3]);
    }

    #[test]
    fn test_zero_limit_means_all() {
        assert_eq!(select_window(ids(), Some(0), false), ids());
    }

    #[test]
    fn test_limit_larger_than_len_returns_all() {
        assert_eq!(select_window(ids(), Some(50), true), vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_empty_input() {
        let empty: Vec<u32> = Vec::new();
        assert!(select_window(empty, Some(3), true).is_empty());
    }
}
