//! Conditional parallel iteration.
//!
//! Uses rayon when the `parallel` feature is enabled and the collection is
//! larger than the threshold; sequential otherwise. Output order always
//! matches input order.

/// Default number of items above which work is spread across threads.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4;

/// Maps `f` over `items`, in parallel when worthwhile.
#[allow(unused_variables)]
pub fn maybe_parallel_map<T, U, F>(items: &[T], threshold: usize, f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        if items.len() > threshold {
            return items.par_iter().map(f).collect();
        }
    }

    items.iter().map(f).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_order() {
        let items: Vec<u64> = (0..1000).collect();
        let out = maybe_parallel_map(&items, 10, |x| x * 2);
        assert!(out.iter().enumerate().all(|(i, &v)| v == 2 * i as u64));
    }

    #[test]
    fn test_empty() {
        let out: Vec<u8> = maybe_parallel_map(&[] as &[u8], 0, |x| *x);
        assert!(out.is_empty());
    }
}
