//! Partitioning extracted texts into bounded-size classification batches.
//!
//! Batching amortizes per-request overhead across many small documents
//! while keeping each request under the remote model's context limits.

/// Default number of extracted documents per classification request.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Split `items` into contiguous, non-overlapping batches in original order.
///
/// Every batch except possibly the last has exactly `batch_size` items;
/// concatenating the batches yields `items` exactly. A `batch_size` of zero
/// is treated as one.
#[must_use = "returns a lazy iterator over batches"]
pub fn batches<T>(items: &[T], batch_size: usize) -> impl Iterator<Item = &[T]> {
    items.chunks(batch_size.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn exact_multiple_has_no_short_tail() {
        let items: Vec<u32> = (0..20).collect();
        let chunks: Vec<&[u32]> = batches(&items, 10).collect();
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.len() == 10));
    }

    #[test]
    fn final_batch_may_be_short() {
        let items: Vec<u32> = (0..23).collect();
        let chunks: Vec<&[u32]> = batches(&items, 10).collect();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].len(), 3);
    }

    #[test]
    fn empty_input_yields_no_batches() {
        let items: Vec<u32> = vec![];
        assert_eq!(batches(&items, 10).count(), 0);
    }

    #[test]
    fn zero_batch_size_is_clamped() {
        let items = [1, 2, 3];
        assert_eq!(batches(&items, 0).count(), 3);
    }

    proptest! {
        #[test]
        fn batches_cover_input_without_overlap(
            items in prop::collection::vec(any::<u16>(), 0..200),
            batch_size in 1_usize..32,
        ) {
            let chunks: Vec<&[u16]> = batches(&items, batch_size).collect();

            let expected = items.len().div_ceil(batch_size);
            prop_assert_eq!(chunks.len(), expected);

            let rejoined: Vec<u16> = chunks.iter().flat_map(|c| c.iter().copied()).collect();
            prop_assert_eq!(rejoined, items);
        }
    }
}
