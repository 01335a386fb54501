//! Page layout across providers
//!
//! Every page reserves `block_size` slots per provider. When a provider cannot fill its
//! block, the free slots go to providers that have more results than their block, so a
//! page stays `providers * block_size` long until the results run out. A provider that
//! took extra slots on one page starts further ahead on the next one; the
//! [`OffsetSchedule`] records those changes so any page can be laid out from the id
//! counts alone.
//!
//! Providers are addressed by their position in registry order.

use std::collections::BTreeMap;
use std::ops::Range;

/// Number of results on a full page
///
/// Saturates at `usize::MAX`; no provider list is that long.
pub fn per_page(provider_count: usize, block_size: usize) -> usize {
    provider_count.saturating_mul(block_size)
}

/// Extra slots granted to each provider, given what every provider can show
///
/// Providers are visited by length, longest first (ties keep registry order). Every
/// provider below `block_size` leaves `block_size - length` slots free; they are handed
/// to the longest providers first, each taking no more than what it holds beyond its
/// own block and earlier grants. The total granted therefore never exceeds the free
/// slots, nor what the other providers can actually supply.
pub fn extended_space(lengths: &[usize], block_size: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..lengths.len()).collect();
    order.sort_by(|&a, &b| lengths[b].cmp(&lengths[a]));

    let mut grants = vec![0; lengths.len()];

    for &short in &order {
        let length = lengths[short];
        if length >= block_size {
            continue;
        }

        let mut missing = block_size - length;
        for &target in &order {
            if missing == 0 {
                break;
            }

            let spare = lengths[target].saturating_sub(block_size.saturating_add(grants[target]));
            let granted = spare.min(missing);
            grants[target] += granted;
            missing -= granted;
        }
    }

    grants
}

/// Ids a provider contributes to one page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageSlice {
    /// Index of the first id in the provider's full list
    pub offset: usize,
    /// Number of ids taken
    pub len: usize,
}

impl PageSlice {
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// What each provider could show from its offset, capped at a full page
fn window_lengths(lengths: &[usize], offsets: &[usize], block_size: usize) -> Vec<usize> {
    let page_size = per_page(lengths.len(), block_size);
    lengths
        .iter()
        .zip(offsets)
        .map(|(&length, &offset)| length.saturating_sub(offset).min(page_size))
        .collect()
}

/// Lay out one page from the providers' starting offsets
///
/// Each provider takes its block, plus whatever [`extended_space`] grants it from the
/// window starting at its offset.
pub fn plan_page(lengths: &[usize], offsets: &[usize], block_size: usize) -> Vec<PageSlice> {
    let windows = window_lengths(lengths, offsets, block_size);
    let grants = extended_space(&windows, block_size);

    windows
        .iter()
        .zip(&grants)
        .zip(offsets)
        .map(|((&window, &grant), &offset)| PageSlice {
            offset,
            len: window.min(block_size.saturating_add(grant)),
        })
        .collect()
}

/// Pages on which a provider's block size changed
///
/// `page -> provider -> extra slots`. A recorded value stays in effect for the
/// following pages until the next entry for that provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OffsetSchedule {
    changes: BTreeMap<usize, BTreeMap<usize, usize>>,
}

impl OffsetSchedule {
    /// Replay pages `1..=through_page` and record every block size change
    ///
    /// A provider's block grows on the page where another provider's own results drop
    /// below its block, and changes again on each later page where the shortfall differs.
    /// Replay stops early once every provider is exhausted.
    pub fn build(lengths: &[usize], block_size: usize, through_page: usize) -> Self {
        let mut schedule = Self::default();
        let mut offsets = vec![0; lengths.len()];
        let mut in_effect = vec![0; lengths.len()];

        for page in 1..=through_page {
            if lengths.iter().zip(&offsets).all(|(length, offset)| offset >= length) {
                break;
            }

            let windows = window_lengths(lengths, &offsets, block_size);
            let grants = extended_space(&windows, block_size);

            for (provider, grant) in grants.into_iter().enumerate() {
                if grant != in_effect[provider] {
                    schedule
                        .changes
                        .entry(page)
                        .or_default()
                        .insert(provider, grant);
                    in_effect[provider] = grant;
                }
                offsets[provider] = offsets[provider]
                    .saturating_add(block_size)
                    .saturating_add(grant);
            }
        }

        schedule
    }

    /// Extra slots recorded for a provider on exactly this page
    pub fn delta(&self, page: usize, provider: usize) -> Option<usize> {
        self.changes
            .get(&page)
            .and_then(|deltas| deltas.get(&provider))
            .copied()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Starting offset of a provider on `page`
    ///
    /// Walks pages `1..page`, each advancing the offset by the block size in effect.
    /// Saturates at `usize::MAX`, which lies past the end of every id list.
    pub fn offset(&self, page: usize, provider: usize, block_size: usize) -> usize {
        let mut size = block_size;
        let mut offset: usize = 0;
        let mut cursor = 1;

        for (&changed, deltas) in self.changes.range(..page) {
            if let Some(&delta) = deltas.get(&provider) {
                offset = offset.saturating_add(size.saturating_mul(changed - cursor));
                size = block_size.saturating_add(delta);
                cursor = changed;
            }
        }

        offset.saturating_add(size.saturating_mul(page.saturating_sub(cursor)))
    }

    /// Starting offsets of all providers on `page`
    pub fn offsets(&self, page: usize, provider_count: usize, block_size: usize) -> Vec<usize> {
        (0..provider_count)
            .map(|provider| self.offset(page, provider, block_size))
            .collect()
    }
}

/// Lay out `page` (1-indexed) for providers holding `lengths` ids each
pub fn layout_page(lengths: &[usize], page: usize, block_size: usize) -> Vec<PageSlice> {
    let schedule = OffsetSchedule::build(lengths, block_size, page.saturating_sub(1));
    let offsets = schedule.offsets(page, lengths.len(), block_size);
    plan_page(lengths, &offsets, block_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn lens(slices: &[PageSlice]) -> Vec<usize> {
        slices.iter().map(|s| s.len).collect()
    }

    fn offsets(slices: &[PageSlice]) -> Vec<usize> {
        slices.iter().map(|s| s.offset).collect()
    }

    #[test]
    fn test_extended_space_single_donor() {
        assert_eq!(extended_space(&[7, 3], 5), [2, 0]);
        assert_eq!(extended_space(&[3, 10], 5), [0, 2]);
        assert_eq!(extended_space(&[5, 5], 5), [0, 0]);
    }

    #[test]
    fn test_extended_space_accumulates_shortfalls() {
        // two providers short by 3 and 5, one donor with plenty
        assert_eq!(extended_space(&[2, 15, 0], 5), [0, 8, 0]);
    }

    #[test]
    fn test_extended_space_splits_between_donors() {
        // longest donor first, the rest from the next one
        assert_eq!(extended_space(&[8, 9, 0], 5), [1, 4, 0]);
        // both donors could cover it alone; only the longest does
        assert_eq!(extended_space(&[15, 15, 2], 5), [3, 0, 0]);
    }

    #[test]
    fn test_extended_space_never_exceeds_supply() {
        let grants = extended_space(&[6, 1, 1], 5);
        assert_eq!(grants, [1, 0, 0]);
    }

    #[test]
    fn test_reallocation_example() {
        // 7 and 3 ids with blocks of 5: the first provider fills the gap of the second
        let page = layout_page(&[7, 3], 1, 5);
        assert_eq!(offsets(&page), [0, 0]);
        assert_eq!(lens(&page), [7, 3]);

        let next = layout_page(&[7, 3], 2, 5);
        assert_eq!(lens(&next), [0, 0]);
    }

    #[test]
    fn test_schedule_triggers_on_own_length() {
        // the second provider runs short on page 2, not before
        let lengths = [20, 7];
        let schedule = OffsetSchedule::build(&lengths, 5, 10);

        assert_eq!(schedule.delta(1, 0), None);
        assert_eq!(schedule.delta(2, 0), Some(3));
        assert_eq!(schedule.delta(2, 1), None);
        assert_eq!(schedule.delta(3, 0), Some(2));
        assert_eq!(schedule.delta(3, 1), None);
        assert_eq!(schedule.delta(4, 0), None);

        assert_eq!(schedule.offsets(1, 2, 5), [0, 0]);
        assert_eq!(schedule.offsets(2, 2, 5), [5, 5]);
        assert_eq!(schedule.offsets(3, 2, 5), [13, 10]);

        assert_eq!(lens(&layout_page(&lengths, 1, 5)), [5, 5]);
        assert_eq!(lens(&layout_page(&lengths, 2, 5)), [8, 2]);
        assert_eq!(lens(&layout_page(&lengths, 3, 5)), [7, 0]);
    }

    #[test]
    fn test_no_schedule_for_even_providers() {
        let schedule = OffsetSchedule::build(&[10, 10], 5, 10);
        assert!(schedule.is_empty());
        assert_eq!(schedule.offset(3, 1, 5), 10);
    }

    #[test]
    fn test_sticky_offsets() {
        let mut schedule = OffsetSchedule::default();
        schedule.changes.entry(2).or_default().insert(0, 3);
        schedule.changes.entry(4).or_default().insert(0, 0);

        // pages 1..=5 advance by 5, 8, 8, 5
        assert_eq!(schedule.offset(1, 0, 5), 0);
        assert_eq!(schedule.offset(2, 0, 5), 5);
        assert_eq!(schedule.offset(3, 0, 5), 13);
        assert_eq!(schedule.offset(4, 0, 5), 21);
        assert_eq!(schedule.offset(5, 0, 5), 26);
        assert_eq!(schedule.offset(5, 1, 5), 20);
    }

    #[test]
    fn test_single_provider() {
        assert_eq!(lens(&layout_page(&[12], 1, 5)), [5]);
        assert_eq!(lens(&layout_page(&[12], 3, 5)), [2]);
        assert_eq!(offsets(&layout_page(&[12], 3, 5)), [10]);
    }

    #[test]
    fn test_pages_far_past_the_end() {
        let lengths = [20, 7];
        assert!(layout_page(&lengths, usize::MAX, 5)
            .iter()
            .all(PageSlice::is_empty));
        assert!(layout_page(&lengths, usize::MAX / 2, 5)
            .iter()
            .all(PageSlice::is_empty));

        let schedule = OffsetSchedule::build(&lengths, 5, 10);
        assert_eq!(schedule.offset(usize::MAX, 0, 5), usize::MAX);
        assert_eq!(schedule.offset(usize::MAX, 1, usize::MAX), usize::MAX);
    }

    #[test]
    fn test_huge_block_size() {
        assert_eq!(per_page(3, usize::MAX), usize::MAX);
        assert_eq!(extended_space(&[7, 3], usize::MAX), [0, 0]);

        let lengths = [7, 3];
        assert_eq!(lens(&layout_page(&lengths, 1, usize::MAX)), [7, 3]);
        assert_eq!(lens(&layout_page(&lengths, 2, usize::MAX)), [0, 0]);
        assert_eq!(lens(&layout_page(&lengths, usize::MAX, usize::MAX)), [0, 0]);
    }

    #[test]
    fn test_no_results() {
        let page = layout_page(&[0, 0, 0], 1, 5);
        assert!(page.iter().all(PageSlice::is_empty));
    }

    /// Walk every page of many provider shapes and check that pages are full while
    /// enough results remain, and that the pages partition all ids.
    #[test]
    fn test_pages_partition_all_ids() {
        let mut shapes: Vec<Vec<usize>> = Vec::new();
        for a in 0..=13 {
            shapes.push(vec![a]);
            for b in 0..=13 {
                shapes.push(vec![a, b]);
                for c in [0, 1, 4, 6, 11, 17] {
                    shapes.push(vec![a, b, c]);
                }
            }
        }
        shapes.push(vec![31, 0, 2, 9]);
        shapes.push(vec![1, 1, 1, 40]);

        for lengths in &shapes {
            for block_size in 1..=4 {
                let total: usize = lengths.iter().sum();
                let page_size = per_page(lengths.len(), block_size);
                let mut seen = HashSet::new();
                let mut page = 1;

                while seen.len() < total {
                    let slices = layout_page(lengths, page, block_size);
                    let count: usize = slices.iter().map(|s| s.len).sum();
                    let remaining = total - seen.len();

                    assert_eq!(
                        count,
                        remaining.min(page_size),
                        "lengths {:?}, block {}, page {}",
                        lengths,
                        block_size,
                        page
                    );

                    for (provider, slice) in slices.iter().enumerate() {
                        assert!(slice.range().end <= lengths[provider]);
                        for index in slice.range() {
                            assert!(seen.insert((provider, index)), "duplicate id on page {}", page);
                        }
                    }
                    page += 1;
                }

                let after: usize = layout_page(lengths, page, block_size)
                    .iter()
                    .map(|s| s.len)
                    .sum();
                assert_eq!(after, 0);
            }
        }
    }
}
