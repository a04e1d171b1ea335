// Page sampling: bound extraction cost by reading a few representative pages.
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleStrategy {
    /// First, middle and last page.
    Triad,
    /// First page, 25 %, 50 %, 75 % and last page.
    Quintile,
}

/// Distinct 0-based page indices in ascending order. Empty only when
/// `total` is zero.
pub fn sample_pages(total: usize, strategy: SampleStrategy) -> Vec<usize> {
    if total == 0 {
        return Vec::new();
    }
    let last = total - 1;
    let picks: BTreeSet<usize> = match strategy {
        SampleStrategy::Triad => [0, total / 2, last].into_iter().collect(),
        SampleStrategy::Quintile => [0, total / 4, total / 2, (3 * total) / 4, last]
            .into_iter()
            .collect(),
    };
    picks.into_iter().filter(|&i| i <= last).collect()
}
