//! Sequence-matcher similarity ratio.
//!
//! # Overview
//!
//! Computes the classic diff similarity ratio between two character
//! sequences: find the longest contiguous matching block, recurse over the
//! unmatched remainders on each side, and report
//! `2 * matches / (len_a + len_b)` where `matches` is the total number of
//! characters covered by matching blocks.
//!
//! The result is 1.0 for identical inputs (including two empty inputs) and
//! 0.0 for inputs with no common characters. The function is independent of
//! any file I/O, so it can be tested with synthetic strings.
//!
//! Complexity is near-linear for mostly-similar inputs and quadratic in the
//! worst case, which is why callers gate it behind extension allow-lists
//! and size-based candidate pruning.

use std::collections::HashMap;

/// A maximal contiguous run of matching characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MatchBlock {
    /// Start index in `a`
    a: usize,
    /// Start index in `b`
    b: usize,
    /// Length of the run
    len: usize,
}

/// Similarity ratio in `[0.0, 1.0]` between two strings.
///
/// # Example
///
/// ```
/// use dupescan::similarity::similarity_ratio;
///
/// assert_eq!(similarity_ratio("same", "same"), 1.0);
/// assert_eq!(similarity_ratio("abc", "xyz"), 0.0);
/// assert!(similarity_ratio("The quick brown fox", "The quick brown fox.") > 0.9);
/// ```
#[must_use]
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let total = a_chars.len() + b_chars.len();
    if total == 0 {
        return 1.0;
    }

    // Index of each character's positions in b, for the longest-match scan.
    let mut b_positions: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, &c) in b_chars.iter().enumerate() {
        b_positions.entry(c).or_default().push(j);
    }

    let matches: usize = matching_blocks(&a_chars, &b_chars, &b_positions)
        .iter()
        .map(|m| m.len)
        .sum();

    2.0 * matches as f64 / total as f64
}

/// Collect all maximal matching blocks via greedy longest-block recursion.
///
/// Uses an explicit work queue instead of recursion so deeply fragmented
/// inputs cannot overflow the stack.
fn matching_blocks(
    a: &[char],
    b: &[char],
    b_positions: &HashMap<char, Vec<usize>>,
) -> Vec<MatchBlock> {
    let mut queue = vec![(0usize, a.len(), 0usize, b.len())];
    let mut blocks = Vec::new();

    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let best = longest_match(a, b_positions, alo, ahi, blo, bhi);
        if best.len == 0 {
            continue;
        }
        // Unmatched remainders on each side of the block.
        if alo < best.a && blo < best.b {
            queue.push((alo, best.a, blo, best.b));
        }
        if best.a + best.len < ahi && best.b + best.len < bhi {
            queue.push((best.a + best.len, ahi, best.b + best.len, bhi));
        }
        blocks.push(best);
    }

    blocks
}

/// Find the longest contiguous matching block within the given ranges.
///
/// Among equally long blocks, prefers the one starting earliest in `a`,
/// then earliest in `b`.
fn longest_match(
    a: &[char],
    b_positions: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> MatchBlock {
    let mut best = MatchBlock {
        a: alo,
        b: blo,
        len: 0,
    };

    // run_lengths[j] = length of the matching run ending at a[i], b[j].
    let mut run_lengths: HashMap<usize, usize> = HashMap::new();
    for i in alo..ahi {
        let mut new_runs: HashMap<usize, usize> = HashMap::new();
        if let Some(positions) = b_positions.get(&a[i]) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let k = if j == 0 {
                    1
                } else {
                    run_lengths.get(&(j - 1)).copied().unwrap_or(0) + 1
                };
                new_runs.insert(j, k);
                if k > best.len {
                    best = MatchBlock {
                        a: i + 1 - k,
                        b: j + 1 - k,
                        len: k,
                    };
                }
            }
        }
        run_lengths = new_runs;
    }

    best
}
