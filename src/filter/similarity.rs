//! Ratcliff/Obershelp string similarity.
//!
//! `ratio = 2·M / (|a| + |b|)` where `M` is the total size of the matching
//! blocks found by repeatedly taking the longest common substring and
//! recursing on the pieces to its left and right.  Characters, not bytes,
//! are compared.
//!
//! For candidates of 200 characters or more, characters occurring in more
//! than 1 % of the candidate (plus one) are treated as "popular" and never
//! start a match, which keeps long lines cheap to compare.

use std::collections::HashMap;

/// Candidates at least this long get the popular-character heuristic.
const AUTOJUNK_MIN_LEN: usize = 200;

/// Pre-indexed candidate string, compared against many list entries.
///
/// ```
/// use pdf_tts::filter::SimilarityMatcher;
///
/// let m = SimilarityMatcher::new("abcd");
/// assert_eq!(m.ratio("bcde"), 0.75);
/// assert!(m.exceeds("abce", 0.5));
/// ```
#[derive(Debug, Clone)]
pub struct SimilarityMatcher {
    b: Vec<char>,
    /// Positions of each non-popular character in `b`, ascending.
    b2j: HashMap<char, Vec<usize>>,
    /// Character multiset of `b`, for the cheap upper bound.
    counts: HashMap<char, usize>,
}

impl SimilarityMatcher {
    pub fn new(candidate: &str) -> Self {
        let b: Vec<char> = candidate.chars().collect();

        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
        }
        let counts = b2j.iter().map(|(c, js)| (*c, js.len())).collect();

        if b.len() >= AUTOJUNK_MIN_LEN {
            let limit = b.len() / 100 + 1;
            b2j.retain(|_, js| js.len() <= limit);
        }

        Self { b, b2j, counts }
    }

    /// Similarity of `entry` to the candidate, in `[0.0, 1.0]`.
    pub fn ratio(&self, entry: &str) -> f64 {
        let a: Vec<char> = entry.chars().collect();
        let total = a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        2.0 * self.matched(&a) as f64 / total as f64
    }

    /// `true` when `entry` is strictly more similar than `cutoff`.
    ///
    /// Two cheap upper bounds are checked before the full ratio.
    pub fn exceeds(&self, entry: &str, cutoff: f64) -> bool {
        let a: Vec<char> = entry.chars().collect();
        let total = a.len() + self.b.len();
        if total == 0 {
            return 1.0 > cutoff;
        }
        let bound = |m: usize| 2.0 * m as f64 / total as f64;

        if bound(a.len().min(self.b.len())) <= cutoff {
            return false;
        }
        if bound(self.common_chars(&a)) <= cutoff {
            return false;
        }
        bound(self.matched(&a)) > cutoff
    }

    fn common_chars(&self, a: &[char]) -> usize {
        let mut avail = self.counts.clone();
        let mut common = 0;
        for c in a {
            if let Some(n) = avail.get_mut(c) {
                if *n > 0 {
                    *n -= 1;
                    common += 1;
                }
            }
        }
        common
    }

    /// Total size of the matching blocks between `a` and the candidate.
    fn matched(&self, a: &[char]) -> usize {
        let mut total = 0;
        let mut queue = vec![(0, a.len(), 0, self.b.len())];
        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.longest_match(a, alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            total += k;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }
        total
    }

    /// Longest block `a[i..i+k] == b[j..j+k]` inside the given windows.
    /// Ties go to the earliest `i`, then the earliest `j`.
    fn longest_match(
        &self,
        a: &[char],
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);
        let mut j2len: HashMap<usize, usize> = HashMap::new();

        for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(c) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next.insert(j, k);
                    if k > best_k {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_k = k;
                    }
                }
            }
            j2len = next;
        }
        (best_i, best_j, best_k)
    }
}

/// Similarity of two strings; see [`SimilarityMatcher`].
pub fn ratio(a: &str, b: &str) -> f64 {
    SimilarityMatcher::new(b).ratio(a)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn identical_strings_are_one() {
        assert!(close(ratio("John Smith", "John Smith"), 1.0));
        assert!(close(ratio("", ""), 1.0));
    }

    #[test]
    fn disjoint_strings_are_zero() {
        assert!(close(ratio("abc", "xyz"), 0.0));
        assert!(close(ratio("", "xyz"), 0.0));
    }

    #[test]
    fn known_ratios() {
        // One block "bcd": 2*3/8.
        assert!(close(ratio("abcd", "bcde"), 0.75));
        // "ab", then "cd" found by recursing right of it.
        assert!(close(ratio("qabxcd", "abycdf"), 2.0 * 4.0 / 12.0));
    }

    #[test]
    fn compares_characters_not_bytes() {
        assert!(close(ratio("café", "cafe"), 0.75));
    }

    #[test]
    fn exceeds_is_strict() {
        let m = SimilarityMatcher::new("abcd");
        assert!(!m.exceeds("bcde", 0.75));
        assert!(m.exceeds("bcde", 0.74));
        assert!(!m.exceeds("wxyz", 0.0));
    }

    #[test]
    fn popular_characters_do_not_start_matches_in_long_candidates() {
        // 300 spaces plus one 'x': the space is popular, so an entry of
        // spaces only matches nothing.
        let candidate = format!("{}x", " ".repeat(300));
        let m = SimilarityMatcher::new(&candidate);
        assert!(close(m.ratio("   "), 0.0));
        assert!(m.ratio("x") > 0.0);
    }
}
