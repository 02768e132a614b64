/// Longest common subsequence length between two token sequences
/// (order-preserving, not contiguous).
pub fn lcs_length(a: &[String], b: &[String]) -> usize {
    let n = a.len();
    let m = b.len();
    let width = m + 1;
    let mut table = vec![0usize; (n + 1) * width];

    for i in 1..=n {
        for j in 1..=m {
            let idx = i * width + j;
            table[idx] = if a[i - 1] == b[j - 1] {
                table[idx - width - 1] + 1
            } else {
                table[idx - width].max(table[idx - 1])
            };
        }
    }

    table[n * width + m]
}

/// LCS-based F1 in [0, 1] with the empty-side conventions: precision is 1
/// when the hypothesis is empty, recall is 1 when the reference is empty,
/// F1 is 1 when both are.
pub fn f1_overlap(reference: &[String], hypothesis: &[String]) -> f64 {
    if reference.is_empty() && hypothesis.is_empty() {
        return 1.0;
    }

    let lcs = lcs_length(reference, hypothesis) as f64;
    let precision = if hypothesis.is_empty() {
        1.0
    } else {
        lcs / hypothesis.len() as f64
    };
    let recall = if reference.is_empty() {
        1.0
    } else {
        lcs / reference.len() as f64
    };

    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

/// Overlap sub-score on the 0-100 scale.
pub fn overlap_subscore(reference: &[String], hypothesis: &[String]) -> u32 {
    (f1_overlap(reference, hypothesis) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn toks(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    // ── LCS length ───────────────────────────────────────────────────

    #[rstest]
    #[case::identical(&["a", "b", "c"], &["a", "b", "c"], 3)]
    #[case::disjoint(&["a", "b"], &["x", "y"], 0)]
    #[case::subsequence(&["a", "b", "c", "d"], &["b", "d"], 2)]
    #[case::reordered(&["a", "b"], &["b", "a"], 1)]
    #[case::one_empty(&["a"], &[], 0)]
    #[case::both_empty(&[], &[], 0)]
    #[case::non_contiguous(&["a", "x", "b", "y", "c"], &["a", "b", "c"], 3)]
    fn test_lcs_length(#[case] a: &[&str], #[case] b: &[&str], #[case] expected: usize) {
        assert_eq!(lcs_length(&toks(a), &toks(b)), expected);
    }

    // ── F1 ───────────────────────────────────────────────────────────

    #[test]
    fn test_f1_identical_is_one() {
        let a = toks(&["안녕하세요"]);
        assert_relative_eq!(f1_overlap(&a, &a), 1.0);
    }

    #[test]
    fn test_f1_disjoint_is_zero() {
        assert_relative_eq!(f1_overlap(&toks(&["a"]), &toks(&["b"])), 0.0);
    }

    #[test]
    fn test_f1_both_empty_is_one() {
        assert_relative_eq!(f1_overlap(&[], &[]), 1.0);
    }

    #[test]
    fn test_f1_empty_hypothesis_is_zero_against_nonempty_reference() {
        // Precision is vacuously 1, recall 0, so F1 collapses to 0.
        assert_relative_eq!(f1_overlap(&toks(&["a", "b"]), &[]), 0.0);
    }

    #[test]
    fn test_f1_empty_reference_is_zero_against_nonempty_hypothesis() {
        assert_relative_eq!(f1_overlap(&[], &toks(&["a"])), 0.0);
    }

    #[test]
    fn test_f1_partial_overlap() {
        // LCS=2, |R|=3, |H|=2: P=1, R=2/3, F1=0.8.
        let reference = toks(&["a", "b", "c"]);
        let hypothesis = toks(&["a", "b"]);
        assert_relative_eq!(f1_overlap(&reference, &hypothesis), 0.8);
    }

    // ── Sub-score ────────────────────────────────────────────────────

    #[rstest]
    #[case::perfect(&["안녕하세요"], &["안녕하세요"], 100)]
    #[case::both_empty(&[], &[], 100)]
    #[case::disjoint(&["a"], &["b"], 0)]
    #[case::partial(&["a", "b", "c"], &["a", "b"], 80)]
    #[case::rounded(&["a", "b", "c"], &["a", "x", "y"], 33)]
    fn test_overlap_subscore(#[case] r: &[&str], #[case] h: &[&str], #[case] expected: u32) {
        assert_eq!(overlap_subscore(&toks(r), &toks(h)), expected);
    }
}
