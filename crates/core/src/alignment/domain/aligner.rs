use super::edit_script::EditOp;

/// Minimum-edit-distance alignment of a hypothesis against a reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    pub distance: usize,
    pub script: Vec<EditOp>,
}

#[derive(Clone, Copy, PartialEq)]
enum Step {
    Unvisited,
    Match,
    Substitute,
    Delete,
    Insert,
}

/// Levenshtein alignment over an (n+1) by (m+1) table with a full backtrace.
///
/// Utterances are short spoken sentences, so the quadratic table is fine;
/// no incremental alignment is needed.
pub fn align(reference: &[String], hypothesis: &[String]) -> Alignment {
    let n = reference.len();
    let m = hypothesis.len();
    let width = m + 1;

    let mut cost = vec![0usize; (n + 1) * width];
    let mut back = vec![Step::Unvisited; (n + 1) * width];

    for i in 1..=n {
        cost[i * width] = i;
        back[i * width] = Step::Delete;
    }
    for j in 1..=m {
        cost[j] = j;
        back[j] = Step::Insert;
    }

    for i in 1..=n {
        for j in 1..=m {
            let idx = i * width + j;
            if reference[i - 1] == hypothesis[j - 1] {
                cost[idx] = cost[idx - width - 1];
                back[idx] = Step::Match;
            } else {
                let substitute = cost[idx - width - 1];
                let delete = cost[idx - width];
                let insert = cost[idx - 1];
                let min = substitute.min(delete).min(insert);
                cost[idx] = 1 + min;
                // Tie-break substitute > delete > insert, so equal-cost
                // alignments always produce the same script.
                back[idx] = if min == substitute {
                    Step::Substitute
                } else if min == delete {
                    Step::Delete
                } else {
                    Step::Insert
                };
            }
        }
    }

    let mut script = Vec::with_capacity(n.max(m));
    let mut i = n;
    let mut j = m;
    while i > 0 || j > 0 {
        match back[i * width + j] {
            Step::Match => {
                i -= 1;
                j -= 1;
                script.push(EditOp::Match {
                    reference: i,
                    hypothesis: j,
                });
            }
            Step::Substitute => {
                i -= 1;
                j -= 1;
                script.push(EditOp::Substitute {
                    reference: i,
                    hypothesis: j,
                });
            }
            Step::Delete => {
                i -= 1;
                script.push(EditOp::Delete { reference: i });
            }
            Step::Insert => {
                j -= 1;
                script.push(EditOp::Insert { hypothesis: j });
            }
            Step::Unvisited => unreachable!("alignment backtrace left the filled table"),
        }
    }
    script.reverse();

    Alignment {
        distance: cost[n * width + m],
        script,
    }
}

/// WER = distance / reference length. An empty reference scores 0 against an
/// empty hypothesis and 1 against anything else.
pub fn word_error_rate(distance: usize, reference_len: usize, hypothesis_len: usize) -> f64 {
    if reference_len == 0 {
        if hypothesis_len == 0 {
            0.0
        } else {
            1.0
        }
    } else {
        distance as f64 / reference_len as f64
    }
}
