use super::edit_script::EditOp;

/// Presentation class of a token in a rendered diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffTag {
    Match,
    Substitute,
    Delete,
    Insert,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffToken {
    pub text: String,
    pub tag: DiffTag,
}

/// Side-by-side token streams: deletions appear only on the reference side,
/// insertions only on the hypothesis side, matches and substitutions on both.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiffRender {
    pub reference: Vec<DiffToken>,
    pub hypothesis: Vec<DiffToken>,
}

fn token(text: &str, tag: DiffTag) -> DiffToken {
    DiffToken {
        text: text.to_string(),
        tag,
    }
}

/// Renders an edit script into tagged token streams for both sides.
///
/// Panics if the script does not consume every token of both sequences in
/// order. That means the script came from somewhere other than the aligner
/// (or the aligner broke), and a wrong diff must not be shown as if correct.
pub fn render(reference: &[String], hypothesis: &[String], script: &[EditOp]) -> DiffRender {
    let mut out = DiffRender::default();
    let mut next_ref = 0usize;
    let mut next_hyp = 0usize;

    for op in script {
        match *op {
            EditOp::Match {
                reference: r,
                hypothesis: h,
            } => {
                assert_eq!(r, next_ref, "edit script consumed reference out of order");
                assert_eq!(h, next_hyp, "edit script consumed hypothesis out of order");
                out.reference.push(token(&reference[r], DiffTag::Match));
                out.hypothesis.push(token(&hypothesis[h], DiffTag::Match));
                next_ref += 1;
                next_hyp += 1;
            }
            EditOp::Substitute {
                reference: r,
                hypothesis: h,
            } => {
                assert_eq!(r, next_ref, "edit script consumed reference out of order");
                assert_eq!(h, next_hyp, "edit script consumed hypothesis out of order");
                out.reference.push(token(&reference[r], DiffTag::Substitute));
                out.hypothesis
                    .push(token(&hypothesis[h], DiffTag::Substitute));
                next_ref += 1;
                next_hyp += 1;
            }
            EditOp::Delete { reference: r } => {
                assert_eq!(r, next_ref, "edit script consumed reference out of order");
                out.reference.push(token(&reference[r], DiffTag::Delete));
                next_ref += 1;
            }
            EditOp::Insert { hypothesis: h } => {
                assert_eq!(h, next_hyp, "edit script consumed hypothesis out of order");
                out.hypothesis.push(token(&hypothesis[h], DiffTag::Insert));
                next_hyp += 1;
            }
        }
    }

    assert_eq!(
        next_ref,
        reference.len(),
        "edit script left reference tokens unconsumed"
    );
    assert_eq!(
        next_hyp,
        hypothesis.len(),
        "edit script left hypothesis tokens unconsumed"
    );

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::domain::aligner::align;

    fn toks(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn tags(side: &[DiffToken]) -> Vec<DiffTag> {
        side.iter().map(|t| t.tag).collect()
    }

    fn texts(side: &[DiffToken]) -> Vec<&str> {
        side.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_all_match() {
        let reference = toks(&["a", "b"]);
        let hypothesis = toks(&["a", "b"]);
        let alignment = align(&reference, &hypothesis);
        let diff = render(&reference, &hypothesis, &alignment.script);
        assert_eq!(tags(&diff.reference), vec![DiffTag::Match, DiffTag::Match]);
        assert_eq!(tags(&diff.hypothesis), vec![DiffTag::Match, DiffTag::Match]);
    }

    #[test]
    fn test_substitution_appears_on_both_sides() {
        let reference = toks(&["오늘은", "날씨가", "좋습니다"]);
        let hypothesis = toks(&["오늘은", "날씨가", "좋네요"]);
        let alignment = align(&reference, &hypothesis);
        let diff = render(&reference, &hypothesis, &alignment.script);

        assert_eq!(
            tags(&diff.reference),
            vec![DiffTag::Match, DiffTag::Match, DiffTag::Substitute]
        );
        assert_eq!(texts(&diff.reference), vec!["오늘은", "날씨가", "좋습니다"]);
        assert_eq!(
            tags(&diff.hypothesis),
            vec![DiffTag::Match, DiffTag::Match, DiffTag::Substitute]
        );
        assert_eq!(texts(&diff.hypothesis), vec!["오늘은", "날씨가", "좋네요"]);
    }

    #[test]
    fn test_delete_only_on_reference_side() {
        let reference = toks(&["a", "b", "c"]);
        let hypothesis = toks(&["a", "c"]);
        let alignment = align(&reference, &hypothesis);
        let diff = render(&reference, &hypothesis, &alignment.script);

        assert_eq!(
            tags(&diff.reference),
            vec![DiffTag::Match, DiffTag::Delete, DiffTag::Match]
        );
        assert_eq!(tags(&diff.hypothesis), vec![DiffTag::Match, DiffTag::Match]);
    }

    #[test]
    fn test_insert_only_on_hypothesis_side() {
        let reference = toks(&["a", "c"]);
        let hypothesis = toks(&["a", "b", "c"]);
        let alignment = align(&reference, &hypothesis);
        let diff = render(&reference, &hypothesis, &alignment.script);

        assert_eq!(tags(&diff.reference), vec![DiffTag::Match, DiffTag::Match]);
        assert_eq!(
            tags(&diff.hypothesis),
            vec![DiffTag::Match, DiffTag::Insert, DiffTag::Match]
        );
    }

    #[test]
    fn test_empty_inputs_render_empty() {
        let diff = render(&[], &[], &[]);
        assert!(diff.reference.is_empty());
        assert!(diff.hypothesis.is_empty());
    }

    #[test]
    #[should_panic(expected = "unconsumed")]
    fn test_short_script_panics() {
        let reference = toks(&["a", "b"]);
        let hypothesis = toks(&["a", "b"]);
        // Drop the second op: the renderer must refuse the partial script.
        let script = vec![EditOp::Match {
            reference: 0,
            hypothesis: 0,
        }];
        render(&reference, &hypothesis, &script);
    }

    #[test]
    #[should_panic(expected = "out of order")]
    fn test_out_of_order_script_panics() {
        let reference = toks(&["a", "b"]);
        let hypothesis = toks(&["a", "b"]);
        let script = vec![
            EditOp::Match {
                reference: 1,
                hypothesis: 1,
            },
            EditOp::Match {
                reference: 0,
                hypothesis: 0,
            },
        ];
        render(&reference, &hypothesis, &script);
    }
}
