/// One step of an alignment between a reference and a hypothesis token
/// sequence. Indices name the tokens the step consumes; a valid script
/// consumes every index of both sequences exactly once, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    /// Tokens are equal; consumes one index from each side.
    Match { reference: usize, hypothesis: usize },
    /// Tokens differ; consumes one index from each side.
    Substitute { reference: usize, hypothesis: usize },
    /// Reference token with no counterpart in the hypothesis.
    Delete { reference: usize },
    /// Hypothesis token with no counterpart in the reference.
    Insert { hypothesis: usize },
}

impl EditOp {
    pub fn is_error(&self) -> bool {
        !matches!(self, EditOp::Match { .. })
    }
}
