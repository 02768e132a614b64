/// Live transcript rebuilt from full recognition snapshots.
///
/// Every incoming payload carries the provider session's complete confirmed
/// and tentative segment lists, so applying it replaces both buffers
/// outright. Duplicate or re-delivered payloads therefore cannot duplicate
/// text; this is the invariant the whole capture path leans on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscriptState {
    confirmed: String,
    tentative: String,
}

impl TranscriptState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the transcript from a complete snapshot.
    pub fn apply_snapshot(&mut self, confirmed: &[String], tentative: &[String]) {
        self.confirmed = join_segments(confirmed);
        self.tentative = join_segments(tentative);
    }

    pub fn confirmed_text(&self) -> &str {
        &self.confirmed
    }

    /// Confirmed text plus the in-flight tentative tail, if any.
    pub fn live_text(&self) -> String {
        if self.tentative.is_empty() {
            self.confirmed.clone()
        } else if self.confirmed.is_empty() {
            self.tentative.clone()
        } else {
            format!("{} {}", self.confirmed, self.tentative)
        }
    }

    pub fn clear(&mut self) {
        self.confirmed.clear();
        self.tentative.clear();
    }
}

fn join_segments(segments: &[String]) -> String {
    segments
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
