use thiserror::Error;

use crate::alignment::domain::aligner::{align, word_error_rate};
use crate::alignment::domain::diff::{render, DiffRender};
use crate::scoring::domain::overlap::overlap_subscore;
use crate::scoring::domain::similarity::{similarity_subscore, SimilarityProvider};
use crate::text::domain::normalizer::{normalize, strip_punctuation, NormalizeOptions};
use crate::text::domain::tokenizer::tokenize;

/// How a grading run judges the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreMode {
    /// Word-for-word accuracy via WER.
    Exact,
    /// Meaning over wording: semantic similarity plus token overlap.
    Content,
}

#[derive(Error, Debug)]
pub enum GradeError {
    #[error(
        "not enough input to grade: reference has {reference_tokens} token(s), \
         transcript has {hypothesis_tokens}"
    )]
    InsufficientInput {
        reference_tokens: usize,
        hypothesis_tokens: usize,
    },
}

/// Mode-specific breakdown backing the headline score.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreDetail {
    Exact {
        distance: usize,
        wer: f64,
    },
    /// `semantic` is absent when the embedding capability was missing or
    /// failed; the score is then the overlap sub-score alone.
    Content {
        semantic: Option<u32>,
        overlap: u32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreReport {
    /// Headline accuracy on the 0-100 scale.
    pub score: u32,
    pub reference_tokens: usize,
    pub hypothesis_tokens: usize,
    pub detail: ScoreDetail,
    /// Token-level diff for display. In content mode it is illustrative
    /// only and does not feed the score.
    pub diff: DiffRender,
    pub notes: String,
}

/// Grades a frozen transcript against a reference text. Each call evaluates
/// its inputs from scratch; nothing is cached across runs.
pub struct Scorer {
    embedder: Option<Box<dyn SimilarityProvider>>,
}

impl Scorer {
    pub fn new(embedder: Option<Box<dyn SimilarityProvider>>) -> Self {
        Self { embedder }
    }

    pub async fn score(
        &self,
        reference: &str,
        hypothesis: &str,
        mode: ScoreMode,
        options: NormalizeOptions,
    ) -> Result<ScoreReport, GradeError> {
        let reference = reference.trim();
        let hypothesis = hypothesis.trim();

        let reference_tokens = tokenize(&normalize(reference, options));
        let hypothesis_tokens = tokenize(&normalize(hypothesis, options));

        if reference.is_empty() || hypothesis.is_empty() {
            return Err(GradeError::InsufficientInput {
                reference_tokens: reference_tokens.len(),
                hypothesis_tokens: hypothesis_tokens.len(),
            });
        }

        match mode {
            ScoreMode::Exact => Ok(self.score_exact(&reference_tokens, &hypothesis_tokens)),
            ScoreMode::Content => Ok(self
                .score_content(reference, hypothesis, &reference_tokens, &hypothesis_tokens)
                .await),
        }
    }

    fn score_exact(&self, reference: &[String], hypothesis: &[String]) -> ScoreReport {
        let alignment = align(reference, hypothesis);
        let wer = word_error_rate(alignment.distance, reference.len(), hypothesis.len());
        let score = ((1.0 - wer).max(0.0) * 100.0).round() as u32;
        let diff = render(reference, hypothesis, &alignment.script);

        ScoreReport {
            score,
            reference_tokens: reference.len(),
            hypothesis_tokens: hypothesis.len(),
            notes: format!(
                "exact mode: score = (1 - WER) * 100, {} edit(s) over {} reference token(s)",
                alignment.distance,
                reference.len()
            ),
            detail: ScoreDetail::Exact {
                distance: alignment.distance,
                wer,
            },
            diff,
        }
    }

    async fn score_content(
        &self,
        reference: &str,
        hypothesis: &str,
        reference_tokens: &[String],
        hypothesis_tokens: &[String],
    ) -> ScoreReport {
        // The semantic sub-score sees the raw texts; surface form is the
        // embedding backend's problem.
        let semantic = match &self.embedder {
            Some(embedder) => match embedder.similarity(reference, hypothesis).await {
                Ok(similarity) => Some(similarity_subscore(similarity)),
                Err(e) => {
                    log::warn!("semantic similarity unavailable, scoring overlap only: {e}");
                    None
                }
            },
            None => None,
        };

        // Overlap always compares punctuation-stripped tokens, independent
        // of the caller's options.
        let overlap = overlap_subscore(
            &tokenize(&strip_punctuation(reference)),
            &tokenize(&strip_punctuation(hypothesis)),
        );

        let mut parts: Vec<u32> = Vec::with_capacity(2);
        if let Some(s) = semantic {
            parts.push(s);
        }
        parts.push(overlap);
        let score =
            (parts.iter().map(|p| f64::from(*p)).sum::<f64>() / parts.len() as f64).round() as u32;

        // Illustrative only; alignment errors here do not affect the score.
        let alignment = align(reference_tokens, hypothesis_tokens);
        let diff = render(reference_tokens, hypothesis_tokens, &alignment.script);

        let notes = match semantic {
            Some(s) => format!(
                "content mode: mean of semantic {s}/100 and overlap {overlap}/100"
            ),
            None => format!(
                "content mode: semantic similarity unavailable, overlap {overlap}/100 only"
            ),
        };

        ScoreReport {
            score,
            reference_tokens: reference_tokens.len(),
            hypothesis_tokens: hypothesis_tokens.len(),
            detail: ScoreDetail::Content { semantic, overlap },
            diff,
            notes,
        }
    }
}
