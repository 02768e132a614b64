use async_trait::async_trait;

/// Capability for judging how close two texts are in meaning.
///
/// Implementations return a cosine similarity in [-1, 1] computed over the
/// raw texts. Failure must stay distinguishable from a valid zero
/// similarity, so errors are reported, never mapped to 0.
#[async_trait]
pub trait SimilarityProvider: Send + Sync {
    async fn similarity(
        &self,
        a: &str,
        b: &str,
    ) -> Result<f32, Box<dyn std::error::Error + Send + Sync>>;
}

/// Remaps a cosine similarity in [-1, 1] onto the 0-100 score scale.
/// Out-of-range inputs from a misbehaving backend pin to the nearest bound.
pub fn similarity_subscore(similarity: f32) -> u32 {
    let scaled = ((f64::from(similarity) + 1.0) / 2.0 * 100.0).round();
    scaled.clamp(0.0, 100.0) as u32
}
