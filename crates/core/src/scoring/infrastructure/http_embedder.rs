use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scoring::domain::similarity::SimilarityProvider;

#[derive(Error, Debug)]
pub enum EmbedderError {
    #[error("embedding request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("embedding endpoint returned {status}")]
    Status { status: StatusCode },
    #[error("embedding response did not contain a vector per input text")]
    MissingVectors,
    #[error("embedding vectors differ in length ({a} vs {b})")]
    ShapeMismatch { a: usize, b: usize },
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    texts: [&'a str; 2],
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

/// Similarity via an HTTP embeddings service: both texts are posted in one
/// request and the cosine of the returned vectors is the similarity.
///
/// Expected wire shape: request `{"texts": [a, b]}`, response
/// `{"embeddings": [[...], [...]]}` in input order.
pub struct HttpEmbedder {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpEmbedder {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    async fn embed_pair(&self, a: &str, b: &str) -> Result<(Vec<f32>, Vec<f32>), EmbedderError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&EmbedRequest { texts: [a, b] })
            .send()
            .await
            .map_err(|e| EmbedderError::Request {
                endpoint: self.endpoint.clone(),
                source: e,
            })?;

        if !response.status().is_success() {
            return Err(EmbedderError::Status {
                status: response.status(),
            });
        }

        let body: EmbedResponse = response.json().await.map_err(|e| EmbedderError::Request {
            endpoint: self.endpoint.clone(),
            source: e,
        })?;

        let mut vectors = body.embeddings.into_iter();
        match (vectors.next(), vectors.next()) {
            (Some(first), Some(second)) => Ok((first, second)),
            _ => Err(EmbedderError::MissingVectors),
        }
    }
}

#[async_trait]
impl SimilarityProvider for HttpEmbedder {
    async fn similarity(
        &self,
        a: &str,
        b: &str,
    ) -> Result<f32, Box<dyn std::error::Error + Send + Sync>> {
        let (first, second) = self.embed_pair(a, b).await?;
        if first.len() != second.len() {
            return Err(EmbedderError::ShapeMismatch {
                a: first.len(),
                b: second.len(),
            }
            .into());
        }
        Ok(cosine_similarity(&first, &second))
    }
}

fn l2_normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

/// Dot product of L2-normalized vectors equals cosine similarity.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut a = a.to_vec();
    let mut b = b.to_vec();
    l2_normalize(&mut a);
    l2_normalize(&mut b);
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
