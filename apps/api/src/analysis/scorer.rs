//! Match scorers: pluggable, trait-based backends that turn two texts into a
//! percentage.
//!
//! `SemanticScorer` is the primary backend; `KeywordScorer` is the
//! deterministic fallback used when embeddings are unavailable.

use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::analysis::embedding::{Embedder, EmbeddingError};
use crate::analysis::keyword::{keyword_score, skill_coverage};
use crate::analysis::similarity::{semantic_similarity, split_sentences, to_percentage};
use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMethod {
    Semantic,
    Keyword,
}

impl ScoringMethod {
    pub fn label(&self) -> &'static str {
        match self {
            ScoringMethod::Semantic => "Semantic similarity",
            ScoringMethod::Keyword => "Keyword overlap",
        }
    }
}

/// Result of one scorer run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreOutcome {
    pub score: u32,
    pub method: ScoringMethod,
    pub model: Option<String>,
    /// Raw mean cosine before conversion to a percentage.
    pub similarity: Option<f32>,
}

/// Implement this to add a backend without touching the analyzer or handlers.
#[async_trait]
pub trait MatchScorer: Send + Sync {
    async fn score(&self, resume_text: &str, job_description: &str)
        -> Result<ScoreOutcome, AppError>;
}

/// Sentence-embedding scorer. Embedding runs on the blocking pool.
pub struct SemanticScorer {
    embedder: Arc<dyn Embedder>,
}

impl SemanticScorer {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }
}

#[async_trait]
impl MatchScorer for SemanticScorer {
    async fn score(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<ScoreOutcome, AppError> {
        let embedder = Arc::clone(&self.embedder);
        let resume_text = resume_text.to_string();
        let job_description = job_description.to_string();

        let similarity = tokio::task::spawn_blocking(move || {
            embed_and_compare(embedder.as_ref(), &resume_text, &job_description)
        })
        .await
        .map_err(|e| AppError::Internal(anyhow!("embedding task failed: {e}")))??;

        Ok(ScoreOutcome {
            score: to_percentage(similarity),
            method: ScoringMethod::Semantic,
            model: Some(self.embedder.model_name().to_string()),
            similarity: Some(similarity),
        })
    }
}

/// Embeds both documents in one batch and returns the mean best-match cosine.
pub fn embed_and_compare(
    embedder: &dyn Embedder,
    resume_text: &str,
    job_description: &str,
) -> Result<f32, EmbeddingError> {
    let resume_sentences = split_sentences(resume_text);
    let jd_sentences = split_sentences(job_description);

    let batch: Vec<&str> = resume_sentences
        .iter()
        .chain(jd_sentences.iter())
        .copied()
        .collect();
    let mut vectors = embedder.embed(&batch)?;

    if vectors.len() != batch.len() {
        return Err(EmbeddingError::Generation(format!(
            "expected {} vectors, got {}",
            batch.len(),
            vectors.len()
        )));
    }

    let jd_vectors = vectors.split_off(resume_sentences.len());
    Ok(semantic_similarity(&vectors, &jd_vectors))
}

/// Skill-vocabulary overlap scorer. Never fails.
pub struct KeywordScorer;

#[async_trait]
impl MatchScorer for KeywordScorer {
    async fn score(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<ScoreOutcome, AppError> {
        let coverage = skill_coverage(resume_text, job_description);
        Ok(ScoreOutcome {
            score: keyword_score(&coverage),
            method: ScoringMethod::Keyword,
            model: None,
            similarity: None,
        })
    }
}
