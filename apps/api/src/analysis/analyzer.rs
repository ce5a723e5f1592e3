//! Analysis pipeline: validate → semantic score (keyword fallback) → report.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::feedback::{score_feedback, ScoreBand, ScoreFeedback};
use crate::analysis::keyword::{skill_coverage, SkillCoverage};
use crate::analysis::scorer::{MatchScorer, ScoreOutcome, ScoringMethod};
use crate::analysis::sections::{extract_key_sections, SectionCounts};
use crate::errors::AppError;

/// Job descriptions above this word count are considered detailed enough.
const GOOD_JD_WORDS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescriptionStats {
    pub word_count: usize,
    pub sufficient: bool,
    pub length_hint: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentStats {
    pub resume_words: usize,
    pub job_description: JobDescriptionStats,
}

/// Everything returned to the client for one analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    /// 0 – 100
    pub score: u32,
    pub band: ScoreBand,
    pub feedback: ScoreFeedback,
    pub method: ScoringMethod,
    pub model: Option<String>,
    pub similarity: Option<f32>,
    /// Set when semantic scoring failed and the keyword scorer answered instead.
    pub fallback_reason: Option<String>,
    pub document_stats: DocumentStats,
    pub skills: SkillCoverage,
    pub resume_sections: SectionCounts,
    pub breakdown: Vec<String>,
    pub elapsed_ms: u64,
}

pub fn job_description_stats(text: &str) -> JobDescriptionStats {
    let word_count = text.split_whitespace().count();
    let sufficient = word_count > GOOD_JD_WORDS;
    JobDescriptionStats {
        word_count,
        sufficient,
        length_hint: if sufficient {
            "Good length".to_string()
        } else {
            "Consider adding more details".to_string()
        },
    }
}

/// Runs the primary scorer and falls back when it fails.
#[derive(Clone)]
pub struct Analyzer {
    /// `None` when semantic scoring is disabled by configuration.
    primary: Option<Arc<dyn MatchScorer>>,
    fallback: Arc<dyn MatchScorer>,
}

impl Analyzer {
    pub fn new(primary: Option<Arc<dyn MatchScorer>>, fallback: Arc<dyn MatchScorer>) -> Self {
        Self { primary, fallback }
    }

    pub async fn analyze(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<MatchReport, AppError> {
        let resume_text = resume_text.trim();
        let job_description = job_description.trim();

        if resume_text.is_empty() {
            return Err(AppError::Validation("Resume text is empty".to_string()));
        }
        if job_description.is_empty() {
            return Err(AppError::Validation(
                "Please enter a job description".to_string(),
            ));
        }

        let started = Instant::now();
        let (outcome, fallback_reason) = self.score(resume_text, job_description).await?;

        let skills = skill_coverage(resume_text, job_description);
        let resume_sections = extract_key_sections(resume_text).counts();
        let document_stats = DocumentStats {
            resume_words: resume_text.split_whitespace().count(),
            job_description: job_description_stats(job_description),
        };
        let feedback = score_feedback(outcome.score);
        let breakdown = build_breakdown(
            &outcome,
            &feedback,
            &document_stats,
            &skills,
            &resume_sections,
            fallback_reason.is_some(),
        );
        let elapsed_ms = started.elapsed().as_millis() as u64;

        info!(
            "Analysis complete: method={:?} score={} elapsed_ms={}",
            outcome.method, outcome.score, elapsed_ms
        );

        Ok(MatchReport {
            analysis_id: Uuid::new_v4(),
            analyzed_at: Utc::now(),
            score: outcome.score,
            band: feedback.band,
            feedback,
            method: outcome.method,
            model: outcome.model,
            similarity: outcome.similarity,
            fallback_reason,
            document_stats,
            skills,
            resume_sections,
            breakdown,
            elapsed_ms,
        })
    }

    async fn score(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<(ScoreOutcome, Option<String>), AppError> {
        let Some(primary) = &self.primary else {
            let outcome = self.fallback.score(resume_text, job_description).await?;
            return Ok((outcome, None));
        };

        match primary.score(resume_text, job_description).await {
            Ok(outcome) => Ok((outcome, None)),
            Err(e) => {
                warn!("Semantic analysis failed: {e}. Falling back to keyword scoring");
                let outcome = self.fallback.score(resume_text, job_description).await?;
                Ok((outcome, Some(e.to_string())))
            }
        }
    }
}

fn build_breakdown(
    outcome: &ScoreOutcome,
    feedback: &ScoreFeedback,
    stats: &DocumentStats,
    skills: &SkillCoverage,
    sections: &SectionCounts,
    fell_back: bool,
) -> Vec<String> {
    let mut lines = vec![format!("Analysis method: {}", outcome.method.label())];
    if let Some(model) = &outcome.model {
        lines.push(format!("AI model: {model}"));
    }
    if fell_back {
        lines.push("Semantic analysis unavailable, keyword overlap used instead".to_string());
    }
    lines.push(format!("Resume words: {}", stats.resume_words));
    lines.push(format!(
        "JD words: {} ({})",
        stats.job_description.word_count, stats.job_description.length_hint
    ));
    lines.push(feedback.advice.clone());

    let matched: Vec<&str> = skills
        .matched_technical
        .iter()
        .chain(&skills.matched_soft)
        .map(String::as_str)
        .collect();
    let missing: Vec<&str> = skills
        .missing_technical
        .iter()
        .chain(&skills.missing_soft)
        .map(String::as_str)
        .collect();
    if !matched.is_empty() {
        lines.push(format!("Matched skills: {}", matched.join(", ")));
    }
    if !missing.is_empty() {
        lines.push(format!("Missing skills: {}", missing.join(", ")));
    }
    if sections.skills > 0 {
        lines.push(format!("Skills found: {} lines", sections.skills));
    }
    lines
}
