//! Sentence-level cosine similarity between a resume and a job description.

/// Fragments at or below this many characters are dropped by `split_sentences`.
const MIN_SENTENCE_CHARS: usize = 10;
/// With fewer usable sentences than this, the whole text is embedded as one unit.
const MIN_SENTENCES: usize = 3;

pub const SEMANTIC_SCORE_FLOOR: u32 = 10;
pub const SEMANTIC_SCORE_CEILING: u32 = 95;

/// Cosine similarity in [-1, 1]. Zero-norm or mismatched vectors score 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Splits text into embedding units on '.'.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let sentences: Vec<&str> = text
        .split('.')
        .map(str::trim)
        .filter(|s| s.chars().count() > MIN_SENTENCE_CHARS)
        .collect();

    if sentences.len() < MIN_SENTENCES {
        vec![text.trim()]
    } else {
        sentences
    }
}

/// Mean over resume sentences of the best cosine against any JD sentence.
pub fn semantic_similarity(resume: &[Vec<f32>], job_description: &[Vec<f32>]) -> f32 {
    if resume.is_empty() || job_description.is_empty() {
        return 0.0;
    }

    let total: f32 = resume
        .iter()
        .map(|r| {
            job_description
                .iter()
                .map(|j| cosine_similarity(r, j))
                .fold(f32::MIN, f32::max)
        })
        .sum();

    total / resume.len() as f32
}

/// Converts a similarity to a whole percentage within the displayed range.
pub fn to_percentage(similarity: f32) -> u32 {
    let raw = if similarity.is_finite() {
        (similarity * 100.0).trunc()
    } else {
        0.0
    };
    (raw.max(0.0) as u32).clamp(SEMANTIC_SCORE_FLOOR, SEMANTIC_SCORE_CEILING)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_identical_is_one() {
        let v = vec![0.3, 0.4, 0.5];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal_is_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn test_cosine_degenerate_inputs() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn test_split_sentences_keeps_long_fragments() {
        let text = "Built payment systems in Rust. Led a team of five engineers. \
                    Ok. Migrated services to Kubernetes clusters.";
        let sentences = split_sentences(text);
        assert_eq!(
            sentences,
            vec![
                "Built payment systems in Rust",
                "Led a team of five engineers",
                "Migrated services to Kubernetes clusters",
            ]
        );
    }

    #[test]
    fn test_split_sentences_short_text_is_single_unit() {
        let text = "  Rust developer. Five years.  ";
        assert_eq!(split_sentences(text), vec!["Rust developer. Five years."]);
    }

    #[test]
    fn test_semantic_similarity_uses_best_match_per_resume_sentence() {
        let resume = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let jd = vec![vec![1.0, 0.0]];
        // best matches: 1.0 and 0.0
        assert!((semantic_similarity(&resume, &jd) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_semantic_similarity_empty_is_zero() {
        assert_eq!(semantic_similarity(&[], &[vec![1.0]]), 0.0);
    }

    #[test]
    fn test_percentage_clamped_to_display_range() {
        assert_eq!(to_percentage(1.0), 95);
        assert_eq!(to_percentage(-0.4), 10);
        assert_eq!(to_percentage(0.0), 10);
        assert_eq!(to_percentage(0.734), 73);
        assert_eq!(to_percentage(f32::NAN), 10);
    }
}
