use serde::{Deserialize, Serialize};

/// Color-coded score range shown with the percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Good,
    Moderate,
    Low,
    VeryLow,
}

/// Band plus everything a client needs to render it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreFeedback {
    pub band: ScoreBand,
    pub message: String,
    pub color: String,
    pub background_color: String,
    pub advice: String,
}

impl ScoreBand {
    pub fn from_score(score: u32) -> Self {
        match score {
            80.. => ScoreBand::Excellent,
            65..=79 => ScoreBand::Good,
            45..=64 => ScoreBand::Moderate,
            25..=44 => ScoreBand::Low,
            _ => ScoreBand::VeryLow,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent match! Your resume aligns very well with this job.",
            ScoreBand::Good => "Good match! Consider highlighting relevant skills more prominently.",
            ScoreBand::Moderate => "Moderate match. You may want to tailor your resume for this role.",
            ScoreBand::Low => "Low match. Consider significant resume adjustments for this position.",
            ScoreBand::VeryLow => {
                "Very low match. This role may not be suitable or resume needs major updates."
            }
        }
    }

    /// (foreground, background) hex colors.
    pub fn colors(&self) -> (&'static str, &'static str) {
        match self {
            ScoreBand::Excellent => ("#28a745", "#d4edda"),
            ScoreBand::Good => ("#17a2b8", "#d1ecf1"),
            ScoreBand::Moderate => ("#ffc107", "#fff3cd"),
            ScoreBand::Low | ScoreBand::VeryLow => ("#dc3545", "#f8d7da"),
        }
    }

    /// One-line recommendation for the breakdown. Low and very low share one.
    pub fn advice(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent match - Apply with confidence",
            ScoreBand::Good => "Good match - Highlight key skills",
            ScoreBand::Moderate => "Moderate match - Tailor resume",
            ScoreBand::Low | ScoreBand::VeryLow => "Low match - Consider major changes",
        }
    }
}

pub fn score_feedback(score: u32) -> ScoreFeedback {
    let band = ScoreBand::from_score(score);
    let (color, background_color) = band.colors();
    ScoreFeedback {
        band,
        message: band.message().to_string(),
        color: color.to_string(),
        background_color: background_color.to_string(),
        advice: band.advice().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(ScoreBand::from_score(100), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_score(80), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_score(79), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(65), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(64), ScoreBand::Moderate);
        assert_eq!(ScoreBand::from_score(45), ScoreBand::Moderate);
        assert_eq!(ScoreBand::from_score(44), ScoreBand::Low);
        assert_eq!(ScoreBand::from_score(25), ScoreBand::Low);
        assert_eq!(ScoreBand::from_score(24), ScoreBand::VeryLow);
        assert_eq!(ScoreBand::from_score(0), ScoreBand::VeryLow);
    }

    #[test]
    fn test_feedback_carries_colors() {
        let feedback = score_feedback(70);
        assert_eq!(feedback.band, ScoreBand::Good);
        assert_eq!(feedback.color, "#17a2b8");
        assert_eq!(feedback.background_color, "#d1ecf1");
        assert!(feedback.message.starts_with("Good match!"));
    }

    #[test]
    fn test_low_bands_share_advice() {
        assert_eq!(ScoreBand::Low.advice(), ScoreBand::VeryLow.advice());
    }

    #[test]
    fn test_band_serializes_snake_case() {
        let json = serde_json::to_string(&ScoreBand::VeryLow).unwrap();
        assert_eq!(json, r#""very_low""#);
    }
}
