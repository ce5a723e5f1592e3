//! Keyword-overlap heuristic used when semantic scoring is unavailable.
//!
//! Algorithm:
//! 1. Collect the technical and soft skills the job description mentions.
//! 2. Count how many of those the resume also mentions.
//! 3. technical = matched / required × 100 (60 when the JD names none),
//!    soft = matched / required × 100 (70 when the JD names none).
//! 4. score = 0.7 × technical + 0.3 × soft, truncated and clamped to [15, 90].

use serde::{Deserialize, Serialize};

pub const KEYWORD_SCORE_FLOOR: u32 = 15;
pub const KEYWORD_SCORE_CEILING: u32 = 90;

const TECHNICAL_WEIGHT: f64 = 0.7;
const SOFT_WEIGHT: f64 = 0.3;
const TECHNICAL_DEFAULT: f64 = 60.0;
const SOFT_DEFAULT: f64 = 70.0;

pub const TECHNICAL_SKILLS: &[&str] = &[
    "python",
    "java",
    "javascript",
    "react",
    "node",
    "sql",
    "mongodb",
    "aws",
    "docker",
    "kubernetes",
    "git",
    "html",
    "css",
    "angular",
    "vue",
    "php",
    "c++",
    "c#",
    ".net",
    "spring",
    "django",
    "flask",
    "express",
    "mysql",
    "postgresql",
    "redis",
    "elasticsearch",
    "machine learning",
    "ai",
    "data science",
    "tensorflow",
    "pytorch",
    "pandas",
    "numpy",
    "api",
    "rest",
    "graphql",
    "microservices",
    "devops",
    "ci/cd",
    "jenkins",
    "terraform",
    "azure",
    "gcp",
    "linux",
    "windows",
    "android",
    "ios",
    "swift",
    "kotlin",
    "flutter",
    "blockchain",
    "solidity",
    "web3",
    "rust",
    "go",
    "scala",
    "r",
    "matlab",
    "tableau",
];

pub const SOFT_SKILLS: &[&str] = &[
    "leadership",
    "communication",
    "teamwork",
    "problem solving",
    "analytical",
    "project management",
    "agile",
    "scrum",
    "collaboration",
    "mentoring",
    "creativity",
    "adaptability",
    "time management",
    "critical thinking",
    "decision making",
];

/// Which JD skills the resume covers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillCoverage {
    pub matched_technical: Vec<String>,
    pub missing_technical: Vec<String>,
    pub matched_soft: Vec<String>,
    pub missing_soft: Vec<String>,
}

/// Compares the skill vocabularies of both texts.
pub fn skill_coverage(resume_text: &str, job_description: &str) -> SkillCoverage {
    let resume_lower = resume_text.to_lowercase();
    let jd_lower = job_description.to_lowercase();

    let (matched_technical, missing_technical) = partition(TECHNICAL_SKILLS, &resume_lower, &jd_lower);
    let (matched_soft, missing_soft) = partition(SOFT_SKILLS, &resume_lower, &jd_lower);

    SkillCoverage {
        matched_technical,
        missing_technical,
        matched_soft,
        missing_soft,
    }
}

/// Score in [15, 90] from a coverage report.
pub fn keyword_score(coverage: &SkillCoverage) -> u32 {
    let technical = ratio_or(
        coverage.matched_technical.len(),
        coverage.matched_technical.len() + coverage.missing_technical.len(),
        TECHNICAL_DEFAULT,
    );
    let soft = ratio_or(
        coverage.matched_soft.len(),
        coverage.matched_soft.len() + coverage.missing_soft.len(),
        SOFT_DEFAULT,
    );

    let weighted = technical * TECHNICAL_WEIGHT + soft * SOFT_WEIGHT;
    (weighted.trunc().max(0.0) as u32).clamp(KEYWORD_SCORE_FLOOR, KEYWORD_SCORE_CEILING)
}

fn ratio_or(matched: usize, required: usize, default: f64) -> f64 {
    if required == 0 {
        default
    } else {
        matched as f64 / required as f64 * 100.0
    }
}

fn partition(vocabulary: &[&str], resume_lower: &str, jd_lower: &str) -> (Vec<String>, Vec<String>) {
    let mut matched = Vec::new();
    let mut missing = Vec::new();
    for skill in vocabulary.iter().filter(|s| mentions(jd_lower, s)) {
        if mentions(resume_lower, skill) {
            matched.push(skill.to_string());
        } else {
            missing.push(skill.to_string());
        }
    }
    (matched, missing)
}

/// True when `needle` occurs in `haystack` with no alphanumeric character
/// directly before or after it. Both inputs must already be lowercase.
pub fn mentions(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }

    haystack.match_indices(needle).any(|(start, _)| {
        let end = start + needle.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}
