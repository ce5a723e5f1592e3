use serde::{Deserialize, Serialize};

const SKILL_MARKERS: &[&str] = &["skill", "technical", "programming"];
const EXPERIENCE_MARKERS: &[&str] = &["experience", "work", "employment", "career"];
const EDUCATION_MARKERS: &[&str] = &["education", "degree", "university", "college"];

/// Minimum trimmed length (exclusive) for a line to be kept in a section.
const MIN_LINE_CHARS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Skills,
    Experience,
    Education,
}

/// Resume lines grouped under the heading they appear beneath.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeSections {
    pub skills: Vec<String>,
    pub experience: Vec<String>,
    pub education: Vec<String>,
}

/// Line counts per section, as reported to clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionCounts {
    pub skills: usize,
    pub experience: usize,
    pub education: usize,
}

impl ResumeSections {
    pub fn counts(&self) -> SectionCounts {
        SectionCounts {
            skills: self.skills.len(),
            experience: self.experience.len(),
            education: self.education.len(),
        }
    }
}

/// Groups resume lines by the most recent section marker seen.
///
/// Marker lines themselves are kept when long enough, and lines before the
/// first marker are dropped.
pub fn extract_key_sections(text: &str) -> ResumeSections {
    let mut sections = ResumeSections::default();
    let mut current: Option<Section> = None;

    for line in text.lines() {
        let trimmed = line.trim();
        let lower = trimmed.to_lowercase();

        if let Some(section) = classify(&lower) {
            current = Some(section);
        }

        let Some(section) = current else { continue };
        if trimmed.chars().count() <= MIN_LINE_CHARS {
            continue;
        }

        let bucket = match section {
            Section::Skills => &mut sections.skills,
            Section::Experience => &mut sections.experience,
            Section::Education => &mut sections.education,
        };
        bucket.push(trimmed.to_string());
    }

    sections
}

fn classify(line_lower: &str) -> Option<Section> {
    let has_any = |markers: &[&str]| markers.iter().any(|m| line_lower.contains(m));
    if has_any(SKILL_MARKERS) {
        Some(Section::Skills)
    } else if has_any(EXPERIENCE_MARKERS) {
        Some(Section::Experience)
    } else if has_any(EDUCATION_MARKERS) {
        Some(Section::Education)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "Jane Doe\n\
        jane@example.com\n\
        Technical Skills\n\
        Rust, Go, PostgreSQL\n\
        Kafka\n\
        Professional Experience\n\
        Staff Engineer at Acme 2019-2024\n\
        Education\n\
        BSc Computer Science, State University\n";

    #[test]
    fn test_lines_grouped_under_headings() {
        let sections = extract_key_sections(RESUME);
        assert_eq!(
            sections.skills,
            vec!["Technical Skills", "Rust, Go, PostgreSQL"]
        );
        assert_eq!(
            sections.experience,
            vec!["Professional Experience", "Staff Engineer at Acme 2019-2024"]
        );
        assert_eq!(
            sections.education,
            vec!["Education", "BSc Computer Science, State University"]
        );
    }

    #[test]
    fn test_short_lines_and_preamble_dropped() {
        let sections = extract_key_sections(RESUME);
        assert!(!sections.skills.iter().any(|l| l == "Kafka"));
        assert!(!sections.skills.iter().any(|l| l.contains("Jane")));
    }

    #[test]
    fn test_counts() {
        let counts = extract_key_sections(RESUME).counts();
        assert_eq!(
            counts,
            SectionCounts {
                skills: 2,
                experience: 2,
                education: 2
            }
        );
    }

    #[test]
    fn test_no_markers_yields_empty_sections() {
        assert_eq!(
            extract_key_sections("just some words\nmore words here"),
            ResumeSections::default()
        );
    }
}
