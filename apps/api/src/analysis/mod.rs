// Resume / job description matching.
// Semantic scoring through a sentence-embedding model, keyword overlap as fallback.

pub mod analyzer;
pub mod embedding;
pub mod feedback;
pub mod handlers;
pub mod keyword;
pub mod scorer;
pub mod sections;
pub mod similarity;
