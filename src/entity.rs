//! Candidate entities: scored location mentions extracted from a text.

use serde::Serialize;
use std::hash::{Hash, Hasher};

/// Lower-case and trim a mention for dictionary matching.
///
/// This is the only name normalization the engine performs, and it is
/// idempotent.
#[must_use]
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A mention in text, already scored for how likely it names a location.
///
/// Two candidates are the same entity when their normalized names are
/// equal; the surface form and the score do not participate in equality
/// or hashing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateEntity {
    name: String,
    score: f64,
    #[serde(skip)]
    norm_name: String,
}

impl CandidateEntity {
    /// Create a candidate entity. The score is clamped to `[0, 1]`.
    #[must_use]
    pub fn new(name: impl Into<String>, score: f64) -> Self {
        let name = name.into();
        let norm_name = normalize(&name);
        Self {
            name,
            score: score.clamp(0.0, 1.0),
            norm_name,
        }
    }

    /// The surface form as extracted.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Semantic "is this a location?" score in `[0, 1]`.
    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }

    /// The normalized (trimmed, lower-cased) name used for matching.
    #[must_use]
    pub fn norm_name(&self) -> &str {
        &self.norm_name
    }
}

impl PartialEq for CandidateEntity {
    fn eq(&self, other: &Self) -> bool {
        self.norm_name == other.norm_name
    }
}

impl Eq for CandidateEntity {}

impl Hash for CandidateEntity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.norm_name.hash(state);
    }
}
