//! Adding-entity detection: labels of orphan parents that occur
//! verbatim in the text.
//!
//! A parent referenced by some matched location but not itself matched
//! by any candidate is an "orphan parent". When one of its labels
//! appears in the token stream as a contiguous run of whole tokens, the
//! label becomes a weak reinforcement signal for the propagation stage.

use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use crate::error::Result;
use crate::id::LocationId;

use super::Pipeline;

fn hash_token(token: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    token.hash(&mut hasher);
    hasher.finish()
}

/// Whether `needle` occurs as a contiguous sub-sequence of `haystack`.
fn contains_subsequence(haystack: &[u64], needle: &[u64]) -> bool {
    !needle.is_empty()
        && needle.len() <= haystack.len()
        && haystack.windows(needle.len()).any(|window| window == needle)
}

impl Pipeline<'_> {
    /// Collect orphan-parent labels literally present in `tokens`.
    ///
    /// Matching is on token boundaries, not substrings: a label counts
    /// when its space-separated words line up with consecutive text
    /// tokens after lower-casing. Token comparison goes through hashes;
    /// the token list is hashed once up front.
    pub(crate) fn detect_adding_entities(&mut self, tokens: &[String]) -> Result<()> {
        let mut orphans: BTreeSet<LocationId> = BTreeSet::new();
        for location in self.working.values() {
            for parent_id in location.location().parent_ids() {
                if !self.working.contains_key(parent_id) {
                    orphans.insert(*parent_id);
                }
            }
        }

        let token_hashes: Vec<u64> = tokens
            .iter()
            .map(|token| hash_token(&token.to_lowercase()))
            .collect();

        for orphan_id in orphans {
            let parent = self.dictionary.require(&orphan_id)?;
            for label in parent.labels() {
                let label_hashes: Vec<u64> =
                    label.split_whitespace().map(hash_token).collect();
                if contains_subsequence(&token_hashes, &label_hashes) {
                    self.adding_entities.insert(label.clone());
                }
            }
        }

        log::debug!("found {} adding entities in the text", self.adding_entities.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::Dictionary;
    use crate::entity::CandidateEntity;
    use crate::location::LocationRecord;

    fn record(id: &str, name: &str) -> LocationRecord {
        LocationRecord {
            id: id.to_string(),
            name: Some(name.to_string()),
            ..LocationRecord::default()
        }
    }

    fn tokens(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    fn fixture() -> Dictionary {
        let mut continent = record("5000000000000", "North America");
        continent.other_names = vec!["America".to_string()];
        let usa = record("5118000000000", "United States");
        let california = record("5118000010000", "California");
        let la = record("5118000010001", "Los Angeles");
        Dictionary::from_records([continent, usa, california, la]).unwrap()
    }

    #[test]
    fn matches_orphan_labels_on_token_boundaries() {
        let dictionary = fixture();
        let mut pipeline = Pipeline::new(&dictionary, &[]);
        pipeline
            .expand(&[CandidateEntity::new("Los Angeles", 0.4)])
            .unwrap();

        pipeline
            .detect_adding_entities(&tokens("crime is high in America these days"))
            .unwrap();

        // The continent's short label occurs; "north america",
        // "california" and "united states" do not.
        assert!(pipeline.adding_entities.contains("america"));
        assert_eq!(pipeline.adding_entities.len(), 1);
    }

    #[test]
    fn multi_word_labels_must_be_contiguous() {
        let dictionary = fixture();
        let mut pipeline = Pipeline::new(&dictionary, &[]);
        pipeline
            .expand(&[CandidateEntity::new("Los Angeles", 0.4)])
            .unwrap();

        pipeline
            .detect_adding_entities(&tokens(
                "the United States of course and also North America",
            ))
            .unwrap();

        assert!(pipeline.adding_entities.contains("united states"));
        assert!(pipeline.adding_entities.contains("north america"));
        assert!(pipeline.adding_entities.contains("america"));

        // Words present but not adjacent do not match.
        let mut pipeline = Pipeline::new(&dictionary, &[]);
        pipeline
            .expand(&[CandidateEntity::new("Los Angeles", 0.4)])
            .unwrap();
        pipeline
            .detect_adding_entities(&tokens("united nations and several states"))
            .unwrap();
        assert!(!pipeline.adding_entities.contains("united states"));
    }

    #[test]
    fn matched_parents_are_not_orphans() {
        let dictionary = fixture();
        let mut pipeline = Pipeline::new(&dictionary, &[]);
        pipeline
            .expand(&[
                CandidateEntity::new("Los Angeles", 0.4),
                CandidateEntity::new("California", 0.5),
            ])
            .unwrap();

        pipeline
            .detect_adding_entities(&tokens("California dreaming"))
            .unwrap();

        // California is in the working map, so its label is not an
        // adding entity even though it occurs in the text.
        assert!(!pipeline.adding_entities.contains("california"));
    }

    #[test]
    fn no_working_locations_no_adding_entities() {
        let dictionary = fixture();
        let mut pipeline = Pipeline::new(&dictionary, &[]);
        pipeline
            .detect_adding_entities(&tokens("America everywhere"))
            .unwrap();
        assert!(pipeline.adding_entities.is_empty());
    }

    #[test]
    fn subsequence_matching_is_exact() {
        let haystack: Vec<u64> = ["a", "b", "c"].iter().map(|t| hash_token(t)).collect();
        let ab: Vec<u64> = ["a", "b"].iter().map(|t| hash_token(t)).collect();
        let ac: Vec<u64> = ["a", "c"].iter().map(|t| hash_token(t)).collect();
        let long: Vec<u64> = ["a", "b", "c", "d"].iter().map(|t| hash_token(t)).collect();

        assert!(contains_subsequence(&haystack, &ab));
        assert!(!contains_subsequence(&haystack, &ac));
        assert!(!contains_subsequence(&haystack, &long));
        assert!(!contains_subsequence(&haystack, &[]));
    }
}
