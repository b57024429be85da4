//! Ambiguity resolution: overlapping mentions are reduced so at most
//! one entity per group survives.

use std::collections::HashSet;

use crate::entity::normalize;
use crate::extended::AMBIGUITY_DAMPING;

use super::Pipeline;

impl Pipeline<'_> {
    /// Keep the first entity of each group that currently matches a
    /// location; mark every other group member for deletion.
    ///
    /// Group order is semantic: the caller lists the preferred reading
    /// first. A name marked in one group is spared when another group
    /// keeps it as its winner. Each deletion damps the initial score of
    /// every location that listed the deleted entity, and locations left
    /// without entities are dropped from the working map.
    pub(crate) fn resolve_ambiguities(&mut self, groups: &[Vec<String>]) {
        let mut winners: HashSet<String> = HashSet::new();
        let mut marked: Vec<String> = Vec::new();

        for group in groups {
            let normalized: Vec<String> = group.iter().map(|name| normalize(name)).collect();
            let winner = normalized
                .iter()
                .find(|name| self.has_surviving_entity(name.as_str()));
            let Some(winner) = winner else {
                continue;
            };
            winners.insert(winner.clone());
            for name in &normalized {
                if name != winner && !marked.contains(name) {
                    marked.push(name.clone());
                }
            }
        }

        let deletions: Vec<String> = marked
            .into_iter()
            .filter(|name| !winners.contains(name))
            .collect();
        for name in &deletions {
            self.delete_entity(name);
        }

        let before = self.working.len();
        self.working
            .retain(|_, location| !location.candidate_entities.is_empty());
        log::debug!(
            "ambiguity resolution deleted {} entities and {} locations",
            deletions.len(),
            before - self.working.len()
        );
    }

    fn has_surviving_entity(&self, name: &str) -> bool {
        self.working
            .values()
            .any(|location| location.entity_names().any(|entity| entity == name))
    }

    /// Remove one entity everywhere, damping each affected location.
    fn delete_entity(&mut self, name: &str) {
        for location in self.working.values_mut() {
            if location.entity_names().any(|entity| entity == name) {
                location.init_score *= AMBIGUITY_DAMPING;
                location.score = location.init_score;
                location
                    .candidate_entities
                    .retain(|entity| entity.norm_name() != name);
            }
        }
    }
}
