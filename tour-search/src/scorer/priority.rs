//! Ordering of candidate connections during search.

use std::collections::HashSet;

use crate::domain::{Connection, LineId};

use super::requirements::{LineRequirements, RequirementScores};

/// Ranks candidates so the cheapest outstanding requirement is explored first.
///
/// Lower priorities are explored first. Sorting by priority is stable, so
/// equal candidates keep their departure order.
#[derive(Debug, Clone, Copy, Default)]
pub struct CandidatePriority<'a> {
    requirements: Option<&'a LineRequirements>,
    scores: Option<&'a RequirementScores>,
}

impl<'a> CandidatePriority<'a> {
    pub fn new(
        requirements: Option<&'a LineRequirements>,
        scores: Option<&'a RequirementScores>,
    ) -> Self {
        Self {
            requirements,
            scores,
        }
    }

    /// Priority of `candidate` given the lines still outstanding.
    pub fn of(&self, candidate: &Connection, outstanding: &HashSet<LineId>) -> u32 {
        if let Some(scores) = self.scores {
            return scores
                .costs(candidate.id)
                .and_then(|costs| {
                    costs
                        .iter()
                        .filter(|(line, _)| outstanding.contains(*line))
                        .map(|(_, cost)| *cost)
                        .min()
                })
                .unwrap_or(u32::MAX);
        }
        if self.requirements.is_some() {
            let wanted = candidate
                .line_id
                .as_ref()
                .is_some_and(|line| outstanding.contains(line));
            return if wanted { 0 } else { 1 };
        }
        0
    }

    /// Lines a search starts out wanting to measure.
    pub fn initial_outstanding(&self) -> HashSet<LineId> {
        let mut lines = HashSet::new();
        if let Some(requirements) = self.requirements {
            lines.extend(requirements.outstanding_lines());
        }
        if let Some(scores) = self.scores {
            lines.extend(scores.lines());
        }
        lines
    }
}
