//! Outstanding measurement requirements, supplied per search.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::domain::{ConnectionId, LineId, LineKey};

/// Required measurement count per line key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineRequirements(BTreeMap<LineKey, u32>);

impl LineRequirements {
    pub fn insert(&mut self, key: LineKey, count: u32) {
        self.0.insert(key, count);
    }

    pub fn required(&self, key: &LineKey) -> u32 {
        self.0.get(key).copied().unwrap_or(0)
    }

    pub fn is_required(&self, key: &LineKey) -> bool {
        self.required(key) > 0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lines with at least one key still required.
    pub fn outstanding_lines(&self) -> HashSet<LineId> {
        self.0
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(key, _)| key.line_id.clone())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LineKey, u32)> {
        self.0.iter().map(|(k, v)| (k, *v))
    }
}

impl FromIterator<(LineKey, u32)> for LineRequirements {
    fn from_iter<I: IntoIterator<Item = (LineKey, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Cost of measuring each line from each connection.
///
/// Lower is better. Produced by the caller's requirement planning and
/// passed explicitly into every search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementScores(HashMap<ConnectionId, HashMap<LineId, u32>>);

impl RequirementScores {
    pub fn insert(&mut self, connection: ConnectionId, line: LineId, cost: u32) {
        self.0.entry(connection).or_default().insert(line, cost);
    }

    pub fn costs(&self, connection: ConnectionId) -> Option<&HashMap<LineId, u32>> {
        self.0.get(&connection)
    }

    /// Every line some connection has a cost for.
    pub fn lines(&self) -> HashSet<LineId> {
        self.0.values().flat_map(|m| m.keys().cloned()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TimeWindow, WeekdayGroup};

    fn key(line: &str, window: TimeWindow) -> LineKey {
        LineKey::new(LineId::new(line), window, WeekdayGroup::Weekdays)
    }

    #[test]
    fn outstanding_ignores_satisfied_keys() {
        let requirements: LineRequirements = [
            (key("S1", TimeWindow::Morning), 2),
            (key("S2", TimeWindow::Morning), 0),
        ]
        .into_iter()
        .collect();

        assert!(requirements.is_required(&key("S1", TimeWindow::Morning)));
        assert!(!requirements.is_required(&key("S2", TimeWindow::Morning)));
        assert!(!requirements.is_required(&key("S1", TimeWindow::Evening)));
        assert_eq!(
            requirements.outstanding_lines(),
            HashSet::from([LineId::new("S1")])
        );
    }

    #[test]
    fn scores_by_connection() {
        let mut scores = RequirementScores::default();
        scores.insert(ConnectionId(1), LineId::new("S1"), 3);
        scores.insert(ConnectionId(1), LineId::new("S2"), 1);
        scores.insert(ConnectionId(2), LineId::new("S3"), 5);

        assert_eq!(scores.costs(ConnectionId(1)).map(|c| c.len()), Some(2));
        assert!(scores.costs(ConnectionId(9)).is_none());
        assert_eq!(scores.lines().len(), 3);
    }
}
