//! Route ranking and final filters.
//!
//! Applied once to the completed route list after search finishes.

use std::collections::HashSet;

use crate::domain::{ClockTime, Path};

/// Rank routes by preference.
///
/// Routes are ranked by:
/// 1. Final arrival (earlier is better)
/// 2. Number of line changes (fewer is better)
/// 3. Total duration (shorter is better)
///
/// Returns routes sorted best-first. The sort is stable.
pub fn rank_routes(mut routes: Vec<Path>) -> Vec<Path> {
    routes.sort_by_key(|r| (r.arrival_time(), r.line_changes(), r.total_duration_minutes()));
    routes
}

/// Keep routes that match the earliest-arrival watermarks.
///
/// `earliest` is the earliest recorded arrival. `min_changes`, when given,
/// is the fewest line changes recorded at that arrival; routes needing more
/// are dropped.
pub fn select_earliest_arrival(
    routes: Vec<Path>,
    earliest: Option<ClockTime>,
    min_changes: Option<usize>,
) -> Vec<Path> {
    routes
        .into_iter()
        .filter(|r| earliest.is_none_or(|e| r.arrival_time() <= e))
        .filter(|r| min_changes.is_none_or(|m| r.line_changes() <= m))
        .collect()
}

/// The route with the earliest final arrival.
///
/// Ties go to the route listed first.
pub fn shortest_route(routes: &[Path]) -> Option<&Path> {
    routes
        .iter()
        .enumerate()
        .min_by_key(|(i, r)| (r.arrival_time(), *i))
        .map(|(_, r)| r)
}

/// Remove routes with a repeated connection sequence, keeping the first.
pub fn deduplicate(routes: Vec<Path>) -> Vec<Path> {
    let mut seen = HashSet::new();
    routes
        .into_iter()
        .filter(|r| seen.insert(r.connection_ids()))
        .collect()
}
