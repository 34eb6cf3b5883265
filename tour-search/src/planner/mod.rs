//! Constrained route search.
//!
//! This module implements the search that answers: "which itineraries
//! starting here, within this time budget, satisfy every condition?"
//!
//! The search is a depth-first traversal of timetable connections. Each
//! candidate is checked against the compiled rule set; routes that complete
//! are corrected, filtered and ranked before being returned. All mutable
//! state lives in a [`SearchContext`] created for the invocation.

mod config;
mod context;
mod corrections;
mod rank;
mod search;


pub use config::SearchConfig;
pub use context::{SearchContext, SearchStatus, TerminationReasons};
pub use corrections::correct_virtual_stations;
pub use rank::{deduplicate, rank_routes, select_earliest_arrival, shortest_route};
pub use search::{Planner, SearchError, SearchOutcome, SearchRequest};
