//! Route scoring against measurement requirements.
//!
//! A route is cut into [`RouteSegment`]s; each measurable segment satisfies
//! the [`LineKey`](crate::domain::LineKey)s of its line, time window and the
//! weekday groups the route runs on. The same machinery orders candidates
//! during search so that outstanding requirements are explored first.

mod coverage;
mod priority;
mod requirements;
mod segments;

pub use coverage::{Coverage, SegmentCoverage, coverage_for_day, coverage_of_routes, line_coverage};
pub use priority::CandidatePriority;
pub use requirements::{LineRequirements, RequirementScores};
pub use segments::{RouteSegment, route_segments};
