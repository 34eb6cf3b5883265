//! Depth-first route search.
//!
//! Starting from a synthetic origin, every path is extended with the
//! connections leaving its last station within the wait window. Candidates
//! pass through the compiled [`RuleSet`]; those completing a route are
//! recorded, the rest are explored in priority order.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, trace};

use crate::calendar::CalendarError;
use crate::conditions::{RouteConditions, RuleSet, Verdict};
use crate::domain::Path;
use crate::scorer::{CandidatePriority, LineRequirements, RequirementScores, line_coverage};
use crate::timetable::{ConnectionFilter, TimetableError, TimetableIndex, TimetableSource};

use super::config::SearchConfig;
use super::context::{SearchContext, SearchStatus, TerminationReasons};
use super::corrections::correct_virtual_stations;
use super::rank::{deduplicate, rank_routes, select_earliest_arrival};

/// Error from route search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Failed to load the timetable
    #[error("failed to load timetable: {0}")]
    Timetable(#[from] TimetableError),

    /// Dates outside the planning horizon
    #[error("invalid search dates: {0}")]
    Calendar(#[from] CalendarError),
}

/// Request for route search.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub conditions: RouteConditions,

    /// Outstanding requirements used to order candidates.
    pub requirements: Option<LineRequirements>,

    /// Per-connection requirement costs; take precedence over `requirements`
    /// for ordering.
    pub scores: Option<RequirementScores>,
}

impl SearchRequest {
    /// Create a request without requirement inputs.
    pub fn new(conditions: RouteConditions) -> Self {
        Self {
            conditions,
            requirements: None,
            scores: None,
        }
    }

    pub fn with_requirements(mut self, requirements: LineRequirements) -> Self {
        self.requirements = Some(requirements);
        self
    }

    pub fn with_scores(mut self, scores: RequirementScores) -> Self {
        self.scores = Some(scores);
        self
    }
}

/// Result of route search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Found routes, ranked best-first.
    pub routes: Vec<Path>,

    pub status: SearchStatus,

    pub termination_reasons: TerminationReasons,

    /// Name of the check that stopped the search early, if any.
    pub aborted: Option<&'static str>,

    pub elapsed: Duration,
}

/// Route planner over a timetable source.
pub struct Planner<'a, S: TimetableSource + ?Sized> {
    source: &'a S,
    config: &'a SearchConfig,
}

impl<'a, S: TimetableSource + ?Sized> Planner<'a, S> {
    /// Create a new planner.
    pub fn new(source: &'a S, config: &'a SearchConfig) -> Self {
        Self { source, config }
    }

    /// Find every route satisfying the request's conditions.
    ///
    /// Hitting the search time limit is not an error: the routes found so
    /// far are returned with [`SearchOutcome::aborted`] set.
    pub fn find_all_routes(&self, request: &SearchRequest) -> Result<SearchOutcome, SearchError> {
        let conditions = &request.conditions;

        let filter = ConnectionFilter::from_conditions(conditions, self.config)?;
        let connections = self.source.load(&filter)?;
        let index = TimetableIndex::build(connections);
        debug!(connections = index.len(), "timetable loaded");

        let rules = RuleSet::compile(conditions, self.config, &index);
        let priority =
            CandidatePriority::new(request.requirements.as_ref(), request.scores.as_ref());

        let run = Run {
            index: &index,
            rules: &rules,
            priority,
            requirements: request.requirements.as_ref(),
            config: self.config,
            trace: conditions.trace(),
            report_every: conditions.report_interval(),
        };
        let mut ctx = SearchContext::new().with_outstanding(priority.initial_outstanding());

        let origin = Path::start(conditions.start_station(), conditions.start_time());
        let aborted = match run.expand(&origin, &mut ctx) {
            ControlFlow::Break(Halt::Aborted(reason)) => Some(reason),
            ControlFlow::Break(Halt::Calendar(e)) => return Err(e.into()),
            ControlFlow::Continue(()) => None,
        };

        let mut routes = ctx.take_routes();
        if let Some(check_changes) = conditions.earliest_arrival_search() {
            let min_changes = if check_changes {
                ctx.min_line_changes()
            } else {
                None
            };
            routes = select_earliest_arrival(routes, ctx.earliest_arrival(), min_changes);
        }
        let routes = rank_routes(deduplicate(routes));
        ctx.status.after_route_filtering = routes.len();

        let elapsed = ctx.elapsed();
        debug!(
            routes = routes.len(),
            expansions = ctx.status.expansions,
            rejections = ctx.reasons.total(),
            ?aborted,
            ?elapsed,
            "search finished"
        );

        Ok(SearchOutcome {
            routes,
            status: ctx.status,
            termination_reasons: ctx.reasons,
            aborted,
            elapsed,
        })
    }
}

/// Why the traversal stopped early.
enum Halt {
    Aborted(&'static str),
    Calendar(CalendarError),
}

/// Immutable inputs of one search.
struct Run<'r> {
    index: &'r TimetableIndex,
    rules: &'r RuleSet,
    priority: CandidatePriority<'r>,
    requirements: Option<&'r LineRequirements>,
    config: &'r SearchConfig,
    trace: bool,
    report_every: Option<Duration>,
}

impl Run<'_> {
    fn expand(&self, path: &Path, ctx: &mut SearchContext) -> ControlFlow<Halt> {
        ctx.status.expansions += 1;
        if self.trace {
            info!(
                stations = ?path.stations().collect::<Vec<_>>(),
                arrival = %path.arrival_time(),
                "expanding"
            );
        }
        if let Some(interval) = self.report_every {
            if ctx.report_due(interval) {
                info!(
                    elapsed = ?ctx.elapsed(),
                    routes = ctx.routes().len(),
                    expansions = ctx.status.expansions,
                    "search progress"
                );
            }
        }
        if path.len() >= self.config.max_depth {
            ctx.reasons.record("max_depth");
            return ControlFlow::Continue(());
        }

        let last = path.last();
        let candidates = self
            .index
            .next_connections(last.to, last.arrival, self.rules.max_wait());

        let mut accepted = 0usize;
        let mut branches = Vec::new();
        for candidate in candidates {
            match self.rules.evaluate(candidate, path, ctx) {
                Verdict::Abort(reason) => {
                    debug!(reason, "search aborted");
                    ctx.reasons.record(reason);
                    return ControlFlow::Break(Halt::Aborted(reason));
                }
                Verdict::Reject(reason) => {
                    trace!(connection = %candidate.id, reason, "rejected");
                    ctx.reasons.record(reason);
                }
                Verdict::Accept => {
                    accepted += 1;
                    ctx.status.after_connection_selection += 1;
                    let next = path.extended(Arc::clone(candidate));
                    if self.rules.termination().terminates(candidate) {
                        if let Err(e) = self.record(next, ctx) {
                            return ControlFlow::Break(Halt::Calendar(e));
                        }
                    } else {
                        branches.push(next);
                    }
                }
            }
        }

        if accepted == 0 {
            ctx.status.dead_ends += 1;
            debug!(station = %last.to, arrival = %last.arrival, "dead end");
            return ControlFlow::Continue(());
        }

        branches.sort_by_cached_key(|p| self.priority.of(p.last(), ctx.outstanding()));
        for next in &branches {
            self.expand(next, ctx)?;
        }
        ControlFlow::Continue(())
    }

    fn record(&self, route: Path, ctx: &mut SearchContext) -> Result<(), CalendarError> {
        if !ctx.first_sighting(&route) {
            return Ok(());
        }
        if let Err(reason) = self.rules.accepts_route(&route) {
            trace!(reason, "route rejected");
            ctx.reasons.record(reason);
            return Ok(());
        }
        ctx.status.after_route_selection += 1;

        let route = correct_virtual_stations(&route);
        ctx.update_watermarks(route.arrival_time(), route.line_changes());
        if !ctx.outstanding().is_empty() {
            let coverage = line_coverage(&route, self.config, self.requirements)?;
            ctx.remove_outstanding(coverage.keys.keys().map(|key| &key.line_id));
        }

        debug!(
            legs = route.legs().len(),
            arrival = %route.arrival_time(),
            line_changes = route.line_changes(),
            "route found"
        );
        ctx.push_route(route);
        Ok(())
    }
}
