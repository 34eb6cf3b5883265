//! Route conditions and the checks they enable.
//!
//! A search is configured by a list of [`Condition`]s. [`RouteConditions`]
//! validates them, and [`RuleSet::compile`] turns the per-connection and
//! per-route ones into predicates evaluated in a fixed order.

mod checks;
mod condition;
mod predicate;
mod registry;
mod rules;

pub use checks::*;
pub use condition::{Condition, ConditionKind, IncludeOption, StationWait, TerminationTarget};
pub use predicate::{ConnectionPredicate, RoutePredicate, TerminationRule, Verdict};
pub use registry::{ConditionError, RouteConditions};
pub use rules::RuleSet;
