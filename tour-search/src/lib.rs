//! Route search for measurement tours.
//!
//! Given a transit timetable and a set of route conditions, finds every
//! itinerary a field worker could ride: round trips within a time budget,
//! tours through chosen stations, or routes covering outstanding line
//! measurements.

pub mod calendar;
pub mod conditions;
pub mod domain;
pub mod planner;
pub mod scorer;
pub mod timetable;
pub mod web;
