//! Web layer for the tour planner.
//!
//! Provides HTTP endpoints for route search and trip lookup.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
