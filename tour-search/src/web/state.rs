//! Application state for the web layer.

use std::sync::Arc;

use crate::planner::SearchConfig;
use crate::timetable::TimetableSource;

/// Shared application state.
///
/// Every search loads its own filtered connections from `source`.
#[derive(Clone)]
pub struct AppState {
    /// Timetable the searches read from
    pub source: Arc<dyn TimetableSource>,

    /// Search configuration
    pub config: Arc<SearchConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(source: impl TimetableSource + 'static, config: SearchConfig) -> Self {
        Self {
            source: Arc::new(source),
            config: Arc::new(config),
        }
    }
}
