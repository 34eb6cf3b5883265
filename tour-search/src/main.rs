use std::error::Error;
use std::net::SocketAddr;

use tracing::info;
use tracing_subscriber::EnvFilter;

use tour_search::planner::SearchConfig;
use tour_search::timetable::CsvTimetable;
use tour_search::web::{AppState, create_router};

/// Address used when `TOUR_BIND_ADDR` is not set.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let csv_path = std::env::var("TOUR_TIMETABLE_CSV")
        .map_err(|_| "TOUR_TIMETABLE_CSV must name the connection CSV file")?;
    let addr: SocketAddr = std::env::var("TOUR_BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()?;

    let config = SearchConfig::default();
    let timetable = CsvTimetable::new(&csv_path, config.horizon);
    info!(path = %csv_path, "using timetable");

    let state = AppState::new(timetable, config);
    let app = create_router(state);

    info!(%addr, "tour planner listening");
    info!("  GET  /health          - Health check");
    info!("  POST /routes/search   - Search routes");
    info!("  GET  /trips/:trip_id  - Trip station chain");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
