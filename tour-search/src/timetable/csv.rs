//! CSV timetable files.
//!
//! One headered row per connection:
//!
//! ```text
//! from_station,to_station,connection_id,line_id,trip_id,trip_number,operator,
//! line_category,line_name,departure_hour,departure_minute,departure_total_minutes,
//! arrival_hour,arrival_minute,arrival_total_minutes,service_days,station_order
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use serde::Deserialize;
use tracing::debug;

use crate::calendar::{PlanningHorizon, ServiceDays};
use crate::domain::{ClockTime, Connection, ConnectionId, LineCategory, LineId, StationId, TripId};

use super::{ConnectionFilter, TimetableError, TimetableSource};

#[derive(Debug, Deserialize)]
struct ConnectionRow {
    from_station: u32,
    to_station: u32,
    connection_id: u64,
    line_id: Option<String>,
    trip_id: Option<String>,
    trip_number: Option<u32>,
    #[serde(default)]
    operator: String,
    #[serde(default)]
    line_category: String,
    #[serde(default)]
    line_name: String,
    departure_hour: u32,
    departure_minute: u32,
    departure_total_minutes: u32,
    arrival_hour: u32,
    arrival_minute: u32,
    arrival_total_minutes: u32,
    service_days: Option<String>,
    #[serde(default)]
    station_order: u32,
}

/// A timetable read from a CSV file on every load.
#[derive(Debug, Clone)]
pub struct CsvTimetable {
    path: PathBuf,
    horizon: PlanningHorizon,
}

impl CsvTimetable {
    pub fn new(path: impl Into<PathBuf>, horizon: PlanningHorizon) -> Self {
        Self {
            path: path.into(),
            horizon,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read matching connections from any reader.
    pub fn read_from<R: Read>(
        reader: R,
        horizon: &PlanningHorizon,
        filter: &ConnectionFilter,
    ) -> Result<Vec<Connection>, TimetableError> {
        let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut codes: HashMap<String, ServiceDays> = HashMap::new();
        let mut connections = Vec::new();
        let mut rows = 0usize;

        for (index, record) in rdr.deserialize::<ConnectionRow>().enumerate() {
            // header is line 1
            let line = index + 2;
            let row = record?;
            rows += 1;

            let connection = to_connection(row, line, horizon, &mut codes)?;
            if filter.matches(&connection) {
                connections.push(connection);
            }
        }

        debug!(rows, kept = connections.len(), codes = codes.len(), "read timetable");
        Ok(connections)
    }
}

impl TimetableSource for CsvTimetable {
    fn load(&self, filter: &ConnectionFilter) -> Result<Vec<Connection>, TimetableError> {
        let file = File::open(&self.path).map_err(|source| TimetableError::Io {
            path: self.path.clone(),
            source,
        })?;
        Self::read_from(BufReader::new(file), &self.horizon, filter)
    }
}

fn to_connection(
    row: ConnectionRow,
    line: usize,
    horizon: &PlanningHorizon,
    codes: &mut HashMap<String, ServiceDays>,
) -> Result<Connection, TimetableError> {
    let invalid = |reason: String| TimetableError::InvalidRow { line, reason };

    let departure = clock(row.departure_hour, row.departure_minute, row.departure_total_minutes)
        .ok_or_else(|| invalid("departure hour, minute and total disagree".to_string()))?;
    let arrival = clock(row.arrival_hour, row.arrival_minute, row.arrival_total_minutes)
        .ok_or_else(|| invalid("arrival hour, minute and total disagree".to_string()))?;

    let service_days = match row.service_days.as_deref().map(str::trim) {
        None | Some("") => ServiceDays::Daily,
        Some(code) => match codes.get(code) {
            Some(days) => days.clone(),
            None => {
                let days = ServiceDays::parse(code, horizon)
                    .map_err(|source| TimetableError::Calendar { line, source })?;
                codes.insert(code.to_string(), days.clone());
                days
            }
        },
    };

    let mut connection = Connection::new(
        ConnectionId(row.connection_id),
        StationId::new(row.from_station),
        StationId::new(row.to_station),
        departure,
        arrival,
    )
    .map_err(|e| invalid(e.to_string()))?
    .with_operator(row.operator)
    .with_category(LineCategory::new(row.line_category))
    .with_line_name(row.line_name)
    .with_service_days(service_days)
    .with_station_order(row.station_order);

    if let Some(line_id) = row.line_id.filter(|s| !s.is_empty()) {
        connection = connection.with_line(LineId::new(line_id));
    }
    if let Some(trip_id) = row.trip_id.filter(|s| !s.is_empty()) {
        connection = connection.with_trip(TripId::new(trip_id));
    }
    if let Some(number) = row.trip_number {
        connection = connection.with_trip_number(number);
    }

    Ok(connection)
}

fn clock(hour: u32, minute: u32, total: u32) -> Option<ClockTime> {
    let time = ClockTime::from_hm(hour, minute).ok()?;
    (time.total_minutes() == total).then_some(time)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const HEADER: &str = "from_station,to_station,connection_id,line_id,trip_id,trip_number,operator,line_category,line_name,departure_hour,departure_minute,departure_total_minutes,arrival_hour,arrival_minute,arrival_total_minutes,service_days,station_order";

    fn write_csv(rows: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn loads_rows() {
        let file = write_csv(&[
            "8503000,8503006,1,11-S8,T1,18815,SBB,S,S8,8,0,480,8,10,490,,1",
            "8503006,8503010,2,11-S8,T1,18815,SBB,S,S8,8,12,492,8,20,500,,2",
        ]);
        let source = CsvTimetable::new(file.path(), PlanningHorizon::default());
        let connections = source.load(&ConnectionFilter::all()).unwrap();

        assert_eq!(connections.len(), 2);
        let first = &connections[0];
        assert_eq!(first.id, ConnectionId(1));
        assert_eq!(first.from, StationId::new(8503000));
        assert_eq!(first.line_id, Some(LineId::new("11-S8")));
        assert_eq!(first.trip_id, Some(TripId::new("T1")));
        assert_eq!(first.trip_number, Some(18815));
        assert_eq!(first.category.as_str(), "S");
        assert_eq!(first.departure.to_string(), "08:00");
        assert!(first.service_days.is_daily());
        assert_eq!(connections[1].station_order, 2);
    }

    #[test]
    fn empty_optional_fields() {
        let file = write_csv(&["1001,1002,7,,,,,Y,,8,0,480,8,3,483,,0"]);
        let source = CsvTimetable::new(file.path(), PlanningHorizon::default());
        let connections = source.load(&ConnectionFilter::all()).unwrap();

        let walk = &connections[0];
        assert_eq!(walk.line_id, None);
        assert_eq!(walk.trip_id, None);
        assert_eq!(walk.trip_number, None);
        assert!(walk.is_on_foot());
    }

    #[test]
    fn shares_identical_codes() {
        let horizon = PlanningHorizon::default();
        let code = ServiceDays::from_dates(horizon.date_of(3), &horizon)
            .unwrap()
            .to_hex(&horizon);
        let row1 = format!("1001,1002,1,L,T1,1,SBB,S,S1,8,0,480,8,10,490,{code},1");
        let row2 = format!("1002,1003,2,L,T1,1,SBB,S,S1,8,10,490,8,20,500,{code},2");
        let file = write_csv(&[&row1, &row2]);

        let connections = CsvTimetable::new(file.path(), horizon)
            .load(&ConnectionFilter::all())
            .unwrap();
        match (&connections[0].service_days, &connections[1].service_days) {
            (ServiceDays::Calendar(a), ServiceDays::Calendar(b)) => {
                assert!(std::sync::Arc::ptr_eq(a, b));
                assert!(a.get(3));
                assert_eq!(a.count(), 1);
            }
            other => panic!("expected calendars, got {other:?}"),
        }
    }

    #[test]
    fn inconsistent_times_report_line() {
        let file = write_csv(&[
            "1001,1002,1,L,T1,1,SBB,S,S1,8,0,480,8,10,490,,1",
            "1002,1003,2,L,T1,1,SBB,S,S1,8,10,491,8,20,500,,2",
        ]);
        let result = CsvTimetable::new(file.path(), PlanningHorizon::default())
            .load(&ConnectionFilter::all());
        assert!(matches!(result, Err(TimetableError::InvalidRow { line: 3, .. })));
    }

    #[test]
    fn arrival_before_departure() {
        let file = write_csv(&["1001,1002,1,L,T1,1,SBB,S,S1,8,10,490,8,0,480,,1"]);
        let result = CsvTimetable::new(file.path(), PlanningHorizon::default())
            .load(&ConnectionFilter::all());
        assert!(matches!(result, Err(TimetableError::InvalidRow { line: 2, .. })));
    }

    #[test]
    fn short_service_code() {
        let file = write_csv(&["1001,1002,1,L,T1,1,SBB,S,S1,8,0,480,8,10,490,ff,1"]);
        let result = CsvTimetable::new(file.path(), PlanningHorizon::default())
            .load(&ConnectionFilter::all());
        assert!(matches!(result, Err(TimetableError::Calendar { line: 2, .. })));
    }

    #[test]
    fn missing_file() {
        let source = CsvTimetable::new("/nonexistent/timetable.csv", PlanningHorizon::default());
        assert!(matches!(
            source.load(&ConnectionFilter::all()),
            Err(TimetableError::Io { .. })
        ));
    }
}
