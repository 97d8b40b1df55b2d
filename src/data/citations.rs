//! Citations dataset loader (CSV).

use {
    crate::{
        config::PERSISTENCE,
        domain::{Event, LatLon},
    },
    chrono::{DateTime, NaiveDate, NaiveDateTime},
    std::{fs::File, io::Read, path::Path},
};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
];

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("cannot open dataset {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("column '{0}' not found in dataset header")]
    MissingColumn(&'static str),

    #[error("row {row}: unparsable timestamp '{value}'")]
    BadTimestamp { row: usize, value: String },

    #[error("row {row}: unparsable coordinate '{value}'")]
    BadCoordinate { row: usize, value: String },
}

/// Events that survived loading, plus how many rows were dropped for a missing coordinate.
#[derive(Debug, Clone, Default)]
pub struct CitationSet {
    pub events: Vec<Event>,
    pub dropped_missing_coords: usize,
}

pub fn load_citations(path: &Path) -> Result<CitationSet, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::Open {
        path: path.display().to_string(),
        source,
    })?;
    let set = read_citations(file)?;

    log::info!(
        "Loaded {} citations from {} ({} dropped: missing coordinates)",
        set.events.len(),
        path.display(),
        set.dropped_missing_coords
    );
    Ok(set)
}

/// Reads citations from any CSV source. Extra columns are ignored.
pub fn read_citations<R: Read>(source: R) -> Result<CitationSet, DatasetError> {
    let cols = &PERSISTENCE.dataset;
    let mut reader = csv::Reader::from_reader(source);

    let headers = reader.headers()?.clone();
    let find = |name: &'static str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or(DatasetError::MissingColumn(name))
    };
    let ts_idx = find(cols.timestamp_column)?;
    let lat_idx = find(cols.latitude_column)?;
    let lon_idx = find(cols.longitude_column)?;

    let mut set = CitationSet::default();

    for (i, record) in reader.records().enumerate() {
        let record = record?;
        // 1-based, header is row 1
        let row = i + 2;
        let field = |idx: usize| record.get(idx).unwrap_or_default();

        let lat = parse_coordinate(field(lat_idx), row)?;
        let lon = parse_coordinate(field(lon_idx), row)?;
        let position = match (lat, lon) {
            (Some(lat), Some(lon)) => LatLon::new(lat, lon),
            _ => {
                log::debug!("Row {} has no usable coordinates, skipped", row);
                set.dropped_missing_coords += 1;
                continue;
            }
        };

        let issued_at = parse_timestamp(field(ts_idx), row)?;
        set.events.push(Event::new(issued_at, position));
    }

    Ok(set)
}

// Empty / NaN / infinite count as missing. Anything else that fails to parse is an error.
fn parse_coordinate(raw: &str, row: usize) -> Result<Option<f64>, DatasetError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let value: f64 = raw.parse().map_err(|_| DatasetError::BadCoordinate {
        row,
        value: raw.to_string(),
    })?;
    Ok(value.is_finite().then_some(value))
}

/// Parses the timestamp formats seen in open-data exports. Offsets are dropped after
/// converting to the wall time of that offset.
pub(crate) fn parse_timestamp(
    raw: &str,
    row: usize,
) -> Result<Option<NaiveDateTime>, DatasetError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(dt.naive_local()));
    }
    if let Some(dt) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Ok(Some(dt));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_hms_opt(0, 0, 0));
    }

    Err(DatasetError::BadTimestamp {
        row,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn drops_rows_without_coordinates() {
        let csv = "\
citation_number,issue_datetime,latitude,longitude
1,2024-03-04 08:15:00,37.77,-122.45
2,2024-03-04 09:00:00,,-122.45
3,2024-03-04 10:00:00,NaN,NaN
4,2024-03-04T11:30:00,37.78,-122.44
";
        let set = read_citations(csv.as_bytes()).unwrap();
        assert_eq!(set.events.len(), 2);
        assert_eq!(set.dropped_missing_coords, 2);
        assert_eq!(set.events[1].position, LatLon::new(37.78, -122.44));
        assert_eq!(set.events[1].issued_at.unwrap().hour(), 11);
    }

    #[test]
    fn missing_timestamp_keeps_the_event() {
        let csv = "issue_datetime,latitude,longitude\n,37.77,-122.45\n";
        let set = read_citations(csv.as_bytes()).unwrap();
        assert_eq!(set.events.len(), 1);
        assert!(set.events[0].issued_at.is_none());
    }

    #[test]
    fn garbage_timestamp_is_fatal() {
        let csv = "issue_datetime,latitude,longitude\nyesterday,37.77,-122.45\n";
        let err = read_citations(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DatasetError::BadTimestamp { row: 2, .. }));
    }

    #[test]
    fn missing_column_is_reported() {
        let csv = "issue_datetime,lat,lon\n2024-01-01,1,2\n";
        let err = read_citations(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn("latitude")));
    }

    #[test]
    fn rfc3339_keeps_local_wall_time() {
        let dt = parse_timestamp("2024-03-04T20:05:00-08:00", 2).unwrap().unwrap();
        assert_eq!(dt.hour(), 20);
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let err = load_citations(Path::new("definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, DatasetError::Open { .. }));
    }
}
