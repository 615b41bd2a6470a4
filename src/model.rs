use geo::Point;

/// A stay at a place. Only constructed once valid coordinates were
/// recovered from the source record.
#[derive(Debug, Clone, PartialEq)]
pub struct Visit {
    pub name: String,
    /// x = longitude, y = latitude
    pub location: Point<f64>,
    /// Raw source timestamp, never reformatted
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub place_id: Option<String>,
    pub semantic_type: Option<String>,
}

/// A movement segment between places.
#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    /// Raw source token (e.g. "IN_PASSENGER_VEHICLE"); upper-cased only
    /// for vocabulary lookups
    pub activity_type: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub distance_meters: f64,
    /// Temporally ordered, length >= 1
    pub path: Vec<Point<f64>>,
}

/// The normalized output of one schema parser and the sole input to both
/// encoders. Entities keep their source encounter order.
#[derive(Debug, Default)]
pub struct TimelineModel {
    pub visits: Vec<Visit>,
    pub activities: Vec<Activity>,
}

impl TimelineModel {
    pub fn is_empty(&self) -> bool {
        self.visits.is_empty() && self.activities.is_empty()
    }
}
