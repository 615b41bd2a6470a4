use super::{SchemaParser, resolve_visit_name, string_field};
use crate::coords::{parse_e7_location, parse_waypoint};
use crate::model::{Activity, TimelineModel, Visit};
use geo::Point;
use serde_json::Value;

/// Ordered path sources for an activity segment; the first one holding a
/// non-empty point list wins.
const PATH_SOURCES: [(&str, &str); 3] = [
    ("waypointPath", "waypoints"),
    ("simplifiedRawPath", "points"),
    ("timelinePath", "points"),
];

/// Parses the standard export: `{"timelineObjects": [...]}` records with
/// E7 fixed-point coordinates (`latitudeE7` = latitude × 1e7).
pub struct StandardParser;

impl SchemaParser for StandardParser {
    fn parse(&self, root: &Value) -> TimelineModel {
        let mut model = TimelineModel::default();

        let Some(records) = root.get("timelineObjects").and_then(Value::as_array) else {
            return model;
        };

        for record in records {
            if let Some(place_visit) = record.get("placeVisit") {
                if let Some(visit) = parse_visit(place_visit) {
                    model.visits.push(visit);
                }
            } else if let Some(segment) = record.get("activitySegment") {
                if let Some(activity) = parse_activity(segment) {
                    model.activities.push(activity);
                }
            }
        }

        model
    }

    fn name(&self) -> &'static str {
        "Standard Timeline Parser"
    }
}

fn parse_visit(place_visit: &Value) -> Option<Visit> {
    let location = &place_visit["location"];
    let duration = &place_visit["duration"];

    let point = parse_e7_location(location)?;

    let semantic_type = string_field(location, "semanticType");
    let name = resolve_visit_name(
        location.get("name").and_then(Value::as_str),
        semantic_type.as_deref(),
    );

    Some(Visit {
        name,
        location: point,
        start_time: string_field(duration, "startTimestamp"),
        end_time: string_field(duration, "endTimestamp"),
        place_id: string_field(location, "placeId"),
        semantic_type,
    })
}

fn parse_activity(segment: &Value) -> Option<Activity> {
    let duration = &segment["duration"];

    let mut path = raw_path_points(segment);

    // Fall back to the segment's own endpoints when the recorded path is
    // too sparse to draw a line
    if path.len() < 2 {
        let start = parse_e7_location(&segment["startLocation"]);
        let end = parse_e7_location(&segment["endLocation"]);

        if let Some(start) = start {
            path = vec![start];
        }
        if let Some(end) = end {
            path.push(end);
        }
    }

    if path.is_empty() {
        return None;
    }

    Some(Activity {
        activity_type: resolve_activity_type(segment),
        start_time: string_field(duration, "startTimestamp"),
        end_time: string_field(duration, "endTimestamp"),
        distance_meters: segment
            .get("distance")
            .and_then(Value::as_f64)
            .unwrap_or(0.0),
        path,
    })
}

fn raw_path_points(segment: &Value) -> Vec<Point<f64>> {
    for (container, list) in PATH_SOURCES {
        let points = segment
            .get(container)
            .and_then(|c| c.get(list))
            .and_then(Value::as_array);
        match points {
            Some(points) if !points.is_empty() => {
                return points.iter().filter_map(parse_waypoint).collect();
            }
            _ => {}
        }
    }
    Vec::new()
}

/// Prefer the segment's own activity type, then the type of its most
/// probable candidate activity, then "UNKNOWN".
fn resolve_activity_type(segment: &Value) -> String {
    segment
        .get("activityType")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .or_else(|| {
            segment
                .get("activities")
                .and_then(Value::as_array)
                .and_then(|activities| activities.first())
                .and_then(|first| first.get("activityType"))
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
        })
        .unwrap_or("UNKNOWN")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(root: Value) -> TimelineModel {
        StandardParser.parse(&root)
    }

    #[test]
    fn parses_visit_from_e7_coordinates() {
        let root = json!({"timelineObjects": [{
            "placeVisit": {
                "location": {
                    "latitudeE7": 10000000,
                    "longitudeE7": 20000000,
                    "name": "Cafe",
                    "placeId": "xyz"
                },
                "duration": {
                    "startTimestamp": "2024-01-15T08:00:00Z",
                    "endTimestamp": "2024-01-15T09:00:00Z"
                }
            }
        }]});

        let model = parse(root);
        assert_eq!(model.visits.len(), 1);

        let visit = &model.visits[0];
        assert_eq!(visit.name, "Cafe");
        assert_eq!(visit.location.y(), 1.0);
        assert_eq!(visit.location.x(), 2.0);
        assert_eq!(visit.place_id.as_deref(), Some("xyz"));
        assert_eq!(visit.end_time.as_deref(), Some("2024-01-15T09:00:00Z"));
    }

    #[test]
    fn home_semantic_type_overrides_name() {
        let root = json!({"timelineObjects": [{
            "placeVisit": {
                "location": {
                    "latitudeE7": 10000000,
                    "longitudeE7": 20000000,
                    "name": "10 Downing St",
                    "semanticType": "TYPE_HOME"
                },
                "duration": {}
            }
        }]});

        let model = parse(root);
        assert_eq!(model.visits[0].name, "Home");
        assert_eq!(model.visits[0].semantic_type.as_deref(), Some("TYPE_HOME"));
    }

    #[test]
    fn visit_with_zero_coordinates_is_dropped() {
        let root = json!({"timelineObjects": [
            {"placeVisit": {"location": {"latitudeE7": 0, "longitudeE7": 20000000}, "duration": {}}},
            {"placeVisit": {"location": {"name": "No coords"}, "duration": {}}}
        ]});

        assert!(parse(root).is_empty());
    }

    #[test]
    fn waypoint_path_is_preferred_over_other_sources() {
        let root = json!({"timelineObjects": [{
            "activitySegment": {
                "activityType": "WALKING",
                "duration": {"startTimestamp": "2024-01-15T09:00:00Z"},
                "waypointPath": {"waypoints": [
                    {"latE7": 10000000, "lngE7": 20000000},
                    {"latE7": 11000000, "lngE7": 21000000}
                ]},
                "simplifiedRawPath": {"points": [
                    {"latE7": 90000000, "lngE7": 90000000}
                ]}
            }
        }]});

        let model = parse(root);
        let activity = &model.activities[0];
        assert_eq!(activity.path.len(), 2);
        assert_eq!(activity.path[0].y(), 1.0);
        assert_eq!(activity.path[1].y(), 1.1);
    }

    #[test]
    fn sparse_path_falls_back_to_segment_endpoints() {
        let root = json!({"timelineObjects": [{
            "activitySegment": {
                "activityType": "IN_BUS",
                "duration": {},
                "startLocation": {"latitudeE7": 10000000, "longitudeE7": 20000000},
                "endLocation": {"latitudeE7": 12000000, "longitudeE7": 22000000}
            }
        }]});

        let model = parse(root);
        let activity = &model.activities[0];
        assert_eq!(activity.path.len(), 2);
        assert_eq!(activity.path[0].y(), 1.0);
        assert_eq!(activity.path[1].y(), 1.2);
        assert_eq!(activity.distance_meters, 0.0);
    }

    #[test]
    fn activity_with_no_recoverable_points_is_dropped() {
        let root = json!({"timelineObjects": [{
            "activitySegment": {"activityType": "WALKING", "duration": {}}
        }]});

        assert!(parse(root).is_empty());
    }

    #[test]
    fn plain_lat_lng_waypoints_are_accepted() {
        let root = json!({"timelineObjects": [{
            "activitySegment": {
                "activityType": "CYCLING",
                "duration": {},
                "timelinePath": {"points": [
                    {"lat": 1.0, "lng": 2.0},
                    {"lat": 1.1, "lng": 2.1}
                ]}
            }
        }]});

        let model = parse(root);
        assert_eq!(model.activities[0].path.len(), 2);
    }

    #[test]
    fn activity_type_resolution_falls_back_through_candidates() {
        let root = json!({"timelineObjects": [
            {"activitySegment": {
                "duration": {},
                "activities": [{"activityType": "RUNNING"}, {"activityType": "WALKING"}],
                "startLocation": {"latitudeE7": 10000000, "longitudeE7": 20000000}
            }},
            {"activitySegment": {
                "duration": {},
                "startLocation": {"latitudeE7": 10000000, "longitudeE7": 20000000}
            }}
        ]});

        let model = parse(root);
        assert_eq!(model.activities[0].activity_type, "RUNNING");
        assert_eq!(model.activities[1].activity_type, "UNKNOWN");
    }

    #[test]
    fn distance_is_read_from_segment() {
        let root = json!({"timelineObjects": [{
            "activitySegment": {
                "activityType": "WALKING",
                "duration": {},
                "distance": 2500.0,
                "startLocation": {"latitudeE7": 10000000, "longitudeE7": 20000000}
            }
        }]});

        let model = parse(root);
        assert_eq!(model.activities[0].distance_meters, 2500.0);
    }
}
