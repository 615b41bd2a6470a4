use super::{SchemaParser, resolve_visit_name, string_field};
use crate::coords::parse_geo_string;
use crate::model::{Activity, TimelineModel, Visit};
use serde_json::Value;

/// Parses the iOS export: a top-level array of records, each carrying
/// `startTime`/`endTime` plus either a `visit` or an `activity` object,
/// with coordinates encoded as "geo:lat,lng" strings.
pub struct IosParser;

impl SchemaParser for IosParser {
    fn parse(&self, root: &Value) -> TimelineModel {
        let mut model = TimelineModel::default();

        let Some(records) = root.as_array() else {
            return model;
        };

        for record in records {
            // Records without a time interval carry no usable entity
            let Some(item) = record.as_object() else {
                continue;
            };
            if !item.contains_key("startTime") || !item.contains_key("endTime") {
                continue;
            }

            let start_time = string_field(record, "startTime");
            let end_time = string_field(record, "endTime");

            if let Some(visit) = record.get("visit") {
                if let Some(visit) = parse_visit(visit, start_time.clone(), end_time.clone()) {
                    model.visits.push(visit);
                }
            } else if let Some(activity) = record.get("activity") {
                if let Some(activity) = parse_activity(activity, start_time, end_time) {
                    model.activities.push(activity);
                }
            }
        }

        model
    }

    fn name(&self) -> &'static str {
        "iOS Timeline Parser"
    }
}

fn parse_visit(
    visit: &Value,
    start_time: Option<String>,
    end_time: Option<String>,
) -> Option<Visit> {
    let candidate = &visit["topCandidate"];
    let location = candidate
        .get("placeLocation")
        .and_then(Value::as_str)
        .and_then(parse_geo_string)?;

    let semantic_type = string_field(candidate, "semanticType");
    let name = resolve_visit_name(
        candidate.get("name").and_then(Value::as_str),
        semantic_type.as_deref(),
    );

    Some(Visit {
        name,
        location,
        start_time,
        end_time,
        place_id: string_field(candidate, "placeID"),
        semantic_type,
    })
}

fn parse_activity(
    activity: &Value,
    start_time: Option<String>,
    end_time: Option<String>,
) -> Option<Activity> {
    let candidate = &activity["topCandidate"];

    let start = activity
        .get("start")
        .and_then(Value::as_str)
        .and_then(parse_geo_string);
    let end = activity
        .get("end")
        .and_then(Value::as_str)
        .and_then(parse_geo_string);

    let mut path = Vec::new();
    if let Some(start) = start {
        path.push(start);
    }
    if let Some(end) = end {
        // a segment that never moved collapses to a single point
        if Some(end) != start {
            path.push(end);
        }
    }

    if path.is_empty() {
        return None;
    }

    Some(Activity {
        activity_type: string_field(candidate, "type").unwrap_or_else(|| "UNKNOWN".to_string()),
        start_time,
        end_time,
        distance_meters: activity
            .get("distanceMeters")
            .and_then(Value::as_f64)
            .unwrap_or(0.0),
        path,
    })
}
