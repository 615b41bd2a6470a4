use super::{SchemaParser, resolve_visit_name, string_field};
use crate::coords::parse_latlng_string;
use crate::model::{Activity, TimelineModel, Visit};
use serde_json::Value;

/// Parses the semantic export: `{"semanticSegments": [...]}` records with
/// degree-annotated coordinate strings like "12.345°, 67.890°".
pub struct SemanticParser;

impl SchemaParser for SemanticParser {
    fn parse(&self, root: &Value) -> TimelineModel {
        let mut model = TimelineModel::default();

        let Some(segments) = root.get("semanticSegments").and_then(Value::as_array) else {
            return model;
        };

        for segment in segments {
            let start_time = string_field(segment, "startTime");
            let end_time = string_field(segment, "endTime");

            if let Some(visit) = segment.get("visit") {
                if let Some(visit) = parse_visit(visit, start_time, end_time) {
                    model.visits.push(visit);
                }
            } else if let Some(activity) = segment.get("activity") {
                if let Some(activity) = parse_activity(segment, activity, start_time, end_time) {
                    model.activities.push(activity);
                }
            }
        }

        model
    }

    fn name(&self) -> &'static str {
        "Semantic Timeline Parser"
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
        .and_then(|l| l.get("latLng"))
        .and_then(Value::as_str)
        .and_then(parse_latlng_string)?;

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
        place_id: string_field(candidate, "placeId"),
        semantic_type,
    })
}

fn parse_activity(
    segment: &Value,
    activity: &Value,
    start_time: Option<String>,
    end_time: Option<String>,
) -> Option<Activity> {
    let candidate = &activity["topCandidate"];

    // The segment-level timelinePath is the primary path source
    let mut path: Vec<_> = segment
        .get("timelinePath")
        .and_then(Value::as_array)
        .map(|points| {
            points
                .iter()
                .filter_map(|pt| pt.get("point").and_then(Value::as_str))
                .filter_map(parse_latlng_string)
                .collect()
        })
        .unwrap_or_default();

    if path.len() < 2 {
        let start = activity
            .get("start")
            .and_then(|l| l.get("latLng"))
            .and_then(Value::as_str)
            .and_then(parse_latlng_string);
        let end = activity
            .get("end")
            .and_then(|l| l.get("latLng"))
            .and_then(Value::as_str)
            .and_then(parse_latlng_string);

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
