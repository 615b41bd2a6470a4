use crate::model::{Activity, TimelineModel, Visit};
use crate::temporal::DerivedDate;
use crate::vocab::{activity_color, format_activity_type};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value as GeometryValue};
use serde::Serialize;

#[derive(Serialize)]
struct VisitProperties<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    entity: &'static str,
    #[serde(flatten)]
    derived: DerivedDate,
    start_time: Option<&'a str>,
    end_time: Option<&'a str>,
    place_id: Option<&'a str>,
    semantic_type: Option<&'a str>,
    #[serde(rename = "marker-color")]
    marker_color: &'static str,
    #[serde(rename = "marker-symbol")]
    marker_symbol: &'static str,
}

#[derive(Serialize)]
struct ActivityProperties<'a> {
    name: String,
    #[serde(rename = "type")]
    entity: &'static str,
    activity_type: &'a str,
    #[serde(flatten)]
    derived: DerivedDate,
    start_time: Option<&'a str>,
    end_time: Option<&'a str>,
    distance_meters: f64,
    stroke: &'static str,
    #[serde(rename = "stroke-width")]
    stroke_width: u32,
    #[serde(rename = "stroke-opacity")]
    stroke_opacity: f64,
}

/// Map the model to a GeoJSON FeatureCollection: all visits first in
/// source order, then all activities in source order.
pub fn encode(model: &TimelineModel) -> FeatureCollection {
    let mut features = Vec::with_capacity(model.visits.len() + model.activities.len());
    features.extend(model.visits.iter().map(visit_feature));
    features.extend(model.activities.iter().map(activity_feature));

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn visit_feature(visit: &Visit) -> Feature {
    let properties = VisitProperties {
        name: &visit.name,
        entity: "visit",
        derived: DerivedDate::from_timestamp(visit.start_time.as_deref()),
        start_time: visit.start_time.as_deref(),
        end_time: visit.end_time.as_deref(),
        place_id: visit.place_id.as_deref(),
        semantic_type: visit.semantic_type.as_deref(),
        marker_color: "#FF0000",
        marker_symbol: "marker",
    };

    // GeoJSON positions are [lng, lat]
    let geometry = GeometryValue::Point(vec![visit.location.x(), visit.location.y()]);

    feature(geometry, &properties)
}

fn activity_feature(activity: &Activity) -> Feature {
    let properties = ActivityProperties {
        name: format_activity_type(&activity.activity_type),
        entity: "activity",
        activity_type: &activity.activity_type,
        derived: DerivedDate::from_timestamp(activity.start_time.as_deref()),
        start_time: activity.start_time.as_deref(),
        end_time: activity.end_time.as_deref(),
        distance_meters: activity.distance_meters,
        stroke: activity_color(&activity.activity_type),
        stroke_width: 4,
        stroke_opacity: 0.8,
    };

    // A path too short to draw becomes a point
    let geometry = if activity.path.len() >= 2 {
        GeometryValue::LineString(activity.path.iter().map(|p| vec![p.x(), p.y()]).collect())
    } else {
        GeometryValue::Point(vec![activity.path[0].x(), activity.path[0].y()])
    };

    feature(geometry, &properties)
}

fn feature<T: Serialize>(geometry: GeometryValue, properties: &T) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(geometry)),
        id: None,
        properties: property_map(properties),
        foreign_members: None,
    }
}

fn property_map<T: Serialize>(properties: &T) -> Option<JsonObject> {
    match serde_json::to_value(properties) {
        Ok(serde_json::Value::Object(map)) => Some(map),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Point;
    use serde_json::{Value, json};

    fn sample_visit() -> Visit {
        Visit {
            name: "Cafe".to_string(),
            location: Point::new(2.0, 1.0),
            start_time: Some("2024-01-15T08:00:00Z".to_string()),
            end_time: Some("2024-01-15T09:00:00Z".to_string()),
            place_id: Some("abc".to_string()),
            semantic_type: None,
        }
    }

    fn sample_activity(points: usize) -> Activity {
        Activity {
            activity_type: "WALKING".to_string(),
            start_time: Some("2024-01-15T09:00:00Z".to_string()),
            end_time: Some("2024-01-15T09:30:00Z".to_string()),
            distance_meters: 1200.0,
            path: (0..points)
                .map(|i| Point::new(2.0 + i as f64 * 0.1, 1.0 + i as f64 * 0.1))
                .collect(),
        }
    }

    #[test]
    fn feature_count_matches_model_and_visits_come_first() {
        let model = TimelineModel {
            visits: vec![sample_visit(), sample_visit()],
            activities: vec![sample_activity(2)],
        };

        let collection = encode(&model);
        assert_eq!(collection.features.len(), 3);

        let kinds: Vec<&Value> = collection
            .features
            .iter()
            .map(|f| &f.properties.as_ref().unwrap()["type"])
            .collect();
        assert_eq!(kinds, [&json!("visit"), &json!("visit"), &json!("activity")]);
    }

    #[test]
    fn visit_becomes_point_with_lng_lat_order_and_styling() {
        let model = TimelineModel {
            visits: vec![sample_visit()],
            activities: vec![],
        };

        let feature = &encode(&model).features[0];
        match &feature.geometry.as_ref().unwrap().value {
            GeometryValue::Point(coords) => assert_eq!(coords, &vec![2.0, 1.0]),
            other => panic!("expected Point, got {other:?}"),
        }

        let props = feature.properties.as_ref().unwrap();
        assert_eq!(props["name"], json!("Cafe"));
        assert_eq!(props["marker-color"], json!("#FF0000"));
        assert_eq!(props["marker-symbol"], json!("marker"));
        assert_eq!(props["date"], json!("2024-01-15"));
        assert_eq!(props["weekday"], json!("Monday"));
        assert_eq!(props["year"], json!(2024));
        // absent optionals serialize as null, not missing keys
        assert_eq!(props["semantic_type"], Value::Null);
    }

    #[test]
    fn walking_activity_gets_red_stroke_and_label() {
        let model = TimelineModel {
            visits: vec![],
            activities: vec![sample_activity(2)],
        };

        let feature = &encode(&model).features[0];
        assert!(matches!(
            &feature.geometry.as_ref().unwrap().value,
            GeometryValue::LineString(coords) if coords.len() == 2
        ));

        let props = feature.properties.as_ref().unwrap();
        assert_eq!(props["name"], json!("Walking"));
        assert_eq!(props["activity_type"], json!("WALKING"));
        assert_eq!(props["stroke"], json!("#DB4437"));
        assert_eq!(props["stroke-width"], json!(4));
        assert_eq!(props["stroke-opacity"], json!(0.8));
        assert_eq!(props["distance_meters"], json!(1200.0));
    }

    #[test]
    fn single_point_activity_becomes_point_feature() {
        let model = TimelineModel {
            visits: vec![],
            activities: vec![sample_activity(1)],
        };

        let feature = &encode(&model).features[0];
        assert!(matches!(
            &feature.geometry.as_ref().unwrap().value,
            GeometryValue::Point(_)
        ));
    }

    #[test]
    fn encoding_is_deterministic() {
        let model = TimelineModel {
            visits: vec![sample_visit()],
            activities: vec![sample_activity(3)],
        };

        let first = serde_json::to_string_pretty(&encode(&model)).unwrap();
        let second = serde_json::to_string_pretty(&encode(&model)).unwrap();
        assert_eq!(first, second);
    }
}
