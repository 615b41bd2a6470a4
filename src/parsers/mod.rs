pub mod ios;
pub mod semantic;
pub mod standard;

use crate::error::ConvertError;
use crate::model::TimelineModel;
use serde_json::Value;

// build a TimelineModel from the different export schemas
pub trait SchemaParser {
    /// Walk the schema's record list and collect visits and activities.
    /// Malformed records are skipped; this never fails.
    fn parse(&self, root: &Value) -> TimelineModel;

    fn name(&self) -> &'static str;
}

/// The three mutually incompatible timeline export schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineFormat {
    Ios,
    Standard,
    Semantic,
}

impl TimelineFormat {
    /// Inspect the parsed JSON root shape and select a schema. Any shape
    /// other than the three known ones is fatal: no partial conversion is
    /// attempted.
    pub fn detect(root: &Value) -> Result<TimelineFormat, ConvertError> {
        if root.is_array() {
            return Ok(TimelineFormat::Ios);
        }
        match root.as_object() {
            Some(map) if map.contains_key("timelineObjects") => Ok(TimelineFormat::Standard),
            Some(map) if map.contains_key("semanticSegments") => Ok(TimelineFormat::Semantic),
            _ => Err(ConvertError::UnrecognizedFormat),
        }
    }

    pub fn parser(&self) -> Box<dyn SchemaParser> {
        match self {
            TimelineFormat::Ios => Box::new(ios::IosParser),
            TimelineFormat::Standard => Box::new(standard::StandardParser),
            TimelineFormat::Semantic => Box::new(semantic::SemanticParser),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimelineFormat::Ios => "ios",
            TimelineFormat::Standard => "standard",
            TimelineFormat::Semantic => "semantic",
        }
    }
}

/// Resolve a visit's display name: home/work semantic types override the
/// place name, anything unnamed becomes "Unknown Location".
pub(crate) fn resolve_visit_name(name: Option<&str>, semantic_type: Option<&str>) -> String {
    match semantic_type {
        Some("TYPE_HOME") | Some("Home") => "Home".to_string(),
        Some("TYPE_WORK") | Some("Work") => "Work".to_string(),
        _ => name.unwrap_or("Unknown Location").to_string(),
    }
}

/// Owned copy of an optional string field on a JSON object.
pub(crate) fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}
