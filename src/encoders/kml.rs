use crate::error::ConvertError;
use crate::model::{Activity, TimelineModel, Visit};
use crate::temporal;
use crate::vocab::{activity_color, format_activity_type};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;

const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";
const VISIT_ICON_HREF: &str = "http://maps.google.com/mapfiles/kml/pushpin/red-pushpin.png";

type XmlWriter = Writer<Vec<u8>>;

/// Entities for one calendar date; dates sort ascending in the document
/// ("Unknown" lands after all ISO dates).
#[derive(Default)]
struct DateGroup<'a> {
    visits: Vec<&'a Visit>,
    activities: Vec<&'a Activity>,
}

/// Map the model to a KML 2.2 document string, pretty-printed with 2-space
/// indentation. Visits and activities are grouped into one folder per
/// derived date.
pub fn encode(model: &TimelineModel, name: &str) -> Result<String, ConvertError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(encode_error)?;

    let mut kml = BytesStart::new("kml");
    kml.push_attribute(("xmlns", KML_NAMESPACE));
    writer.write_event(Event::Start(kml)).map_err(encode_error)?;

    start(&mut writer, "Document")?;
    text_element(&mut writer, "name", &format!("Timeline Export - {name}"))?;

    write_activity_styles(&mut writer, model)?;
    write_visit_style(&mut writer)?;

    for (date, group) in group_by_date(model) {
        start(&mut writer, "Folder")?;
        text_element(&mut writer, "name", &date)?;

        if !group.visits.is_empty() {
            start(&mut writer, "Folder")?;
            text_element(&mut writer, "name", "Places Visited")?;
            for visit in &group.visits {
                write_visit_placemark(&mut writer, visit, &date)?;
            }
            end(&mut writer, "Folder")?;
        }

        if !group.activities.is_empty() {
            start(&mut writer, "Folder")?;
            text_element(&mut writer, "name", "Activities")?;
            for activity in &group.activities {
                write_activity_placemark(&mut writer, activity, &date)?;
            }
            end(&mut writer, "Folder")?;
        }

        end(&mut writer, "Folder")?;
    }

    end(&mut writer, "Document")?;
    end(&mut writer, "kml")?;

    String::from_utf8(writer.into_inner()).map_err(encode_error)
}

/// One line style per distinct activity type, in sorted token order so
/// re-encoding the same model is byte-identical.
fn write_activity_styles(writer: &mut XmlWriter, model: &TimelineModel) -> Result<(), ConvertError> {
    let types: BTreeSet<&str> = model
        .activities
        .iter()
        .map(|a| a.activity_type.as_str())
        .collect();

    for activity_type in types {
        let mut style = BytesStart::new("Style");
        style.push_attribute(("id", activity_type));
        writer
            .write_event(Event::Start(style))
            .map_err(encode_error)?;

        start(writer, "LineStyle")?;
        text_element(writer, "color", &kml_color(activity_color(activity_type)))?;
        text_element(writer, "width", "4")?;
        end(writer, "LineStyle")?;

        end(writer, "Style")?;
    }

    Ok(())
}

fn write_visit_style(writer: &mut XmlWriter) -> Result<(), ConvertError> {
    let mut style = BytesStart::new("Style");
    style.push_attribute(("id", "visitStyle"));
    writer
        .write_event(Event::Start(style))
        .map_err(encode_error)?;

    start(writer, "IconStyle")?;
    text_element(writer, "scale", "1.1")?;
    start(writer, "Icon")?;
    text_element(writer, "href", VISIT_ICON_HREF)?;
    end(writer, "Icon")?;
    end(writer, "IconStyle")?;

    end(writer, "Style")
}

fn write_visit_placemark(
    writer: &mut XmlWriter,
    visit: &Visit,
    date: &str,
) -> Result<(), ConvertError> {
    start(writer, "Placemark")?;
    text_element(writer, "name", &visit.name)?;

    let mut lines = vec![format!("Date: {date}")];
    if let Some(arrived) = &visit.start_time {
        lines.push(format!("Arrived: {arrived}"));
    }
    if let Some(departed) = &visit.end_time {
        lines.push(format!("Departed: {departed}"));
    }
    text_element(writer, "description", &lines.join("\n"))?;

    write_time_span(writer, visit.start_time.as_deref(), visit.end_time.as_deref())?;
    text_element(writer, "styleUrl", "#visitStyle")?;

    start(writer, "Point")?;
    text_element(
        writer,
        "coordinates",
        &format!("{},{},0", visit.location.x(), visit.location.y()),
    )?;
    end(writer, "Point")?;

    end(writer, "Placemark")
}

fn write_activity_placemark(
    writer: &mut XmlWriter,
    activity: &Activity,
    date: &str,
) -> Result<(), ConvertError> {
    // single-point segments have no line to draw
    if activity.path.len() < 2 {
        return Ok(());
    }

    start(writer, "Placemark")?;
    text_element(writer, "name", &format_activity_type(&activity.activity_type))?;

    let mut lines = vec![format!("Date: {date}")];
    if activity.distance_meters != 0.0 {
        lines.push(format!("Distance: {:.1} km", activity.distance_meters / 1000.0));
    }
    if let Some(started) = &activity.start_time {
        lines.push(format!("Start: {started}"));
    }
    if let Some(ended) = &activity.end_time {
        lines.push(format!("End: {ended}"));
    }
    text_element(writer, "description", &lines.join("\n"))?;

    write_time_span(
        writer,
        activity.start_time.as_deref(),
        activity.end_time.as_deref(),
    )?;
    text_element(writer, "styleUrl", &format!("#{}", activity.activity_type))?;

    start(writer, "LineString")?;
    text_element(writer, "tessellate", "1")?;
    let coordinates: Vec<String> = activity
        .path
        .iter()
        .map(|p| format!("{},{},0", p.x(), p.y()))
        .collect();
    text_element(writer, "coordinates", &coordinates.join("\n"))?;
    end(writer, "LineString")?;

    end(writer, "Placemark")
}

/// TimeSpan is emitted only when both instants are known; Google Earth's
/// time slider misbehaves on half-open spans.
fn write_time_span(
    writer: &mut XmlWriter,
    begin: Option<&str>,
    end_time: Option<&str>,
) -> Result<(), ConvertError> {
    let (Some(begin), Some(end_time)) = (begin, end_time) else {
        return Ok(());
    };

    start(writer, "TimeSpan")?;
    text_element(writer, "begin", begin)?;
    text_element(writer, "end", end_time)?;
    end(writer, "TimeSpan")
}

fn group_by_date(model: &TimelineModel) -> BTreeMap<String, DateGroup<'_>> {
    let mut groups: BTreeMap<String, DateGroup> = BTreeMap::new();

    for visit in &model.visits {
        groups
            .entry(date_key(visit.start_time.as_deref()))
            .or_default()
            .visits
            .push(visit);
    }
    for activity in &model.activities {
        groups
            .entry(date_key(activity.start_time.as_deref()))
            .or_default()
            .activities
            .push(activity);
    }

    groups
}

fn date_key(start_time: Option<&str>) -> String {
    start_time
        .and_then(temporal::extract_date)
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Convert "#rrggbb" to KML's aabbggrr ordering with fixed alpha `cc`,
/// preserving the case of the hex digits.
fn kml_color(hex: &str) -> String {
    let hex = hex.trim_start_matches('#');
    format!("cc{}{}{}", &hex[4..6], &hex[2..4], &hex[0..2])
}

fn start(writer: &mut XmlWriter, tag: &str) -> Result<(), ConvertError> {
    writer
        .write_event(Event::Start(BytesStart::new(tag)))
        .map_err(encode_error)
}

fn end(writer: &mut XmlWriter, tag: &str) -> Result<(), ConvertError> {
    writer
        .write_event(Event::End(BytesEnd::new(tag)))
        .map_err(encode_error)
}

fn text_element(writer: &mut XmlWriter, tag: &str, text: &str) -> Result<(), ConvertError> {
    start(writer, tag)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(encode_error)?;
    end(writer, tag)
}

fn encode_error<E: Display>(error: E) -> ConvertError {
    ConvertError::KmlEncode(error.to_string())
}
