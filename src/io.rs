use crate::error::ConvertError;
use geojson::FeatureCollection;
use serde_json::Value;
use std::fmt::Display;
use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Export filenames the upstream takeout flows are known to produce.
const INPUT_CANDIDATES: [&str; 3] = ["Timeline.json", "location-history.json", "Records.json"];

/// Locate the timeline export inside the data directory: well-known export
/// names first, then the lexicographically first .json file found.
pub fn find_input(data_dir: &Path) -> Option<PathBuf> {
    for candidate in INPUT_CANDIDATES {
        let path = data_dir.join(candidate);
        if path.exists() {
            return Some(path);
        }
    }

    let mut json_files: Vec<PathBuf> = WalkDir::new(data_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry.path().extension().map_or(false, |ext| ext == "json")
        })
        .map(|entry| entry.into_path())
        .collect();

    json_files.sort();
    json_files.into_iter().next()
}

/// Read and JSON-parse the whole export. The document is small enough for
/// personal exports to live in memory in full.
pub fn read_timeline(path: &Path) -> Result<Value, ConvertError> {
    if !path.exists() {
        return Err(ConvertError::InputNotFound(path.to_path_buf()));
    }

    let file = File::open(path)?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| ConvertError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_geojson(collection: &FeatureCollection, path: &Path) -> Result<(), ConvertError> {
    let json = serde_json::to_string_pretty(collection).map_err(|e| output_write_error(path, e))?;
    fs::write(path, json).map_err(|e| output_write_error(path, e))
}

pub fn write_kml(kml: &str, path: &Path) -> Result<(), ConvertError> {
    fs::write(path, kml).map_err(|e| output_write_error(path, e))
}

/// Package the KML text as a zip archive holding a single
/// deflate-compressed `doc.kml` entry.
pub fn write_kmz(kml: &str, path: &Path) -> Result<(), ConvertError> {
    let file = File::create(path).map_err(|e| output_write_error(path, e))?;
    let mut archive = ZipWriter::new(file);

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    archive
        .start_file("doc.kml", options)
        .map_err(|e| output_write_error(path, e))?;
    archive
        .write_all(kml.as_bytes())
        .map_err(|e| output_write_error(path, e))?;
    archive.finish().map_err(|e| output_write_error(path, e))?;

    Ok(())
}

fn output_write_error<E: Display>(path: &Path, error: E) -> ConvertError {
    ConvertError::OutputWrite {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}
