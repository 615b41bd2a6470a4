mod coords;
mod encoders;
mod error;
mod io;
mod model;
mod parsers;
mod temporal;
mod vocab;

use error::ConvertError;
use parsers::TimelineFormat;
use std::env;
use std::path::{Path, PathBuf};

pub const DATA_DIR: &str = "data";

pub const GEOJSON_NAME: &str = "Timeline.geojson";
pub const KML_NAME: &str = "Timeline.kml";
pub const KMZ_NAME: &str = "Timeline.kmz";

fn main() {
    if let Err(e) = run() {
        eprintln!("✗ {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), ConvertError> {
    let data_dir = Path::new(DATA_DIR);

    // Optional CLI argument overrides data-directory discovery
    let input = match env::args().nth(1) {
        Some(path) => PathBuf::from(path),
        None => io::find_input(data_dir)
            .ok_or_else(|| ConvertError::InputNotFound(data_dir.join("Timeline.json")))?,
    };

    println!("Reading timeline data from {}...", input.display());
    let root = io::read_timeline(&input)?;

    let format = TimelineFormat::detect(&root)?;
    println!("Format detected: {}", format.label());

    let parser = format.parser();
    let model = parser.parse(&root);
    println!(
        "✓ {} extracted {} visits and {} activities",
        parser.name(),
        model.visits.len(),
        model.activities.len()
    );

    if model.is_empty() {
        println!("No data found to convert.");
        return Ok(());
    }

    // Outputs land next to the input file
    let out_dir = input.parent().unwrap_or(Path::new("."));
    let document_name = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("Timeline");

    println!("\nConverting to all formats...");

    let collection = encoders::geojson::encode(&model);
    let geojson_path = out_dir.join(GEOJSON_NAME);
    io::write_geojson(&collection, &geojson_path)?;
    println!("✓ Saved GeoJSON: {}", geojson_path.display());

    // KML is encoded once; the KMZ packages the same document
    let kml = encoders::kml::encode(&model, document_name)?;
    let kml_path = out_dir.join(KML_NAME);
    io::write_kml(&kml, &kml_path)?;
    println!("✓ Saved KML: {}", kml_path.display());

    let kmz_path = out_dir.join(KMZ_NAME);
    io::write_kmz(&kml, &kmz_path)?;
    println!("✓ Saved KMZ: {}", kmz_path.display());

    println!("\nConversion complete!");
    Ok(())
}
