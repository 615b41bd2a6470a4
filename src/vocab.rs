/// Fixed hex color for an activity type token. Total over all inputs;
/// unknown tokens map to neutral gray.
pub fn activity_color(activity_type: &str) -> &'static str {
    match activity_type.to_uppercase().as_str() {
        "DRIVING" | "IN_VEHICLE" | "IN_PASSENGER_VEHICLE" | "DRIVE" => "#4285F4",
        "IN_TAXI" => "#FFEB3B",
        "MOTORCYCLING" => "#1E90FF",
        "CYCLING" | "ON_BICYCLE" | "BICYCLE" | "HIKING" => "#0F9D58",
        "WALKING" | "ON_FOOT" | "WALK" | "RUNNING" => "#DB4437",
        "IN_BUS" => "#9C27B0",
        "IN_SUBWAY" | "IN_TRAIN" | "IN_TRAM" | "IN_FERRY" => "#673AB7",
        "FLYING" => "#03A9F4",
        "BOATING" | "SWIMMING" => "#00BCD4",
        _ => "#9E9E9E",
    }
}

/// Human-readable label for an activity type token. Unknown tokens get
/// underscores replaced by spaces and each word title-cased.
pub fn format_activity_type(activity_type: &str) -> String {
    let label = match activity_type.to_uppercase().as_str() {
        "IN_VEHICLE" | "DRIVE" | "DRIVING" => "Driving",
        "IN_PASSENGER_VEHICLE" => "In Vehicle",
        "IN_TAXI" => "Taxi",
        "MOTORCYCLING" => "Motorcycling",
        "ON_BICYCLE" | "CYCLING" | "BICYCLE" => "Cycling",
        "ON_FOOT" | "WALKING" | "WALK" => "Walking",
        "RUNNING" => "Running",
        "HIKING" => "Hiking",
        "IN_BUS" => "Bus",
        "IN_SUBWAY" => "Subway",
        "IN_TRAIN" => "Train",
        "IN_TRAM" => "Tram",
        "IN_FERRY" => "Ferry",
        "STILL" => "Stationary",
        "FLYING" => "Flying",
        "BOATING" => "Boating",
        "SWIMMING" => "Swimming",
        _ => return title_case(&activity_type.replace('_', " ")),
    };
    label.to_string()
}

fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
