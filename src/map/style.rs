use geojson::{JsonObject, JsonValue};
use serde::Serialize;

pub const LIVABILITY_SCORE_KEY: &str = "livability_score";

/// Color of the lowest bucket. Features without a usable score land here too.
pub const LOWEST_BUCKET_COLOR: &str = "#FF0000";

/// Lower bounds (exclusive) of each bucket, from best to worst.
const LIVABILITY_BUCKETS: [(f64, &str); 6] = [
    (60.0, "#006400"),
    (50.0, "#228B22"),
    (40.0, "#FFFF00"),
    (30.0, "#FFA500"),
    (20.0, "#FF7F00"),
    (10.0, "#FF7000"),
];

pub fn livability_color(score: f64) -> &'static str {
    LIVABILITY_BUCKETS
        .iter()
        .find(|(threshold, _)| score > *threshold)
        .map(|(_, color)| *color)
        .unwrap_or(LOWEST_BUCKET_COLOR)
}

/// Read the score from a feature's properties.
///
/// Numbers are taken as is and numeric strings are parsed. Anything else,
/// including NaN, counts as no score.
pub fn livability_score(properties: Option<&JsonObject>) -> Option<f64> {
    let score = match properties?.get(LIVABILITY_SCORE_KEY)? {
        JsonValue::Number(number) => number.as_f64(),
        JsonValue::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    (!score.is_nan()).then_some(score)
}

/// Leaflet path options for a single feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureStyle {
    pub fill_color: &'static str,
    pub weight: u32,
    pub opacity: f64,
    pub color: &'static str,
    pub dash_array: &'static str,
    pub fill_opacity: f64,
}

impl FeatureStyle {
    pub fn for_score(score: Option<f64>) -> Self {
        Self {
            fill_color: score.map_or(LOWEST_BUCKET_COLOR, livability_color),
            weight: 2,
            opacity: 1.0,
            color: "white",
            dash_array: "3",
            fill_opacity: 0.7,
        }
    }
}

pub fn style_feature(feature: &geojson::Feature) -> FeatureStyle {
    FeatureStyle::for_score(livability_score(feature.properties.as_ref()))
}
