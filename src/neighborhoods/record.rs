use geojson::{Feature, FeatureCollection, JsonObject, JsonValue};
use rayon::prelude::*;

use super::error::LoadError;

/// A single neighborhood as returned by the API: an open-ended, ordered
/// mapping of attribute names to JSON values. The `geometry` attribute holds
/// a GeoJSON geometry, everything else is passed through as a property.
pub type NeighborhoodRecord = JsonObject;

pub const GEOMETRY_KEY: &str = "geometry";

pub fn parse_records(body: &str) -> Result<Vec<NeighborhoodRecord>, LoadError> {
    Ok(serde_json::from_str(body)?)
}

/// Split a record into its geometry and the remaining properties.
///
/// A missing or `null` geometry yields a feature without geometry. Property order
/// follows the record.
pub fn record_to_feature(index: usize, record: NeighborhoodRecord) -> Result<Feature, LoadError> {
    let mut geometry_value = JsonValue::Null;
    let mut properties = JsonObject::new();
    for (key, value) in record {
        if key == GEOMETRY_KEY {
            geometry_value = value;
        } else {
            properties.insert(key, value);
        }
    }

    let geometry = match geometry_value {
        JsonValue::Null => None,
        value => Some(
            serde_json::from_value::<geojson::Geometry>(value)
                .map_err(|source| LoadError::InvalidGeometry { index, source })?,
        ),
    };

    Ok(Feature {
        bbox: None,
        geometry,
        id: None,
        properties: Some(properties),
        foreign_members: None,
    })
}

pub fn records_to_feature_collection(
    records: Vec<NeighborhoodRecord>,
) -> Result<FeatureCollection, LoadError> {
    let features = records
        .into_par_iter()
        .enumerate()
        .map(|(index, record)| record_to_feature(index, record))
        .collect::<Result<Vec<Feature>, LoadError>>()?;
    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn record(value: JsonValue) -> NeighborhoodRecord {
        match value {
            JsonValue::Object(map) => map,
            other => panic!("expected an object, got {}", other),
        }
    }

    fn square(x: f64, y: f64) -> JsonValue {
        json!({
            "type": "Polygon",
            "coordinates": [[[x, y], [x + 1.0, y], [x + 1.0, y + 1.0], [x, y + 1.0], [x, y]]]
        })
    }

    #[rstest]
    fn test_reshape_keeps_length_order_and_properties() {
        let records = vec![
            record(json!({"name": "Mission", "livability_score": 72.5, "geometry": square(0.0, 0.0), "tags": ["a"]})),
            record(json!({"geometry": square(2.0, 2.0), "name": "Sunset", "livability_score": null})),
            record(json!({"name": "Richmond", "livability_score": 41, "extra": {"nested": true}, "geometry": square(4.0, 4.0)})),
        ];

        let collection = records_to_feature_collection(records.clone()).unwrap();

        assert_eq!(collection.features.len(), records.len());
        for (feature, source) in collection.features.iter().zip(records.iter()) {
            let expected: JsonObject = source
                .iter()
                .filter(|(key, _)| key.as_str() != GEOMETRY_KEY)
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            let expected_geometry = source.get(GEOMETRY_KEY).cloned().unwrap();
            let properties = feature.properties.as_ref().unwrap();
            assert_eq!(properties, &expected);
            assert!(!properties.contains_key(GEOMETRY_KEY));
            assert_eq!(
                serde_json::to_value(feature.geometry.as_ref().unwrap()).unwrap(),
                expected_geometry
            );
        }
    }

    #[rstest]
    fn test_reshape_preserves_property_order() {
        let source = record(json!({"zeta": 1, "geometry": square(0.0, 0.0), "alpha": 2, "name": "x"}));
        let feature = record_to_feature(0, source).unwrap();
        let keys: Vec<&String> = feature.properties.as_ref().unwrap().keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "name"]);
    }

    #[rstest]
    #[case(json!({"name": "Nowhere"}))]
    #[case(json!({"name": "Nowhere", "geometry": null}))]
    fn test_missing_geometry_yields_feature_without_geometry(#[case] source: JsonValue) {
        let feature = record_to_feature(0, record(source)).unwrap();
        assert!(feature.geometry.is_none());
        assert_eq!(feature.properties.unwrap().len(), 1);
    }

    #[rstest]
    fn test_invalid_geometry_reports_record_index() {
        let records = vec![
            record(json!({"name": "ok", "geometry": square(0.0, 0.0)})),
            record(json!({"name": "broken", "geometry": {"type": "Blob"}})),
        ];
        match records_to_feature_collection(records) {
            Err(LoadError::InvalidGeometry { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected an invalid geometry error, got {:?}", other),
        }
    }

    #[rstest]
    fn test_empty_input_gives_empty_collection() {
        let collection = records_to_feature_collection(parse_records("[]").unwrap()).unwrap();
        assert!(collection.features.is_empty());
    }

    #[rstest]
    #[case("{\"name\": \"not an array\"}")]
    #[case("[1, 2, 3]")]
    #[case("<html>")]
    fn test_parse_records_rejects_malformed_bodies(#[case] body: &str) {
        assert!(matches!(
            parse_records(body),
            Err(LoadError::MalformedBody(_))
        ));
    }
}
