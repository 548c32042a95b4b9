use std::{fs, io, path::Path};

use geojson::{FeatureCollection, GeoJson};

pub fn write_feature_collection_to_geojson(
    collection: &FeatureCollection,
    output_filepath: &Path,
) -> io::Result<()> {
    let geojson_contents = GeoJson::from(collection.clone());
    fs::write(output_filepath, geojson_contents.to_string())
}
