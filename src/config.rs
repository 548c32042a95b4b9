use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
};

use anyhow::anyhow;
use serde::Deserialize;

use crate::map::bounds::LatLng;

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct MapConfig {
    pub center: LatLng,
    pub zoom: u8,
    pub tile_url: String,
    pub attribution: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: LatLng::new(37.8, -96.0),
            zoom: 4,
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "&copy; <a href=\"http://osm.org/copyright\">OpenStreetMap</a>"
                .to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub output_path: PathBuf,
    /// Also write the loaded neighborhoods as GeoJSON, for reference.
    pub geojson_dump_path: Option<PathBuf>,
    pub user_agent: String,
    pub map: MapConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            output_path: PathBuf::from("livability_map.html"),
            geojson_dump_path: None,
            user_agent: "livability-map".to_string(),
            map: MapConfig::default(),
        }
    }
}

pub fn load_config(filepath: &Path) -> anyhow::Result<Config> {
    if !filepath.exists() {
        return Err(anyhow!("Config file {:?} not found", filepath));
    }
    let config_contents = read_to_string(filepath)?;
    Ok(serde_yaml::from_str(&config_contents)?)
}
