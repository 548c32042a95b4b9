use anyhow::anyhow;
use geo::BoundingRect;
use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Leaflet's `[lat, lng]` array form.
    pub fn to_array(&self) -> [f64; 2] {
        [self.lat, self.lng]
    }
}

/// An axis-aligned box in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn extend(&mut self, other: &LatLngBounds) {
        self.south_west.lat = self.south_west.lat.min(other.south_west.lat);
        self.south_west.lng = self.south_west.lng.min(other.south_west.lng);
        self.north_east.lat = self.north_east.lat.max(other.north_east.lat);
        self.north_east.lng = self.north_east.lng.max(other.north_east.lng);
    }

    pub fn to_array(&self) -> [[f64; 2]; 2] {
        [self.south_west.to_array(), self.north_east.to_array()]
    }
}

impl From<geo::Rect> for LatLngBounds {
    fn from(rect: geo::Rect) -> Self {
        // GeoJSON coordinates are x = longitude, y = latitude.
        Self {
            south_west: LatLng::new(rect.min().y, rect.min().x),
            north_east: LatLng::new(rect.max().y, rect.max().x),
        }
    }
}

pub fn geometry_bounds(geometry: &geojson::Geometry) -> anyhow::Result<Option<LatLngBounds>> {
    let geometry = geo::Geometry::<f64>::try_from(geometry.clone())
        .map_err(|err| anyhow!("Could not convert GeoJSON geometry, {}", err))?;
    Ok(geometry.bounding_rect().map(LatLngBounds::from))
}

/// Bounding box of every geometry in the collection, `None` if there is nothing to bound.
pub fn collection_bounds(collection: &FeatureCollection) -> anyhow::Result<Option<LatLngBounds>> {
    let mut bounds: Option<LatLngBounds> = None;
    for geometry in collection
        .features
        .iter()
        .filter_map(|feature| feature.geometry.as_ref())
    {
        if let Some(geometry_bounds) = geometry_bounds(geometry)? {
            match bounds.as_mut() {
                Some(bounds) => bounds.extend(&geometry_bounds),
                None => bounds = Some(geometry_bounds),
            }
        }
    }
    Ok(bounds)
}

#[cfg(test)]
impl LatLngBounds {
    fn contains(&self, other: &LatLngBounds) -> bool {
        self.south_west.lat <= other.south_west.lat
            && self.south_west.lng <= other.south_west.lng
            && self.north_east.lat >= other.north_east.lat
            && self.north_east.lng >= other.north_east.lng
    }
}
