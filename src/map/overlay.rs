use geojson::FeatureCollection;

use super::{
    bounds::{collection_bounds, LatLngBounds},
    popup::{Popup, Tooltip, DETAILS_TOOLTIP},
    style::{style_feature, FeatureStyle},
};

#[derive(Debug, Clone)]
pub struct OverlayItem {
    pub feature: geojson::Feature,
    pub style: FeatureStyle,
    pub popup: Popup,
}

/// The choropleth layer drawn on top of the tiles.
#[derive(Debug, Clone)]
pub struct OverlayLayer {
    pub items: Vec<OverlayItem>,
    pub tooltip: Tooltip,
    pub bounds: Option<LatLngBounds>,
}

impl OverlayLayer {
    /// Build the layer for a collection. Returns `None` when there is nothing to draw.
    pub fn from_collection(collection: &FeatureCollection) -> anyhow::Result<Option<Self>> {
        if collection.features.is_empty() {
            return Ok(None);
        }
        let items = collection
            .features
            .iter()
            .map(|feature| OverlayItem {
                feature: feature.clone(),
                style: style_feature(feature),
                popup: Popup::for_feature(feature),
            })
            .collect();
        Ok(Some(Self {
            items,
            tooltip: DETAILS_TOOLTIP,
            bounds: collection_bounds(collection)?,
        }))
    }
}
