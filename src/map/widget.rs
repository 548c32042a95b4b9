use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use crate::config::MapConfig;

use super::{
    bounds::{LatLng, LatLngBounds},
    overlay::OverlayLayer,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Viewport {
    CenterZoom { center: LatLng, zoom: u8 },
    Bounds(LatLngBounds),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
}

/// The live map: what is visible and what is drawn on it.
#[derive(Debug)]
pub struct MapWidget {
    viewport: Viewport,
    tile_layer: TileLayer,
    overlay: Option<OverlayLayer>,
    fit_count: usize,
}

pub type SharedMap = Rc<RefCell<MapWidget>>;

impl MapWidget {
    pub fn new(config: &MapConfig) -> Self {
        Self {
            viewport: Viewport::CenterZoom {
                center: config.center,
                zoom: config.zoom,
            },
            tile_layer: TileLayer {
                url_template: config.tile_url.clone(),
                attribution: config.attribution.clone(),
            },
            overlay: None,
            fit_count: 0,
        }
    }

    pub fn shared(config: &MapConfig) -> SharedMap {
        Rc::new(RefCell::new(Self::new(config)))
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn tile_layer(&self) -> &TileLayer {
        &self.tile_layer
    }

    pub fn overlay(&self) -> Option<&OverlayLayer> {
        self.overlay.as_ref()
    }

    pub fn set_overlay(&mut self, overlay: Option<OverlayLayer>) {
        self.overlay = overlay;
    }

    pub fn fit_bounds(&mut self, bounds: LatLngBounds) {
        log::debug!("Fitting viewport to {:?}", bounds.to_array());
        self.viewport = Viewport::Bounds(bounds);
        self.fit_count += 1;
    }

    /// How many times the viewport was fitted to data.
    pub fn fit_count(&self) -> usize {
        self.fit_count
    }
}

/// A non-owning reference from a view to the map it draws on.
#[derive(Debug, Clone, Default)]
pub struct MapHandle(Weak<RefCell<MapWidget>>);

impl MapHandle {
    pub fn new(map: &SharedMap) -> Self {
        Self(Rc::downgrade(map))
    }

    /// Run `f` against the map if it still exists.
    pub fn with_map<R>(&self, f: impl FnOnce(&mut MapWidget) -> R) -> Option<R> {
        let map = self.0.upgrade()?;
        let mut map = map.borrow_mut();
        Some(f(&mut map))
    }

    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}
