use std::{sync::Arc, time::Duration};

use geojson::FeatureCollection;

use crate::{
    map::{overlay::OverlayLayer, widget::MapHandle},
    neighborhoods::loader::{LoadEvent, LoadRequest, LoadTask},
};

use super::state::{LoadStatus, ViewState};

/// The choropleth view: loads neighborhoods once and keeps the map in sync
/// with what was loaded.
pub struct NeighborhoodView {
    state: ViewState,
    map: MapHandle,
    task: Option<LoadTask>,
    // The collection the map was last synced to, compared by identity.
    rendered: Option<Arc<FeatureCollection>>,
}

impl NeighborhoodView {
    /// Mount the view and start its single fetch.
    pub fn mount(map: MapHandle, request: LoadRequest) -> anyhow::Result<Self> {
        Ok(Self::with_task(map, LoadTask::spawn(request)?))
    }

    pub fn with_task(map: MapHandle, task: LoadTask) -> Self {
        Self {
            state: ViewState::default(),
            map,
            task: Some(task),
            rendered: None,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn publish(&mut self, collection: Arc<FeatureCollection>) {
        log::debug!(
            "Publishing {} neighborhood features",
            collection.features.len()
        );
        self.state.set_collection(collection);
    }

    /// Apply a delivered load result, if any. Returns whether the state changed.
    pub fn pump(&mut self, timeout: Duration) -> bool {
        let Some(event) = self.task.as_ref().and_then(|task| task.poll(timeout)) else {
            return false;
        };
        self.task = None;
        match event {
            LoadEvent::Loaded(collection) => self.publish(collection),
            LoadEvent::Failed(err) => {
                log::error!("Loading neighborhoods failed: {}", err);
                self.state.set_failed(err.to_string());
            }
        }
        true
    }

    /// Sync the map with the current state. The overlay is rebuilt and the
    /// viewport fitted only when a different collection has been published.
    pub fn render(&mut self) -> anyhow::Result<()> {
        let Some(collection) = self.state.collection().cloned() else {
            return Ok(());
        };
        if self
            .rendered
            .as_ref()
            .map_or(false, |rendered| Arc::ptr_eq(rendered, &collection))
        {
            return Ok(());
        }

        if !self.map.is_alive() {
            log::debug!("Map is gone, skipping render");
            return Ok(());
        }
        let overlay = OverlayLayer::from_collection(&collection)?;
        let synced = self.map.with_map(|map| {
            let bounds = overlay.as_ref().and_then(|overlay| overlay.bounds);
            map.set_overlay(overlay);
            if let Some(bounds) = bounds {
                map.fit_bounds(bounds);
            }
        });
        match synced {
            Some(()) => self.rendered = Some(collection),
            None => log::debug!("Map is gone, skipping render"),
        }
        Ok(())
    }

    pub fn is_settled(&self) -> bool {
        self.state.is_settled()
    }

    /// Whether a load result can still arrive.
    pub fn is_loading(&self) -> bool {
        self.task.is_some()
    }

    pub fn load_error(&self) -> Option<&str> {
        match self.state.load() {
            LoadStatus::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    /// Stop waiting for the fetch. Nothing is published afterwards.
    pub fn unmount(&mut self) {
        if let Some(task) = self.task.take() {
            task.cancel();
        }
    }
}

impl Drop for NeighborhoodView {
    fn drop(&mut self) {
        self.unmount();
    }
}
