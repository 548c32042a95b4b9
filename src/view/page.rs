use std::{sync::Arc, time::Duration};

use geojson::FeatureCollection;

use crate::{
    config::Config,
    map::{
        html::render_page,
        widget::{MapHandle, MapWidget, SharedMap},
    },
    neighborhoods::loader::{neighborhoods_url, LoadRequest},
};

use super::neighborhood_view::NeighborhoodView;

pub const PAGE_TITLE: &str = "Neighborhood Livability";

/// The page owns the map. The view only holds a handle to it.
pub struct Page {
    map: SharedMap,
    view: NeighborhoodView,
}

impl Page {
    pub fn open(config: &Config) -> anyhow::Result<Self> {
        let map = MapWidget::shared(&config.map);
        let request = LoadRequest {
            url: neighborhoods_url(&config.api_base_url),
            user_agent: config.user_agent.clone(),
        };
        let view = NeighborhoodView::mount(MapHandle::new(&map), request)?;
        Ok(Self { map, view })
    }

    /// Run the UI loop until the fetch has either succeeded or failed, or
    /// until there is nothing left to wait for.
    pub fn run_until_settled(
        &mut self,
        tick: Duration,
        mut on_tick: impl FnMut(),
    ) -> anyhow::Result<()> {
        self.view.render()?;
        while !self.view.is_settled() && self.view.is_loading() {
            if self.view.pump(tick) {
                self.view.render()?;
            }
            on_tick();
        }
        Ok(())
    }

    pub fn collection(&self) -> Option<&Arc<FeatureCollection>> {
        self.view.state().collection()
    }

    pub fn load_error(&self) -> Option<&str> {
        self.view.load_error()
    }

    pub fn to_html(&self) -> anyhow::Result<String> {
        render_page(&self.map.borrow(), PAGE_TITLE, self.view.load_error())
    }
}
