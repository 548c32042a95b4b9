use std::sync::Arc;

use geojson::FeatureCollection;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadStatus {
    #[default]
    Pending,
    Loaded,
    Failed(String),
}

/// Everything the neighborhood view knows. Only changed through the setters.
#[derive(Debug, Default)]
pub struct ViewState {
    collection: Option<Arc<FeatureCollection>>,
    load: LoadStatus,
}

impl ViewState {
    pub fn collection(&self) -> Option<&Arc<FeatureCollection>> {
        self.collection.as_ref()
    }

    pub fn load(&self) -> &LoadStatus {
        &self.load
    }

    pub fn is_settled(&self) -> bool {
        self.load != LoadStatus::Pending
    }

    pub fn set_collection(&mut self, collection: Arc<FeatureCollection>) {
        self.collection = Some(collection);
        self.load = LoadStatus::Loaded;
    }

    /// Record a failed load. A previously published collection stays in place.
    pub fn set_failed(&mut self, reason: String) {
        self.load = LoadStatus::Failed(reason);
    }
}
