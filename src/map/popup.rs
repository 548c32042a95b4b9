use geojson::{JsonObject, JsonValue};
use handlebars::html_escape;
use serde::Serialize;

pub const NAME_KEY: &str = "name";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub text: &'static str,
    pub sticky: bool,
}

/// The hover hint shown on every feature, independent of the popup.
pub const DETAILS_TOOLTIP: Tooltip = Tooltip {
    text: "Click for details",
    sticky: true,
};

/// Details shown when a feature is clicked: the feature's name, then every
/// property as `key: <JSON value>` in property order.
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub title: String,
    pub lines: Vec<(String, String)>,
}

impl Popup {
    pub fn for_properties(properties: Option<&JsonObject>) -> Self {
        let Some(properties) = properties else {
            return Self {
                title: String::new(),
                lines: Vec::new(),
            };
        };
        let title = match properties.get(NAME_KEY) {
            Some(JsonValue::String(name)) => name.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        };
        let lines = properties
            .iter()
            .map(|(key, value)| (key.clone(), value.to_string()))
            .collect();
        Self { title, lines }
    }

    pub fn for_feature(feature: &geojson::Feature) -> Self {
        Self::for_properties(feature.properties.as_ref())
    }

    pub fn to_html(&self) -> String {
        let mut html = format!("<strong>{}</strong><br/>", html_escape(&self.title));
        for (key, value) in &self.lines {
            html.push_str(&format!("{}: {}<br/>", html_escape(key), html_escape(value)));
        }
        html
    }
}

#[cfg(test)]
impl Popup {
    fn to_text(&self) -> String {
        let mut text = self.title.clone();
        for (key, value) in &self.lines {
            text.push('\n');
            text.push_str(&format!("{}: {}", key, value));
        }
        text
    }
}
