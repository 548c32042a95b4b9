use handlebars::Handlebars;
use serde_json::json;

use super::widget::{MapWidget, Viewport};

const PAGE_TEMPLATE_NAME: &str = "page";

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8"/>
<meta name="viewport" content="width=device-width, initial-scale=1"/>
<title>{{title}}</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css"/>
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>
html, body, #map { height: 100%; width: 100%; margin: 0; }
.load-error { position: absolute; top: 10px; left: 50px; right: 10px; z-index: 1000; padding: 8px 12px; background: #fff3f3; border: 1px solid #FF0000; font-family: sans-serif; cursor: pointer; }
</style>
</head>
<body>
{{#if load_error}}
<div class="load-error" title="Dismiss" onclick="this.remove()">Neighborhoods could not be loaded: {{load_error}}</div>
{{/if}}
<div id="map"></div>
<script>
const viewport = {{{viewport}}};
const tiles = {{{tiles}}};
const overlay = {{{overlay}}};
const map = L.map("map");
if (viewport.bounds) {
  map.fitBounds(viewport.bounds);
} else {
  map.setView(viewport.center, viewport.zoom);
}
L.tileLayer(tiles.url, { attribution: tiles.attribution }).addTo(map);
if (overlay) {
  for (const item of overlay.items) {
    L.geoJSON(item.feature, { style: item.style })
      .bindPopup(item.popup)
      .bindTooltip(overlay.tooltip.text, { sticky: overlay.tooltip.sticky })
      .addTo(map);
  }
}
</script>
</body>
</html>
"#;

/// JSON that can sit inside a `<script>` element.
///
/// `<`, `>` and `&` only occur inside JSON strings, where the `\u` escapes
/// decode to the same text.
fn script_json(value: &serde_json::Value) -> String {
    value
        .to_string()
        .replace('&', "\\u0026")
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
}

fn viewport_json(viewport: &Viewport) -> serde_json::Value {
    match viewport {
        Viewport::CenterZoom { center, zoom } => json!({
            "center": center.to_array(),
            "zoom": zoom,
        }),
        Viewport::Bounds(bounds) => json!({ "bounds": bounds.to_array() }),
    }
}

fn overlay_json(map: &MapWidget) -> anyhow::Result<serde_json::Value> {
    let Some(overlay) = map.overlay() else {
        return Ok(serde_json::Value::Null);
    };
    let items = overlay
        .items
        .iter()
        .map(|item| -> anyhow::Result<serde_json::Value> {
            Ok(json!({
                "feature": serde_json::to_value(&item.feature)?,
                "style": serde_json::to_value(&item.style)?,
                "popup": item.popup.to_html(),
            }))
        })
        .collect::<anyhow::Result<Vec<serde_json::Value>>>()?;
    Ok(json!({
        "items": items,
        "tooltip": serde_json::to_value(&overlay.tooltip)?,
    }))
}

/// Render the map as a standalone Leaflet page.
///
/// `load_error`, when given, is shown as a dismissible banner above the map.
pub fn render_page(map: &MapWidget, title: &str, load_error: Option<&str>) -> anyhow::Result<String> {
    let mut hb = Handlebars::new();
    hb.register_template_string(PAGE_TEMPLATE_NAME, PAGE_TEMPLATE)?;

    let tile_layer = map.tile_layer();
    let data = json!({
        "title": title,
        "load_error": load_error,
        "viewport": script_json(&viewport_json(map.viewport())),
        "tiles": script_json(&json!({
            "url": tile_layer.url_template,
            "attribution": tile_layer.attribution,
        })),
        "overlay": script_json(&overlay_json(map)?),
    });
    Ok(hb.render(PAGE_TEMPLATE_NAME, &data)?)
}
