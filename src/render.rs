//! Leaflet HTML map renderer.
//!
//! Produces a single self-contained page: the route line, one clustered
//! marker layer per category, origin and destination markers, a layer
//! switcher, and fullscreen and measuring controls. Map data is embedded as
//! JSON and every string from the data source is escaped in the browser
//! before it reaches the DOM.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::RenderError;
use crate::models::{Category, Coordinate};
use crate::traits::{MapRenderer, RouteMap};

const ROUTE_COLOR: &str = "#1E90FF";

#[derive(Debug, Clone)]
pub struct LeafletRenderer {
    pub title: String,
    /// Points at or below this distance get the "near" marker color.
    pub near_threshold_km: f64,
    pub initial_zoom: u8,
}

impl Default for LeafletRenderer {
    fn default() -> Self {
        Self {
            title: "Truck route".to_string(),
            near_threshold_km: 2.0,
            initial_zoom: 7,
        }
    }
}

impl LeafletRenderer {
    /// Renders `map` and writes the page to `path`.
    pub fn render_to_file(&self, map: &RouteMap<'_>, path: &Path) -> Result<(), RenderError> {
        let html = self.render(map)?;
        fs::write(path, html)?;
        Ok(())
    }

    fn marker_color(&self, distance_km: f64) -> &'static str {
        if distance_km <= self.near_threshold_km {
            "green"
        } else {
            "orange"
        }
    }

    fn map_data(&self, map: &RouteMap<'_>) -> MapData {
        let layers = Category::unique(map.categories)
            .into_iter()
            .map(|category| LayerData {
                name: layer_name(category, map.max_distance_km),
                markers: map
                    .points
                    .iter()
                    .filter(|point| point.category == category)
                    .map(|point| MarkerData {
                        position: lat_lon(point.coordinate),
                        name: point.display_name().to_string(),
                        brand: point.brand.clone().unwrap_or_else(|| "Unknown".to_string()),
                        distance_km: point.distance_km,
                        color: self.marker_color(point.distance_km),
                    })
                    .collect(),
            })
            .collect();

        MapData {
            title: self.title.clone(),
            center: lat_lon(map.route.mean_center()),
            zoom: self.initial_zoom,
            route: map.route.points().iter().copied().map(lat_lon).collect(),
            route_color: ROUTE_COLOR,
            origin: lat_lon(map.origin),
            destination: lat_lon(map.destination),
            layers,
        }
    }
}

impl MapRenderer for LeafletRenderer {
    type Artifact = String;

    fn render(&self, map: &RouteMap<'_>) -> Result<String, RenderError> {
        let data = serde_json::to_string(&self.map_data(map))?.replace("</", "<\\/");
        Ok(PAGE_TEMPLATE
            .replace("{{TITLE}}", &escape_html(&self.title))
            .replace("{{DATA}}", &data))
    }
}

/// Leaflet takes `[lat, lon]`.
fn lat_lon(coord: Coordinate) -> [f64; 2] {
    [coord.lat, coord.lon]
}

fn layer_name(category: Category, max_distance_km: f64) -> String {
    format!("{} (≤{} km)", category.label(), max_distance_km)
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[derive(Debug, Serialize)]
struct MapData {
    title: String,
    center: [f64; 2],
    zoom: u8,
    route: Vec<[f64; 2]>,
    route_color: &'static str,
    origin: [f64; 2],
    destination: [f64; 2],
    layers: Vec<LayerData>,
}

#[derive(Debug, Serialize)]
struct LayerData {
    name: String,
    markers: Vec<MarkerData>,
}

#[derive(Debug, Serialize)]
struct MarkerData {
    position: [f64; 2],
    name: String,
    brand: String,
    distance_km: f64,
    color: &'static str,
}

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{{TITLE}}</title>
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.css">
<link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.Default.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/leaflet.fullscreen@3.0.0/Control.FullScreen.css">
<link rel="stylesheet" href="https://cdn.jsdelivr.net/gh/ljagis/leaflet-measure@2.1.7/dist/leaflet-measure.min.css">
<script src="https://unpkg.com/leaflet.markercluster@1.5.3/dist/leaflet.markercluster.js"></script>
<script src="https://cdn.jsdelivr.net/npm/leaflet.fullscreen@3.0.0/Control.FullScreen.min.js"></script>
<script src="https://cdn.jsdelivr.net/gh/ljagis/leaflet-measure@2.1.7/dist/leaflet-measure.min.js"></script>
<style>html, body, #map { height: 100%; margin: 0; }</style>
</head>
<body>
<div id="map"></div>
<script>
const data = {{DATA}};
const esc = (s) => String(s).replace(/[&<>"']/g, (c) => ({"&": "&amp;", "<": "&lt;", ">": "&gt;", '"': "&quot;", "'": "&#39;"}[c]));
const map = L.map("map").setView(data.center, data.zoom);
L.tileLayer("https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png", {
  maxZoom: 19,
  attribution: "&copy; OpenStreetMap contributors"
}).addTo(map);
const route = L.polyline(data.route, {color: data.route_color, weight: 5}).addTo(map);
const overlays = {"Route": route};
for (const layer of data.layers) {
  const cluster = L.markerClusterGroup();
  for (const m of layer.markers) {
    L.circleMarker(m.position, {radius: 8, color: m.color, fillColor: m.color, fillOpacity: 0.8})
      .bindPopup("<b>" + esc(m.name) + "</b><br><b>Brand:</b> " + esc(m.brand) + "<br><b>Distance:</b> " + esc(m.distance_km) + " km")
      .addTo(cluster);
  }
  cluster.addTo(map);
  overlays[esc(layer.name)] = cluster;
}
L.circleMarker(data.origin, {radius: 10, color: "red", fillColor: "red", fillOpacity: 1}).bindPopup("<b>ORIGIN</b>").addTo(map);
L.circleMarker(data.destination, {radius: 10, color: "blue", fillColor: "blue", fillOpacity: 1}).bindPopup("<b>DESTINATION</b>").addTo(map);
L.control.layers(null, overlays).addTo(map);
L.control.fullscreen({position: "topright"}).addTo(map);
L.control.measure({position: "bottomleft", primaryLengthUnit: "kilometers", primaryAreaUnit: "sqmeters"}).addTo(map);
</script>
</body>
</html>
"#;
