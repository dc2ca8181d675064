use crate::feature::LatLng;

/// Windows narrower than this get the zoomed-out defaults.
pub const NARROW_VIEWPORT_WIDTH: f64 = 768.0;

/// Map settings, served as `data/config.json` when present.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapConfig {
    pub center: LatLng,
    /// South-west and north-east corners the user cannot pan beyond.
    pub max_bounds: [LatLng; 2],
    pub max_bounds_viscosity: f64,
    pub zoom: f64,
    pub narrow_zoom: f64,
    pub tile_url: String,
    pub attribution: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: LatLng::new(38.998, -77.419),
            max_bounds: [
                LatLng::new(39.00264390508013, -77.52862930297853),
                LatLng::new(39.05571756241876, -77.33997344970703),
            ],
            max_bounds_viscosity: 1.0,
            zoom: 13.0,
            narrow_zoom: 12.0,
            tile_url: "https://{s}.basemaps.cartocdn.com/light_nolabels/{z}/{x}/{y}{r}.png"
                .to_string(),
            attribution: r#"&copy; <a href="https://www.openstreetmap.org/">OSM</a>"#
                .to_string(),
        }
    }
}

impl MapConfig {
    /// Initial and minimum zoom for a window of `width` pixels.
    pub fn home_zoom(&self, width: f64) -> f64 {
        if width < NARROW_VIEWPORT_WIDTH {
            self.narrow_zoom
        } else {
            self.zoom
        }
    }

    /// The home control appears once the user zooms in past the home zoom.
    pub fn home_visible(&self, width: f64, zoom: f64) -> bool {
        zoom > self.home_zoom(width)
    }

    /// Options object handed to the map library on creation.
    pub fn leaflet_options(&self, width: f64) -> serde_json::Value {
        let zoom = self.home_zoom(width);

        serde_json::json!({
            "center": self.center,
            "zoom": zoom,
            "minZoom": zoom,
            "maxBounds": self.max_bounds,
            "maxBoundsViscosity": self.max_bounds_viscosity,
            "tileUrl": self.tile_url,
            "attribution": self.attribution,
        })
    }
}
