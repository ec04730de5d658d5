//! Tile provider definitions and URL templating.
//!
//! A provider is a parameterized imagery endpoint. Templates follow the
//! Leaflet placeholder convention: `{z}`, `{x}`, `{y}`, plus optional `{s}`
//! (subdomain rotation) and `{r}` (retina suffix, expands to `@2x` or "").

use crate::core::geo::TileCoord;
use serde::{Deserialize, Serialize};

/// A map-imagery source reachable via a parameterized URL template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileProvider {
    /// Stable identifier, also used as the style key during swaps.
    pub key: String,
    pub url_template: String,
    pub attribution: String,
    #[serde(default)]
    pub subdomains: Vec<String>,
    #[serde(default)]
    pub max_native_zoom: Option<u8>,
}

impl TileProvider {
    pub fn new(key: &str, url_template: &str, attribution: &str) -> Self {
        Self {
            key: key.to_string(),
            url_template: url_template.to_string(),
            attribution: attribution.to_string(),
            subdomains: Vec::new(),
            max_native_zoom: None,
        }
    }

    pub fn with_subdomains(mut self, subdomains: &[&str]) -> Self {
        self.subdomains = subdomains.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_max_native_zoom(mut self, zoom: u8) -> Self {
        self.max_native_zoom = Some(zoom);
        self
    }

    /// Expands the template for one tile. Subdomains rotate by coordinate so
    /// neighboring tiles spread across servers; `{s}` in a template without a
    /// subdomain list expands to nothing.
    pub fn tile_url(&self, coord: TileCoord, retina: bool) -> String {
        let zoom = match self.max_native_zoom {
            Some(max) => coord.z.min(max),
            None => coord.z,
        };

        let subdomain = if self.subdomains.is_empty() {
            ""
        } else {
            let idx = ((coord.x + coord.y) % self.subdomains.len() as u32) as usize;
            self.subdomains[idx].as_str()
        };

        self.url_template
            .replace("{s}", subdomain)
            .replace("{z}", &zoom.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string())
            .replace("{r}", if retina { "@2x" } else { "" })
    }
}

/// The default fallback chain, most reliable styling first. Order is fixed
/// for a session; the manager only ever walks forward through it.
pub fn default_chain() -> Vec<TileProvider> {
    vec![
        TileProvider::new(
            "carto-light",
            "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png",
            "&copy; OpenStreetMap contributors &copy; CARTO",
        )
        .with_subdomains(&["a", "b", "c", "d"])
        .with_max_native_zoom(19),
        TileProvider::new(
            "osm",
            "https://tile.openstreetmap.org/{z}/{x}/{y}.png",
            "&copy; OpenStreetMap contributors",
        )
        .with_max_native_zoom(19),
        TileProvider::new(
            "osm-de",
            "https://tile.openstreetmap.de/{z}/{x}/{y}.png",
            "&copy; OpenStreetMap contributors",
        )
        .with_max_native_zoom(18),
        TileProvider::new(
            "osm-hot",
            "https://tile-{s}.openstreetmap.fr/hot/{z}/{x}/{y}.png",
            "&copy; OpenStreetMap contributors, Humanitarian OSM Team",
        )
        .with_subdomains(&["a", "b", "c"])
        .with_max_native_zoom(19),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_url_expansion() {
        let provider = TileProvider::new(
            "carto-light",
            "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png",
            "test",
        )
        .with_subdomains(&["a", "b", "c", "d"]);

        let url = provider.tile_url(TileCoord::new(4, 3, 5), false);
        // (4 + 3) % 4 == 3 -> subdomain "d"
        assert_eq!(url, "https://d.basemaps.cartocdn.com/light_all/5/4/3.png");

        let retina = provider.tile_url(TileCoord::new(4, 3, 5), true);
        assert!(retina.ends_with("/5/4/3@2x.png"));
    }

    #[test]
    fn test_tile_url_without_subdomains() {
        let provider = TileProvider::new(
            "osm",
            "https://tile.openstreetmap.org/{z}/{x}/{y}.png",
            "test",
        );
        let url = provider.tile_url(TileCoord::new(1, 2, 3), false);
        assert_eq!(url, "https://tile.openstreetmap.org/3/1/2.png");
    }

    #[test]
    fn test_max_native_zoom_caps_template_zoom() {
        let provider = TileProvider::new(
            "osm-de",
            "https://tile.openstreetmap.de/{z}/{x}/{y}.png",
            "test",
        )
        .with_max_native_zoom(18);
        let url = provider.tile_url(TileCoord::new(0, 0, 20), false);
        assert!(url.contains("/18/"));
    }

    #[test]
    fn test_default_chain_order() {
        let chain = default_chain();
        let keys: Vec<&str> = chain.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["carto-light", "osm", "osm-de", "osm-hot"]);
    }
}
