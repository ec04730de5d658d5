//! Read-only business entity model supplied by the catalog feed.
//!
//! This crate never mutates entities; it diffs the list against the on-map
//! marker set and renders display fields into popup content.

use crate::core::geo::LatLng;
use serde::{Deserialize, Serialize};

/// A small-business entry as delivered by the external catalog feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessEntity {
    /// Unique, stable id; the marker registry keys on it.
    pub id: String,
    pub name: String,
    pub category: String,
    pub position: LatLng,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Display text, e.g. "08:00 - 21:00".
    #[serde(default)]
    pub hours: Option<String>,
    /// Whether the business is currently open, as computed by the feed.
    #[serde(default)]
    pub is_open: Option<bool>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub verified: bool,
    /// Opaque identifier for the external place-details endpoint.
    #[serde(default)]
    pub place_id: Option<String>,
    /// Nested product list; opaque to the map core.
    #[serde(default)]
    pub products: Vec<serde_json::Value>,
}

impl BusinessEntity {
    /// Sanitized position; the feed occasionally ships broken coordinates
    /// and those must not reach the renderer.
    pub fn safe_position(&self) -> LatLng {
        self.position.sanitize()
    }
}
