//! # Tokomap
//!
//! A resilient map core for a small-business directory, inspired by Leaflet.
//!
//! The crate covers the failure-prone parts of putting businesses on a map:
//! a tile-provider fallback chain that survives dead or stalled imagery
//! sources, reconciliation between a read-only entity list and the imperative
//! on-map marker set, one-shot geolocation with a silent default, and async
//! place-detail enrichment guarded against stale responses.

pub mod core;
pub mod entity;
pub mod events;
pub mod location;
pub mod markers;
pub mod places;
pub mod prelude;
pub mod tiles;

pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    geo::{LatLng, LatLngBounds},
    map::BusinessMap,
    view::MapViewController,
};

pub use crate::entity::BusinessEntity;

pub use crate::events::{DomainMessage, RendererEvent};

pub use crate::location::{GeolocationProvider, LocationFix, UserLocationTracker};

pub use crate::markers::registry::{MarkerRegistry, ReconcileSummary};

pub use crate::places::{FetchState, PlaceClient, PlaceDetails, PlaceEnrichmentService};

pub use crate::tiles::{
    fallback::{ProviderStatus, TileProviderManager},
    provider::TileProvider,
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Tile provider failed: {0}")]
    ProviderLoad(String),

    #[error("Tile provider stalled: {0}")]
    ProviderTimeout(String),

    #[error("Geolocation unavailable: {0}")]
    Geolocation(String),

    #[error("Place details unavailable: {0}")]
    PlaceDetails(String),

    #[error("Marker reconciliation invariant broken: {0}")]
    Reconcile(String),

    #[error("Map initialization failed: {0}")]
    MapInit(String),
}

impl MapError {
    /// Only `MapInit` blocks the session; everything else is absorbed locally
    /// and turned into a state transition or diagnostic.
    pub fn is_fatal(&self) -> bool {
        matches!(self, MapError::MapInit(_))
    }
}

/// Error type alias for convenience
pub type Error = MapError;
