//! Prelude module for common tokomap types and traits
//!
//! Re-exports the most commonly used types for easy importing with
//! `use tokomap::prelude::*;`

pub use crate::core::{
    constants,
    geo::{LatLng, LatLngBounds, TileCoord},
    map::BusinessMap,
    view::{MapViewController, SurfaceSize},
};

pub use crate::entity::BusinessEntity;

pub use crate::events::{translate, DomainMessage, RendererEvent};

pub use crate::location::{GeolocationProvider, LocationFix, UserLocationTracker};

pub use crate::markers::{
    popup::PopupContent,
    registry::{MarkerRecord, MarkerRegistry, ReconcileSummary},
};

pub use crate::places::{
    enrich, FetchState, FetchTicket, HttpPlaceClient, PlaceClient, PlaceDetails,
    PlaceEnrichmentService,
};

pub use crate::tiles::{
    fallback::{ProviderStatus, TileProviderManager},
    fetch::{fetch_tile, TileFetch, PLACEHOLDER_TILE_PNG},
    provider::{default_chain, TileProvider},
};

pub use crate::{Error as MapError, Result};

pub use std::time::{Duration, Instant};
