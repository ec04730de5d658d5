//! Core map state: geography, the view controller, and the orchestrator.

pub mod constants;
pub mod geo;
pub mod map;
pub mod view;

pub use geo::{LatLng, LatLngBounds, TileCoord};
pub use map::BusinessMap;
pub use view::{MapViewController, SurfaceSize};
