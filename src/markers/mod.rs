//! On-map markers: popup content and the reconciling registry.

pub mod popup;
pub mod registry;

pub use popup::PopupContent;
pub use registry::{MarkerHandle, MarkerRecord, MarkerRegistry, ReconcileSummary};
