//! One-shot user geolocation.
//!
//! The tracker asks the device once, latches the answer, and never
//! re-queries; later map centering is driven by selection, not by location
//! updates. Denial or failure is not an error the user sees: the documented
//! default coordinate stays in place and the failure is only logged.

use crate::core::geo::LatLng;
use crate::Result;
use async_trait::async_trait;

/// A device position fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationFix {
    pub lat: f64,
    pub lng: f64,
    /// Accuracy radius in meters, when the device reports one.
    pub accuracy: Option<f64>,
}

/// Seam over the platform location API so tests can substitute
/// deterministic fakes.
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    async fn current_position(&self) -> Result<LocationFix>;
}

pub struct UserLocationTracker {
    default: LatLng,
    resolved: Option<LatLng>,
}

impl Default for UserLocationTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl UserLocationTracker {
    pub fn new() -> Self {
        Self::with_default(LatLng::default_center())
    }

    pub fn with_default(default: LatLng) -> Self {
        Self {
            default: default.sanitize(),
            resolved: None,
        }
    }

    /// Resolves the user position exactly once. The first call queries the
    /// provider; every later call returns the latched result without
    /// touching the device again.
    pub async fn locate_once(&mut self, provider: &dyn GeolocationProvider) -> LatLng {
        if let Some(position) = self.resolved {
            return position;
        }
        let position = match provider.current_position().await {
            Ok(fix) => LatLng::new(fix.lat, fix.lng).sanitize(),
            Err(e) => {
                // Not user-visible; the default coordinate stands.
                log::debug!("geolocation unavailable ({e}), keeping default center");
                self.default
            }
        };
        self.resolved = Some(position);
        position
    }

    /// Latched position, or the default while unresolved.
    pub fn position(&self) -> LatLng {
        self.resolved.unwrap_or(self.default)
    }

    pub fn has_resolved(&self) -> bool {
        self.resolved.is_some()
    }
}
