//! Engine-wide constants derived from Leaflet defaults and the behavior of
//! public tile servers. Keeping them in a single place makes it easier to
//! tweak the magic numbers.

use std::time::Duration;

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// How long a provider may go without a successful tile load before the
/// fallback chain advances.
pub const PROVIDER_TIMEOUT: Duration = Duration::from_millis(4000);

/// Delay before re-measuring the rendering surface after mount or a window
/// resize; layout reflow is not settled immediately after the event.
pub const RESIZE_SETTLE_DELAY: Duration = Duration::from_millis(300);

/// Duration of an animated re-center.
pub const CENTER_ANIMATION: Duration = Duration::from_millis(400);

/// Padding (degrees) added around fitted bounds so edge markers are not
/// clipped by the viewport.
pub const FIT_PADDING_DEG: f64 = 0.005;

/// Zoom applied when centering on a selected entity.
pub const SELECTION_ZOOM: f64 = 16.0;

/// Default zoom for the initial view around the user.
pub const DEFAULT_ZOOM: f64 = 13.0;

/// Fallback center when geolocation is denied or the feed carries broken
/// coordinates: central Jakarta.
pub const DEFAULT_CENTER: (f64, f64) = (-6.2088, 106.8456);
