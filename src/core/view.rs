//! Map view ownership: center/zoom, animated panning, and surface sizing.
//!
//! Exactly one `MapViewController` exists per map for the component's
//! lifetime and nothing else writes to the view. Re-center requests use a
//! cancel-and-restart policy: a new explicit target cancels an in-flight
//! animation at its current interpolated position and restarts from there,
//! so no target is ever silently dropped.

use crate::core::constants::{
    CENTER_ANIMATION, DEFAULT_ZOOM, FIT_PADDING_DEG, RESIZE_SETTLE_DELAY, SELECTION_ZOOM,
    TILE_SIZE,
};
use crate::core::geo::{LatLng, LatLngBounds};
use crate::{MapError, Result};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone)]
struct CenterAnimation {
    from: LatLng,
    to: LatLng,
    started: Instant,
    duration: Duration,
}

impl CenterAnimation {
    fn position_at(&self, now: Instant) -> LatLng {
        if self.duration.is_zero() {
            return self.to;
        }
        let t = now.saturating_duration_since(self.started).as_secs_f64()
            / self.duration.as_secs_f64();
        self.from.lerp(&self.to, t)
    }

    fn finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.duration
    }
}

#[derive(Debug)]
pub struct MapViewController {
    size: SurfaceSize,
    center: LatLng,
    zoom: f64,
    animation: Option<CenterAnimation>,
    /// Deferred surface re-measure; armed on mount and on every resize.
    pending_invalidate: Option<Instant>,
    invalidations: u64,
}

impl MapViewController {
    /// A zero-area surface is the one fatal error in this crate: there is no
    /// automated recovery, the caller surfaces it and offers a manual retry
    /// (constructing a fresh controller).
    pub fn new(size: SurfaceSize, initial_center: LatLng, now: Instant) -> Result<Self> {
        if size.width == 0 || size.height == 0 {
            return Err(MapError::MapInit(format!(
                "map surface has zero area ({}x{})",
                size.width, size.height
            )));
        }
        Ok(Self {
            size,
            center: initial_center.sanitize(),
            zoom: DEFAULT_ZOOM,
            animation: None,
            // Layout reflow after mount leaves the surface mis-measured;
            // re-measure once things settle.
            pending_invalidate: Some(now + RESIZE_SETTLE_DELAY),
            invalidations: 0,
        })
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Interpolated center at `now`; the committed center once idle.
    pub fn center_at(&self, now: Instant) -> LatLng {
        match &self.animation {
            Some(anim) => anim.position_at(now),
            None => self.center,
        }
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        matches!(&self.animation, Some(anim) if !anim.finished(now))
    }

    /// Animated re-center (cancel-and-restart). An in-flight animation is
    /// committed at its current interpolated position and the new one starts
    /// from there.
    pub fn set_center(&mut self, target: LatLng, now: Instant) {
        let target = target.sanitize();
        let from = self.center_at(now);
        self.center = from;
        if from == target {
            self.animation = None;
            return;
        }
        self.animation = Some(CenterAnimation {
            from,
            to: target,
            started: now,
            duration: CENTER_ANIMATION,
        });
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(0.0, 19.0);
    }

    /// Selection precedence: a selected coordinate wins and suppresses
    /// bounds-fitting for this pass; with nothing selected the view fits all
    /// given points (entities plus the user position) with fixed padding.
    pub fn focus(&mut self, selection: Option<LatLng>, points: &[LatLng], now: Instant) {
        match selection {
            Some(target) => {
                self.set_center(target, now);
                self.set_zoom(SELECTION_ZOOM);
            }
            None => {
                if let Some(bounds) = LatLngBounds::from_points(points.iter()) {
                    self.fit_bounds(&bounds.padded(FIT_PADDING_DEG), now);
                }
            }
        }
    }

    /// Centers on the bounds and picks the largest integer zoom at which the
    /// whole box fits the surface.
    pub fn fit_bounds(&mut self, bounds: &LatLngBounds, now: Instant) {
        self.set_center(bounds.center(), now);
        self.set_zoom(self.zoom_for_bounds(bounds));
    }

    /// The window resized; record the new size and re-measure once layout
    /// settles. A transiently zero size is kept out of the stored state.
    pub fn notify_resized(&mut self, size: SurfaceSize, now: Instant) {
        if size.width == 0 || size.height == 0 {
            log::warn!("ignoring zero-area resize ({}x{})", size.width, size.height);
        } else {
            self.size = size;
        }
        self.pending_invalidate = Some(now + RESIZE_SETTLE_DELAY);
    }

    /// Event-loop tick: commits finished animations and performs due surface
    /// invalidations.
    pub fn tick(&mut self, now: Instant) {
        if let Some(anim) = self.animation.take() {
            if anim.finished(now) {
                self.center = anim.to;
            } else {
                self.animation = Some(anim);
            }
        }
        if let Some(due) = self.pending_invalidate {
            if now >= due {
                self.pending_invalidate = None;
                self.invalidations += 1;
                log::debug!("surface invalidated (#{})", self.invalidations);
            }
        }
    }

    /// How many deferred re-measures have run. Exposed for the render glue
    /// and tests.
    pub fn invalidation_count(&self) -> u64 {
        self.invalidations
    }

    pub fn has_pending_invalidation(&self) -> bool {
        self.pending_invalidate.is_some()
    }

    fn zoom_for_bounds(&self, bounds: &LatLngBounds) -> f64 {
        let span = bounds.span();
        // Degenerate bounds (single point) get the selection zoom.
        if span.lat <= f64::EPSILON && span.lng <= f64::EPSILON {
            return SELECTION_ZOOM;
        }
        // World width at zoom z is 2^z * TILE_SIZE pixels over 360 degrees;
        // latitude reuses the same scale, close enough at city spans.
        let fit = |span_deg: f64, pixels: u32, world_deg: f64| -> f64 {
            if span_deg <= f64::EPSILON {
                19.0
            } else {
                (pixels as f64 * world_deg / (span_deg * TILE_SIZE as f64)).log2()
            }
        };
        let zx = fit(span.lng, self.size.width, 360.0);
        let zy = fit(span.lat, self.size.height, 180.0);
        zx.min(zy).clamp(0.0, 19.0)
    }
}
