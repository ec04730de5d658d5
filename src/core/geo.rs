use crate::core::constants::DEFAULT_CENTER;
use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters, used by the Haversine distance.
const EARTH_RADIUS: f64 = 6378137.0;

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// The documented fallback coordinate (central Jakarta).
    pub fn default_center() -> Self {
        Self::new(DEFAULT_CENTER.0, DEFAULT_CENTER.1)
    }

    /// Validates that the coordinates are finite and within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && self.lat >= -90.0
            && self.lat <= 90.0
            && self.lng >= -180.0
            && self.lng <= 180.0
    }

    /// Returns self if valid, otherwise the documented default center.
    /// Entity feeds occasionally carry NaN or null-turned-zero coordinates;
    /// those must never reach the renderer.
    pub fn sanitize(self) -> Self {
        if self.is_valid() {
            self
        } else {
            log::debug!("invalid coordinate ({}, {}), using default", self.lat, self.lng);
            Self::default_center()
        }
    }

    /// Calculates the distance to another LatLng in meters using the
    /// Haversine formula
    pub fn distance_to(&self, other: &LatLng) -> f64 {
        let lat1_rad = self.lat.to_radians();
        let lat2_rad = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lng = (other.lng - self.lng).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS * c
    }

    /// Linear interpolation toward another coordinate; `t` in `[0, 1]`.
    /// Good enough for the short animated pans this crate performs.
    pub fn lerp(&self, other: &LatLng, t: f64) -> LatLng {
        let t = t.clamp(0.0, 1.0);
        LatLng::new(
            self.lat + (other.lat - self.lat) * t,
            self.lng + (other.lng - self.lng) * t,
        )
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::default_center()
    }
}

/// Represents a bounding box of geographical coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Builds bounds covering every given point. Returns `None` for an empty
    /// input; callers must decide what "nothing to fit" means for them.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a LatLng>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut bounds = LatLngBounds::new(first, first);
        for p in iter {
            bounds.extend(p);
        }
        Some(bounds)
    }

    /// Checks if the bounds contain a point
    pub fn contains(&self, point: &LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }

    /// Extends the bounds to include a point
    pub fn extend(&mut self, point: &LatLng) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
    }

    /// Returns bounds grown by `padding` degrees on every side
    pub fn padded(&self, padding: f64) -> LatLngBounds {
        LatLngBounds::new(
            LatLng::new(self.south_west.lat - padding, self.south_west.lng - padding),
            LatLng::new(self.north_east.lat + padding, self.north_east.lng + padding),
        )
    }

    /// Gets the center point of the bounds
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }

    /// Gets the span of the bounds
    pub fn span(&self) -> LatLng {
        LatLng::new(
            self.north_east.lat - self.south_west.lat,
            self.north_east.lng - self.south_west.lng,
        )
    }
}

/// Represents a tile coordinate in the slippy map tile system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

impl TileCoord {
    pub fn new(x: u32, y: u32, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Creates a tile coordinate from a LatLng and zoom level
    pub fn from_lat_lng(lat_lng: &LatLng, zoom: u8) -> Self {
        let lat_rad = lat_lng.lat.clamp(-85.0511, 85.0511).to_radians();
        let n = 2_f64.powi(zoom as i32);

        let x = ((lat_lng.lng + 180.0) / 360.0 * n).floor() as u32;
        let y = ((1.0 - lat_rad.tan().asinh() / std::f64::consts::PI) / 2.0 * n).floor() as u32;

        Self::new(x, y, zoom)
    }

    /// Checks if the tile is valid for its zoom level
    pub fn is_valid(&self) -> bool {
        let max_coord = 2_u32.pow(self.z as u32);
        self.x < max_coord && self.y < max_coord
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lat_lng_creation() {
        let coord = LatLng::new(-6.2, 106.8);
        assert_eq!(coord.lat, -6.2);
        assert_eq!(coord.lng, 106.8);
        assert!(coord.is_valid());
    }

    #[test]
    fn test_sanitize_rejects_non_finite() {
        assert_eq!(LatLng::new(f64::NAN, 106.8).sanitize(), LatLng::default_center());
        assert_eq!(LatLng::new(-6.2, f64::INFINITY).sanitize(), LatLng::default_center());
        assert_eq!(LatLng::new(120.0, 106.8).sanitize(), LatLng::default_center());

        let ok = LatLng::new(-6.2, 106.8);
        assert_eq!(ok.sanitize(), ok);
    }

    #[test]
    fn test_lat_lng_distance() {
        let monas = LatLng::new(-6.1754, 106.8272);
        let kota_tua = LatLng::new(-6.1352, 106.8133);
        let distance = monas.distance_to(&kota_tua);

        // Roughly 4.7 km across central Jakarta
        assert!((distance - 4700.0).abs() < 500.0);
    }

    #[test]
    fn test_bounds_from_points() {
        let points = [
            LatLng::new(-6.21, 106.84),
            LatLng::new(-6.19, 106.86),
            LatLng::new(-6.20, 106.85),
        ];
        let bounds = LatLngBounds::from_points(points.iter()).unwrap();
        assert_eq!(bounds.south_west, LatLng::new(-6.21, 106.84));
        assert_eq!(bounds.north_east, LatLng::new(-6.19, 106.86));
        assert!(bounds.contains(&LatLng::new(-6.20, 106.85)));

        let empty: [LatLng; 0] = [];
        assert!(LatLngBounds::from_points(empty.iter()).is_none());
    }

    #[test]
    fn test_bounds_padded() {
        let bounds = LatLngBounds::new(LatLng::new(-6.21, 106.84), LatLng::new(-6.19, 106.86));
        let padded = bounds.padded(0.01);
        assert!(padded.contains(&LatLng::new(-6.215, 106.835)));
        assert!(!bounds.contains(&LatLng::new(-6.215, 106.835)));
    }

    #[test]
    fn test_lerp() {
        let a = LatLng::new(0.0, 0.0);
        let b = LatLng::new(2.0, 4.0);
        assert_eq!(a.lerp(&b, 0.5), LatLng::new(1.0, 2.0));
        assert_eq!(a.lerp(&b, 2.0), b);
    }
}
