//! Great-circle math on a spherical Earth.
//!
//! Distances are in **miles** (Earth radius 3963 mi) and angles in
//! **degrees**.  All functions are pure and allocation-free.

use std::fmt;

/// Mean Earth radius in miles used by every distance computation.
pub const EARTH_RADIUS_MILES: f64 = 3963.0;

/// A WGS-84 coordinate.  Note the argument order of [`GeoPoint::new`] is
/// `(lon, lat)`, matching the x/y convention of the tile grid.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Haversine great-circle distance in miles.
    #[inline]
    pub fn distance_miles(self, other: GeoPoint) -> f64 {
        distance(self.lon, self.lat, other.lon, other.lat)
    }

    /// Initial bearing from `self` toward `other`, in `(-180, 180]`.
    #[inline]
    pub fn bearing_to(self, other: GeoPoint) -> f64 {
        bearing(self.lon, self.lat, other.lon, other.lat)
    }

    pub fn is_finite(self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lon, self.lat)
    }
}

/// Haversine distance in miles between `(lon_a, lat_a)` and `(lon_b, lat_b)`.
pub fn distance(lon_a: f64, lat_a: f64, lon_b: f64, lat_b: f64) -> f64 {
    let phi1 = lat_a.to_radians();
    let phi2 = lat_b.to_radians();
    let d_phi = (lat_b - lat_a).to_radians();
    let d_lambda = (lon_b - lon_a).to_radians();

    let a = (d_phi * 0.5).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda * 0.5).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt());
    EARTH_RADIUS_MILES * c
}

/// Initial great-circle bearing in degrees from A toward B, in `(-180, 180]`.
///
/// 0° is due north, positive angles are clockwise (east).
pub fn bearing(lon_a: f64, lat_a: f64, lon_b: f64, lat_b: f64) -> f64 {
    let phi1 = lat_a.to_radians();
    let phi2 = lat_b.to_radians();
    let d_lambda = (lon_b - lon_a).to_radians();

    let y = d_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();
    normalize_degrees(y.atan2(x).to_degrees())
}

/// Fold any angle in degrees into `(-180, 180]`.
pub fn normalize_degrees(deg: f64) -> f64 {
    let mut d = deg % 360.0;
    if d <= -180.0 {
        d += 360.0;
    } else if d > 180.0 {
        d -= 360.0;
    }
    d
}
