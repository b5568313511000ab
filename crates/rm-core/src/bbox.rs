//! Axis-aligned geographic boxes in upper-left / lower-right form.
//!
//! Longitude grows to the right and latitude grows upward, so a well-formed
//! box has `ul_lon < lr_lon` and `ul_lat > lr_lat`.

use crate::GeoPoint;

/// A box given by its upper-left and lower-right corners.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    pub ul_lon: f64,
    pub ul_lat: f64,
    pub lr_lon: f64,
    pub lr_lat: f64,
}

impl BoundingBox {
    pub fn new(ul_lon: f64, ul_lat: f64, lr_lon: f64, lr_lat: f64) -> Self {
        Self { ul_lon, ul_lat, lr_lon, lr_lat }
    }

    pub fn upper_left(&self) -> GeoPoint {
        GeoPoint::new(self.ul_lon, self.ul_lat)
    }

    pub fn lower_right(&self) -> GeoPoint {
        GeoPoint::new(self.lr_lon, self.lr_lat)
    }

    /// Longitudinal span in degrees (positive for a well-formed box).
    #[inline]
    pub fn lon_span(&self) -> f64 {
        self.lr_lon - self.ul_lon
    }

    /// Latitudinal span in degrees (positive for a well-formed box).
    #[inline]
    pub fn lat_span(&self) -> f64 {
        self.ul_lat - self.lr_lat
    }

    /// `true` if all corners are finite and both spans are strictly positive.
    pub fn is_well_formed(&self) -> bool {
        [self.ul_lon, self.ul_lat, self.lr_lon, self.lr_lat]
            .iter()
            .all(|v| v.is_finite())
            && self.lon_span() > 0.0
            && self.lat_span() > 0.0
    }

    /// `true` if the two boxes share interior area.  Touching edges do not
    /// count as an intersection.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.ul_lon < other.lr_lon
            && other.ul_lon < self.lr_lon
            && self.lr_lat < other.ul_lat
            && other.lr_lat < self.ul_lat
    }

    /// Inclusive containment check.
    pub fn contains(&self, p: GeoPoint) -> bool {
        p.lon >= self.ul_lon && p.lon <= self.lr_lon && p.lat <= self.ul_lat && p.lat >= self.lr_lat
    }
}
