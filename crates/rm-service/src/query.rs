//! Request types of the external query interface.
//!
//! Response types live with the code that produces them
//! ([`RasterResult`](rm_tiles::RasterResult),
//! [`NavigationDirection`](rm_spatial::NavigationDirection),
//! [`Location`](rm_search::Location)); all serialize with the field names
//! clients expect.

use serde::{Deserialize, Serialize};

use rm_core::GeoPoint;

/// Route between two coordinates, each snapped to its nearest road node.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub start_lon: f64,
    pub start_lat: f64,
    pub end_lon: f64,
    pub end_lat: f64,
}

impl RouteRequest {
    pub fn new(start: GeoPoint, end: GeoPoint) -> Self {
        Self { start_lon: start.lon, start_lat: start.lat, end_lon: end.lon, end_lat: end.lat }
    }

    pub fn start(&self) -> GeoPoint {
        GeoPoint::new(self.start_lon, self.start_lat)
    }

    pub fn end(&self) -> GeoPoint {
        GeoPoint::new(self.end_lon, self.end_lat)
    }
}
