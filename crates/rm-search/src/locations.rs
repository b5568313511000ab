//! Exact-name lookup of location records.

use rustc_hash::FxHashMap;

use rm_core::{GeoPoint, NodeId};

use crate::normalize::clean_name;
use crate::{SearchError, SearchResult};

/// One named point, as returned to autocomplete clients.
///
/// Coordinates are copied at ingestion, so a location stays searchable even
/// if its node was later pruned from the road graph.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
    pub name: String,
    pub id: NodeId,
}

impl Location {
    pub fn new(id: NodeId, pos: GeoPoint, name: impl Into<String>) -> Self {
        Self { lat: pos.lat, lon: pos.lon, name: name.into(), id }
    }

    pub fn pos(&self) -> GeoPoint {
        GeoPoint::new(self.lon, self.lat)
    }
}

/// Normalized name → every location sharing it.
#[derive(Clone, Debug, Default)]
pub struct LocationIndex {
    by_name: FxHashMap<String, Vec<Location>>,
    len: usize,
}

impl LocationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total records stored.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Distinct normalized names.
    pub fn name_count(&self) -> usize {
        self.by_name.len()
    }

    pub fn insert(&mut self, location: Location) {
        self.by_name.entry(clean_name(&location.name)).or_default().push(location);
        self.len += 1;
    }

    /// Records whose normalized name equals the normalized `name`, in
    /// insertion order.  Empty if there are none.
    pub fn get(&self, name: &str) -> &[Location] {
        self.by_name.get(&clean_name(name)).map(Vec::as_slice).unwrap_or(&[])
    }

    /// [`get`](Self::get) for callers whose name may be absent.
    pub fn try_get(&self, name: Option<&str>) -> SearchResult<&[Location]> {
        name.map(|n| self.get(n)).ok_or(SearchError::InvalidArgument("location name"))
    }
}

impl Extend<Location> for LocationIndex {
    fn extend<I: IntoIterator<Item = Location>>(&mut self, locations: I) {
        for location in locations {
            self.insert(location);
        }
    }
}
