//! Engine configuration.
//!
//! Typically loaded from a JSON file by the application crate (with the
//! `serde` feature) and handed to the service builder.

use std::time::Duration;

use crate::{BoundingBox, CoreError, CoreResult};

/// Deepest zoom level the tile pyramid is allowed to declare.  Tile indices
/// are `u32`, so `2^depth` must stay well inside that range.
const DEPTH_CEILING: u32 = 30;

// ── SearchBudget ──────────────────────────────────────────────────────────────

/// Upper bounds on the work a single route search may do.
///
/// Exceeding either limit ends the search with an "aborted" outcome, which
/// callers can tell apart from "no route exists".
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchBudget {
    /// Maximum number of nodes finalized before giving up.  `None` = no cap.
    pub max_explored: Option<usize>,
    /// Wall-clock cap for one search.  `None` = no cap.
    pub max_duration: Option<Duration>,
}

impl SearchBudget {
    /// No limits at all.  Only safe on graphs known to be small.
    pub const UNLIMITED: SearchBudget = SearchBudget { max_explored: None, max_duration: None };

    pub fn nodes(max_explored: usize) -> Self {
        Self { max_explored: Some(max_explored), max_duration: None }
    }

    pub fn with_duration(mut self, limit: Duration) -> Self {
        self.max_duration = Some(limit);
        self
    }
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self::nodes(10_000_000)
    }
}

// ── MapConfig ─────────────────────────────────────────────────────────────────

/// Static context shared by every query.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MapConfig {
    /// Extent of the depth-0 tile.
    pub root: BoundingBox,
    /// Edge length of one square tile, in pixels.  Default: 256.
    pub tile_size: u32,
    /// Deepest zoom level with pre-rendered tiles.  Default: 7.
    pub max_depth: u32,
    /// Work limit for each route search.
    pub search_budget: SearchBudget,
}

impl MapConfig {
    /// Reject configurations the tile and routing code cannot honor.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.root.is_well_formed() {
            return Err(CoreError::Config(format!(
                "root bounding box is not well formed: {:?}",
                self.root
            )));
        }
        if self.tile_size == 0 {
            return Err(CoreError::Config("tile_size must be positive".into()));
        }
        if self.max_depth > DEPTH_CEILING {
            return Err(CoreError::Config(format!(
                "max_depth {} exceeds {DEPTH_CEILING}",
                self.max_depth
            )));
        }
        Ok(())
    }

    /// Number of tiles along one axis at `depth`.
    #[inline]
    pub fn tiles_per_axis(&self, depth: u32) -> u32 {
        1u32 << depth
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            root: BoundingBox::new(
                -122.2998046875,
                37.892195547244356,
                -122.2119140625,
                37.82280243352756,
            ),
            tile_size: 256,
            max_depth: 7,
            search_budget: SearchBudget::default(),
        }
    }
}
