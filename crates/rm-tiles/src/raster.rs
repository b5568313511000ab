//! Viewport → tile-grid selection.
//!
//! # Depth
//!
//! Resolution is measured in longitude degrees per pixel (DPP).  The root
//! tile has `root.lon_span() / tile_size` DPP and every level halves it.
//! The selected depth is the smallest `d` whose per-tile DPP is no coarser
//! than the request's `query.lon_span() / w`, capped at `max_depth`.
//! Latitude and `h` play no part in the choice.
//!
//! # Index ranges
//!
//! Tile `x` grows eastward from the root's west edge and tile `y` grows
//! southward from its north edge.  The covered range on each axis runs from
//! the tile boundary at or before the query's start to the boundary at or
//! after its end, clamped to `[0, 2^d)`.  The returned bounds are those of
//! the tile block, so they usually enclose more than was asked for.

use std::fmt;

use tracing::debug;

use rm_core::{BoundingBox, MapConfig};

use crate::TileResult;

/// Relative slack when comparing resolutions and snapping tile boundaries.
const EPSILON: f64 = 1e-9;

// ── Request / result ──────────────────────────────────────────────────────────

/// A viewport to cover, in the field names of the external query.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RasterRequest {
    pub ullon: f64,
    pub ullat: f64,
    pub lrlon: f64,
    pub lrlat: f64,
    /// Viewport width in pixels.
    pub w: f64,
    /// Viewport height in pixels.  Must be positive; otherwise unused.
    pub h: f64,
}

impl RasterRequest {
    pub fn new(query: BoundingBox, w: f64, h: f64) -> Self {
        Self { ullon: query.ul_lon, ullat: query.ul_lat, lrlon: query.lr_lon, lrlat: query.lr_lat, w, h }
    }

    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::new(self.ullon, self.ullat, self.lrlon, self.lrlat)
    }
}

/// Tiles covering a viewport.
///
/// When `query_success` is `false` the grid is empty and every bound is
/// zero.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RasterResult {
    /// Tile ids, one row per `y` (north to south), `x` ascending in a row.
    pub render_grid: Vec<Vec<String>>,
    pub raster_ul_lon: f64,
    pub raster_ul_lat: f64,
    pub raster_lr_lon: f64,
    pub raster_lr_lat: f64,
    pub depth: u32,
    pub query_success: bool,
}

impl RasterResult {
    /// The failure value: no tiles, zeroed bounds.
    pub fn failed() -> Self {
        Self::default()
    }

    /// Columns in the grid.
    pub fn width(&self) -> usize {
        self.render_grid.first().map_or(0, Vec::len)
    }

    /// Rows in the grid.
    pub fn height(&self) -> usize {
        self.render_grid.len()
    }

    /// Bounds of the selected tile block.
    pub fn covered(&self) -> BoundingBox {
        BoundingBox::new(self.raster_ul_lon, self.raster_ul_lat, self.raster_lr_lon, self.raster_lr_lat)
    }
}

/// Position of one tile in the pyramid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileId {
    pub depth: u32,
    pub x: u32,
    pub y: u32,
}

impl TileId {
    pub fn new(depth: u32, x: u32, y: u32) -> Self {
        Self { depth, x, y }
    }
}

/// Renders as `d{depth}_x{x}_y{y}`, the name of the tile asset.
impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}_x{}_y{}", self.depth, self.x, self.y)
    }
}

// ── TileSelector ──────────────────────────────────────────────────────────────

/// Pure function of a fixed pyramid; cheap to copy and safe to share.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TileSelector {
    root: BoundingBox,
    tile_size: u32,
    max_depth: u32,
}

impl TileSelector {
    /// Validates `config` and captures its pyramid parameters.
    pub fn new(config: &MapConfig) -> TileResult<Self> {
        config.validate()?;
        Ok(Self { root: config.root, tile_size: config.tile_size, max_depth: config.max_depth })
    }

    pub fn root(&self) -> BoundingBox {
        self.root
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Longitude DPP of a single tile at `depth`; `None` past `max_depth`.
    pub fn lon_dpp(&self, depth: u32) -> Option<f64> {
        (depth <= self.max_depth).then(|| self.tile_span(depth).0 / self.tile_size as f64)
    }

    /// Coarsest depth whose tiles resolve at least `goal_lon_dpp`.
    pub fn depth_for(&self, goal_lon_dpp: f64) -> u32 {
        let mut depth = 0;
        let mut dpp = self.root.lon_span() / self.tile_size as f64;
        while dpp > goal_lon_dpp * (1.0 + EPSILON) && depth < self.max_depth {
            depth += 1;
            dpp /= 2.0;
        }
        depth
    }

    /// Geographic bounds of one tile, or `None` if the tile is not part of
    /// the pyramid (depth past `max_depth`, or an index off the grid).
    pub fn tile_bounds(&self, tile: TileId) -> Option<BoundingBox> {
        if tile.depth > self.max_depth {
            return None;
        }
        let side = 1u64 << tile.depth;
        if u64::from(tile.x) >= side || u64::from(tile.y) >= side {
            return None;
        }
        let (pix_lon, pix_lat) = self.tile_span(tile.depth);
        Some(BoundingBox::new(
            self.root.ul_lon + tile.x as f64 * pix_lon,
            self.root.ul_lat - tile.y as f64 * pix_lat,
            self.root.ul_lon + (tile.x + 1) as f64 * pix_lon,
            self.root.ul_lat - (tile.y + 1) as f64 * pix_lat,
        ))
    }

    /// Select the tiles covering `req`.
    ///
    /// Never fails outright: a viewport that is malformed, has no positive
    /// pixel size, or misses the root box yields [`RasterResult::failed`].
    pub fn select(&self, req: &RasterRequest) -> RasterResult {
        let query = req.bbox();
        if !query.is_well_formed() {
            debug!(?query, "raster query box is not well formed");
            return RasterResult::failed();
        }
        if !(req.w.is_finite() && req.w > 0.0 && req.h.is_finite() && req.h > 0.0) {
            debug!(w = req.w, h = req.h, "raster viewport has no positive size");
            return RasterResult::failed();
        }
        if !self.root.intersects(&query) {
            debug!(?query, root = ?self.root, "raster query misses the root box");
            return RasterResult::failed();
        }

        let depth = self.depth_for(query.lon_span() / req.w);
        let tiles = (1u64 << depth) as f64;
        let (pix_lon, pix_lat) = self.tile_span(depth);

        // A query narrower than the snapping slack still gets one tile.
        let x_start = snap((query.ul_lon - self.root.ul_lon) / pix_lon).floor().max(0.0);
        let x_end = snap((query.lr_lon - self.root.ul_lon) / pix_lon).ceil().max(x_start + 1.0).min(tiles);
        let y_start = snap((self.root.ul_lat - query.ul_lat) / pix_lat).floor().max(0.0);
        let y_end = snap((self.root.ul_lat - query.lr_lat) / pix_lat).ceil().max(y_start + 1.0).min(tiles);
        if x_start >= x_end || y_start >= y_end {
            debug!(depth, x_start, x_end, y_start, y_end, "raster index range is empty");
            return RasterResult::failed();
        }
        let (x0, x1, y0, y1) = (x_start as u32, x_end as u32, y_start as u32, y_end as u32);

        let render_grid: Vec<Vec<String>> = (y0..y1)
            .map(|y| (x0..x1).map(|x| TileId::new(depth, x, y).to_string()).collect())
            .collect();

        let result = RasterResult {
            render_grid,
            raster_ul_lon: self.root.ul_lon + x0 as f64 * pix_lon,
            raster_ul_lat: self.root.ul_lat - y0 as f64 * pix_lat,
            raster_lr_lon: self.root.ul_lon + x1 as f64 * pix_lon,
            raster_lr_lat: self.root.ul_lat - y1 as f64 * pix_lat,
            depth,
            query_success: true,
        };
        debug!(depth, cols = result.width(), rows = result.height(), "tiles selected");
        result
    }

    /// Degrees spanned by one tile at `depth`, as (lon, lat).  Callers keep
    /// `depth <= max_depth`, which `MapConfig::validate` bounds.
    fn tile_span(&self, depth: u32) -> (f64, f64) {
        let tiles = (1u64 << depth) as f64;
        (self.root.lon_span() / tiles, self.root.lat_span() / tiles)
    }
}

/// Pull values that floating error has nudged off an integer back onto it,
/// so a query edge lying on a tile boundary does not pick up an extra tile.
#[inline]
fn snap(v: f64) -> f64 {
    let r = v.round();
    if (v - r).abs() < EPSILON { r } else { v }
}
