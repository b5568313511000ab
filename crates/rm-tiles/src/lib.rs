//! `rm-tiles` — choosing pre-rendered tiles for a map viewport.
//!
//! The tile pyramid divides a fixed root bounding box into `2^d × 2^d`
//! equal tiles at each depth `d` in `0..=max_depth`.  Given a query box and
//! a viewport width in pixels, [`TileSelector::select`] picks the coarsest
//! depth that still resolves the requested detail and returns the block of
//! tile ids covering the query.
//!
//! This crate never touches the road graph or any image data; it computes
//! identifiers only.
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`raster`] | `TileSelector`, `RasterRequest`, `RasterResult`, `TileId`  |
//! | [`error`]  | `TileError`, `TileResult`                                  |

pub mod error;
pub mod raster;


pub use error::{TileError, TileResult};
pub use raster::{RasterRequest, RasterResult, TileId, TileSelector};
