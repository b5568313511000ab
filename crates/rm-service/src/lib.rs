//! `rm-service` — the query surface of the road-map engine.
//!
//! Ties the graph, tile, and search crates together behind one immutable
//! [`MapService`].  The ingestion layer drives a [`MapServiceBuilder`]
//! through the graph-construction primitives, then calls `build()` once;
//! after that every query is a `&self` method and the service can be shared
//! across threads without locking.
//!
//! | Query                          | Method                                |
//! |--------------------------------|---------------------------------------|
//! | shortest route                 | [`MapService::route`]                 |
//! | turn-by-turn directions        | [`MapService::directions`]            |
//! | tiles for a viewport           | [`MapService::raster`]                |
//! | names by prefix                | [`MapService::autocomplete`]          |
//! | location records by full name  | [`MapService::locations`]             |
//!
//! Every failure is a [`QueryError`] value; nothing here panics on bad
//! input.

pub mod builder;
pub mod error;
pub mod query;
pub mod service;

#[cfg(test)]
mod tests;

pub use builder::MapServiceBuilder;
pub use error::{QueryError, QueryResult};
pub use query::RouteRequest;
pub use service::MapService;

// Types that appear in query signatures.
pub use rm_core::{GeoPoint, MapConfig, NodeId, SearchBudget};
pub use rm_search::Location;
pub use rm_spatial::{AStarRouter, DijkstraRouter, NavigationDirection, Router, TurnCategory};
pub use rm_tiles::{RasterRequest, RasterResult};
