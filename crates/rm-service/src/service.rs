//! The immutable query facade.

use rayon::prelude::*;
use tracing::debug;

use rm_core::{MapConfig, NodeId, NodeIdx};
use rm_search::{Location, LocationIndex, PrefixIndex};
use rm_spatial::{
    route_directions, shortest_path, AStarRouter, NavigationDirection, RoadGraph, Route, Router,
    SpatialError,
};
use rm_tiles::{RasterRequest, RasterResult, TileSelector};

use crate::{QueryError, QueryResult, RouteRequest};

/// Answers routing, directions, tiling, and autocomplete queries.
///
/// Built once by [`MapServiceBuilder`](crate::MapServiceBuilder) and
/// read-only afterwards.  Each route search allocates its own scratch
/// space, so any number of queries may run concurrently on a shared
/// `&MapService`.
#[derive(Debug)]
pub struct MapService<R: Router = AStarRouter> {
    config:    MapConfig,
    graph:     RoadGraph,
    router:    R,
    tiles:     TileSelector,
    prefixes:  PrefixIndex,
    locations: LocationIndex,
}

impl<R: Router> MapService<R> {
    pub(crate) fn from_parts(
        config:    MapConfig,
        graph:     RoadGraph,
        router:    R,
        tiles:     TileSelector,
        prefixes:  PrefixIndex,
        locations: LocationIndex,
    ) -> Self {
        Self { config, graph, router, tiles, prefixes, locations }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn graph(&self) -> &RoadGraph {
        &self.graph
    }

    pub fn tiles(&self) -> &TileSelector {
        &self.tiles
    }

    pub fn prefix_index(&self) -> &PrefixIndex {
        &self.prefixes
    }

    pub fn location_index(&self) -> &LocationIndex {
        &self.locations
    }

    // ── Routing ───────────────────────────────────────────────────────────

    /// Full search result for `req`: node path, length, and work done.
    pub fn plan(&self, req: &RouteRequest) -> QueryResult<Route> {
        let (start, end) = (req.start(), req.end());
        if !start.is_finite() || !end.is_finite() {
            debug!(?req, "route request has non-finite coordinates");
            return Err(QueryError::MalformedQuery(format!(
                "non-finite route endpoint: {start} → {end}"
            )));
        }
        Ok(shortest_path(&self.graph, &self.router, start, end, &self.config.search_budget)?)
    }

    /// Shortest path between the road nodes nearest the two endpoints, as
    /// node ids including both ends.
    pub fn route(&self, req: &RouteRequest) -> QueryResult<Vec<NodeId>> {
        self.plan(req).map(|route| route.node_ids(&self.graph))
    }

    /// Route a batch in parallel.  Results are in request order.
    pub fn route_many(&self, reqs: &[RouteRequest]) -> Vec<QueryResult<Vec<NodeId>>> {
        reqs.par_iter().map(|req| self.route(req)).collect()
    }

    // ── Directions ────────────────────────────────────────────────────────

    /// Turn-by-turn segments for a node-id path such as [`route`] returns.
    ///
    /// [`route`]: Self::route
    pub fn directions(&self, path: &[NodeId]) -> QueryResult<Vec<NavigationDirection>> {
        let indices = path
            .iter()
            .map(|&id| self.graph.index_of(id).ok_or(SpatialError::NodeNotFound(id)))
            .collect::<Result<Vec<NodeIdx>, _>>()?;
        Ok(route_directions(&self.graph, &indices))
    }

    /// [`directions`](Self::directions) rendered in the canonical text form.
    pub fn directions_text(&self, path: &[NodeId]) -> QueryResult<Vec<String>> {
        Ok(self.directions(path)?.iter().map(ToString::to_string).collect())
    }

    /// Inverse of the text form.  Anything else is an invalid argument.
    pub fn parse_direction(&self, text: &str) -> QueryResult<NavigationDirection> {
        Ok(NavigationDirection::parse(text)?)
    }

    // ── Tiles ─────────────────────────────────────────────────────────────

    /// Tiles covering a viewport.  Malformed requests come back with
    /// `query_success = false` rather than as an error.
    pub fn raster(&self, req: &RasterRequest) -> RasterResult {
        self.tiles.select(req)
    }

    // ── Autocomplete ──────────────────────────────────────────────────────

    /// Full names of every location whose normalized name starts with the
    /// normalized `prefix`, in no particular order.
    pub fn autocomplete(&self, prefix: Option<&str>) -> QueryResult<Vec<&str>> {
        Ok(self.prefixes.try_lookup(prefix)?)
    }

    /// Location records whose normalized name equals the normalized `name`.
    pub fn locations(&self, name: Option<&str>) -> QueryResult<&[Location]> {
        Ok(self.locations.try_get(name)?)
    }
}
