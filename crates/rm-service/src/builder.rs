//! Ingestion surface for [`MapService`].

use tracing::info;

use rm_core::{MapConfig, NodeId};
use rm_search::{Location, LocationIndex, PrefixIndex};
use rm_spatial::{AStarRouter, RoadGraphBuilder, Router};
use rm_tiles::TileSelector;

use crate::{MapService, QueryResult};

/// Collects nodes, edges, and names, then freezes them into a
/// [`MapService`].
///
/// The graph primitives mirror [`RoadGraphBuilder`]; [`set_name`] also
/// registers the node for autocomplete.  Names are indexed from the node
/// state at `build` time, before isolated nodes are pruned from the graph,
/// so named points off the road network remain searchable.
///
/// [`set_name`]: Self::set_name
///
/// # Example
///
/// ```
/// use rm_service::{GeoPoint, MapConfig, MapServiceBuilder, NodeId, RouteRequest};
///
/// let mut b = MapServiceBuilder::new(MapConfig::default());
/// b.add_node(NodeId(1), -122.26, 37.87).unwrap();
/// b.add_node(NodeId(2), -122.25, 37.87).unwrap();
/// b.add_way(10, Some("Bancroft Way"), &[NodeId(1), NodeId(2)]).unwrap();
/// b.set_name(NodeId(2), "Caffe Strada").unwrap();
/// let service = b.build().unwrap();
///
/// let req = RouteRequest::new(GeoPoint::new(-122.26, 37.87), GeoPoint::new(-122.25, 37.87));
/// assert_eq!(service.route(&req).unwrap(), vec![NodeId(1), NodeId(2)]);
/// assert_eq!(service.autocomplete(Some("caf")).unwrap(), vec!["Caffe Strada"]);
/// ```
#[derive(Debug, Default)]
pub struct MapServiceBuilder {
    config: MapConfig,
    graph:  RoadGraphBuilder,
}

impl MapServiceBuilder {
    pub fn new(config: MapConfig) -> Self {
        Self { config, graph: RoadGraphBuilder::new() }
    }

    /// Pre-size the graph for a dataset of known size.
    pub fn with_capacity(config: MapConfig, nodes: usize, edges: usize) -> Self {
        Self { config, graph: RoadGraphBuilder::with_capacity(nodes, edges) }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    // ── Ingestion primitives ──────────────────────────────────────────────

    /// Non-finite coordinates are an invalid argument.
    pub fn add_node(&mut self, id: NodeId, lon: f64, lat: f64) -> QueryResult<()> {
        Ok(self.graph.add_node(id, lon, lat)?)
    }

    pub fn connect(&mut self, a: NodeId, b: NodeId) -> QueryResult<()> {
        Ok(self.graph.connect(a, b)?)
    }

    pub fn add_edge(&mut self, a: NodeId, b: NodeId, weight: f64) -> QueryResult<()> {
        Ok(self.graph.add_edge(a, b, weight)?)
    }

    pub fn add_road(&mut self, a: NodeId, b: NodeId) -> QueryResult<()> {
        Ok(self.graph.add_road(a, b)?)
    }

    pub fn add_way(&mut self, way_id: i64, way_name: Option<&str>, refs: &[NodeId]) -> QueryResult<()> {
        Ok(self.graph.add_way(way_id, way_name, refs)?)
    }

    pub fn set_way(&mut self, id: NodeId, way_id: i64, way_name: Option<&str>) -> QueryResult<()> {
        Ok(self.graph.set_way(id, way_id, way_name)?)
    }

    /// Name a point of interest.  A later call replaces the earlier name.
    pub fn set_name(&mut self, id: NodeId, name: &str) -> QueryResult<()> {
        Ok(self.graph.set_name(id, name)?)
    }

    pub fn remove_node(&mut self, id: NodeId) -> QueryResult<()> {
        self.graph.remove_node(id)?;
        Ok(())
    }

    // ── Build ─────────────────────────────────────────────────────────────

    /// Build with the default A* router.
    pub fn build(self) -> QueryResult<MapService<AStarRouter>> {
        self.build_with(AStarRouter)
    }

    /// Validate the configuration, index names, prune the graph, and
    /// freeze everything into a service using `router`.
    pub fn build_with<R: Router>(self, router: R) -> QueryResult<MapService<R>> {
        let tiles = TileSelector::new(&self.config)?;

        let mut prefixes = PrefixIndex::new();
        let mut locations = LocationIndex::new();
        for node in self.graph.nodes() {
            if let Some(name) = node.name.as_deref() {
                prefixes.insert(name);
                locations.insert(Location::new(node.id, node.pos, name));
            }
        }
        info!(
            names = prefixes.len(),
            distinct = locations.name_count(),
            "autocomplete indexes built"
        );

        let graph = self.graph.build();

        Ok(MapService::from_parts(self.config, graph, router, tiles, prefixes, locations))
    }
}
