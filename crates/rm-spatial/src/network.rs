//! Road graph representation and builder.
//!
//! # Data layout
//!
//! Nodes live in a dense arena addressed by [`NodeIdx`]; the stable map id
//! ([`NodeId`]) is resolved through a hash index.  Edges are undirected and
//! stored once in `edges`.  Each node's incident edges occupy a contiguous
//! **CSR** slice:
//!
//! ```text
//! incident_edge[ incident_start[n] .. incident_start[n+1] ]
//! ```
//!
//! so expanding a node during search is a linear scan with no pointer
//! chasing and no reference cycles between nodes.
//!
//! # Connectivity
//!
//! [`RoadGraphBuilder::build`] removes every node with no neighbours.  That
//! does **not** make the remaining graph connected: two road islands can
//! survive pruning, and a search between them reports
//! [`SpatialError::NoRoute`].

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::{debug, info};

use rm_core::{CoreError, EdgeIdx, GeoPoint, NodeId, NodeIdx};

use crate::{SpatialError, SpatialResult};

/// Node count above which [`RoadGraph::closest`] fans out over Rayon.
const PARALLEL_SCAN_MIN_NODES: usize = 16_384;

// ── Node / Edge ───────────────────────────────────────────────────────────────

/// A road-network vertex.
///
/// Identity is the map id alone: two `Node`s compare and hash equal iff
/// their `id`s are equal, whatever their coordinates or names.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub id: NodeId,
    pub pos: GeoPoint,
    /// Display name; present only for points of interest.
    pub name: Option<String>,
    /// The way this node was last attached to during ingestion.
    pub way_id: Option<i64>,
    pub way_name: Option<String>,
}

impl Node {
    pub fn new(id: NodeId, pos: GeoPoint) -> Self {
        Self { id, pos, name: None, way_id: None, way_name: None }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// An undirected road segment between two nodes.  `weight` is in miles.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub a: NodeIdx,
    pub b: NodeIdx,
    pub weight: f64,
}

impl Edge {
    /// The endpoint opposite `from`.
    #[inline]
    pub fn other(&self, from: NodeIdx) -> NodeIdx {
        if self.a == from { self.b } else { self.a }
    }

    #[inline]
    pub fn touches(&self, n: NodeIdx) -> bool {
        self.a == n || self.b == n
    }
}

/// What the build step did to the ingested data.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PruneReport {
    /// Live nodes before pruning.
    pub nodes_before: usize,
    /// Nodes removed because they had no neighbours.
    pub nodes_removed: usize,
    /// `connect` pairs that never received an explicit weight.
    pub weights_synthesized: usize,
    /// Repeated `add_edge` calls collapsed onto an existing pair.
    pub parallel_edges_merged: usize,
}

// ── RoadGraph ─────────────────────────────────────────────────────────────────

/// Immutable undirected road graph.
///
/// Do not construct directly; use [`RoadGraphBuilder`].
#[derive(Debug)]
pub struct RoadGraph {
    /// Surviving nodes in ingestion order.  Indexed by `NodeIdx`.
    pub nodes: Vec<Node>,
    /// Undirected edges in ingestion order.  Indexed by `EdgeIdx`.
    pub edges: Vec<Edge>,

    id_index: FxHashMap<NodeId, NodeIdx>,
    /// CSR row pointer.  Length = `node_count + 1`.
    incident_start: Vec<u32>,
    /// Each edge appears twice, once under each endpoint.
    incident_edge: Vec<EdgeIdx>,
    prune: PruneReport,
    /// Largest `s <= 1` with `s * great_circle(a, b) <= weight` on every edge.
    heuristic_scale: f64,
}

impl RoadGraph {
    /// A graph with no nodes.  Every route query against it fails with
    /// [`SpatialError::EmptyGraph`].
    pub fn empty() -> Self {
        RoadGraphBuilder::new().build()
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn prune_report(&self) -> PruneReport {
        self.prune
    }

    /// Factor applied to great-circle distance by distance-based search
    /// heuristics.
    ///
    /// `1.0` when every edge weighs at least the straight-line distance
    /// between its endpoints (any graph built from `add_road`, `add_way`,
    /// or bare `connect`).  Lighter edges shrink it so that the scaled
    /// distance never overestimates the remaining cost.
    pub fn heuristic_scale(&self) -> f64 {
        self.heuristic_scale
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    /// Ids of all vertices, in ingestion order.
    pub fn vertices(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().map(|n| n.id)
    }

    #[inline]
    pub fn node(&self, idx: NodeIdx) -> &Node {
        &self.nodes[idx.index()]
    }

    pub fn node_by_id(&self, id: NodeId) -> Option<&Node> {
        self.index_of(id).map(|idx| self.node(idx))
    }

    pub fn index_of(&self, id: NodeId) -> Option<NodeIdx> {
        self.id_index.get(&id).copied()
    }

    fn require(&self, id: NodeId) -> SpatialResult<NodeIdx> {
        self.index_of(id).ok_or(SpatialError::NodeNotFound(id))
    }

    #[inline]
    pub fn pos(&self, idx: NodeIdx) -> GeoPoint {
        self.nodes[idx.index()].pos
    }

    pub fn lon(&self, id: NodeId) -> SpatialResult<f64> {
        Ok(self.pos(self.require(id)?).lon)
    }

    pub fn lat(&self, id: NodeId) -> SpatialResult<f64> {
        Ok(self.pos(self.require(id)?).lat)
    }

    #[inline]
    pub fn edge(&self, e: EdgeIdx) -> &Edge {
        &self.edges[e.index()]
    }

    // ── Adjacency ─────────────────────────────────────────────────────────

    /// `(neighbour, edge)` pairs for every edge touching `idx`.
    ///
    /// A contiguous slice scan; no heap allocation.
    #[inline]
    pub fn incident(&self, idx: NodeIdx) -> impl Iterator<Item = (NodeIdx, EdgeIdx)> + '_ {
        let start = self.incident_start[idx.index()] as usize;
        let end = self.incident_start[idx.index() + 1] as usize;
        self.incident_edge[start..end]
            .iter()
            .map(move |&e| (self.edges[e.index()].other(idx), e))
    }

    #[inline]
    pub fn degree(&self, idx: NodeIdx) -> usize {
        let start = self.incident_start[idx.index()] as usize;
        let end = self.incident_start[idx.index() + 1] as usize;
        end - start
    }

    /// Neighbour slots of `idx`.
    pub fn adjacent(&self, idx: NodeIdx) -> impl Iterator<Item = NodeIdx> + '_ {
        self.incident(idx).map(|(n, _)| n)
    }

    /// Neighbour ids of `id`.
    pub fn adjacent_ids(&self, id: NodeId) -> SpatialResult<Vec<NodeId>> {
        let idx = self.require(id)?;
        Ok(self.adjacent(idx).map(|n| self.node(n).id).collect())
    }

    /// The edge joining `a` and `b`, found by scanning `a`'s incident list.
    ///
    /// Intended for pairs already known to be adjacent; `None` means the
    /// two nodes share no edge.
    pub fn find_edge(&self, a: NodeIdx, b: NodeIdx) -> Option<EdgeIdx> {
        self.incident(a).find(|&(n, _)| n == b).map(|(_, e)| e)
    }

    // ── Geometry ──────────────────────────────────────────────────────────

    #[inline]
    pub fn distance_idx(&self, a: NodeIdx, b: NodeIdx) -> f64 {
        self.pos(a).distance_miles(self.pos(b))
    }

    #[inline]
    pub fn bearing_idx(&self, a: NodeIdx, b: NodeIdx) -> f64 {
        self.pos(a).bearing_to(self.pos(b))
    }

    /// Great-circle distance in miles between two vertices.
    pub fn distance(&self, a: NodeId, b: NodeId) -> SpatialResult<f64> {
        Ok(self.distance_idx(self.require(a)?, self.require(b)?))
    }

    /// Initial bearing in degrees from vertex `a` toward vertex `b`.
    pub fn bearing(&self, a: NodeId, b: NodeId) -> SpatialResult<f64> {
        Ok(self.bearing_idx(self.require(a)?, self.require(b)?))
    }

    /// The vertex nearest to `pos` by great-circle distance.
    ///
    /// Full O(V) scan.  Ties go to the vertex first in ingestion order.
    /// Returns `None` only if the graph has no nodes.
    pub fn closest(&self, pos: GeoPoint) -> Option<NodeIdx> {
        let key = |(i, n): (usize, &Node)| (n.pos.distance_miles(pos), i);
        let best = if self.nodes.len() >= PARALLEL_SCAN_MIN_NODES {
            self.nodes.par_iter().enumerate().map(key).min_by(nearest_first)
        } else {
            self.nodes.iter().enumerate().map(key).min_by(nearest_first)
        };
        best.map(|(_, i)| NodeIdx(i as u32))
    }

    /// Id-level wrapper around [`closest`](Self::closest).
    pub fn closest_id(&self, lon: f64, lat: f64) -> Option<NodeId> {
        self.closest(GeoPoint::new(lon, lat)).map(|idx| self.node(idx).id)
    }
}

fn nearest_first(a: &(f64, usize), b: &(f64, usize)) -> Ordering {
    a.0.total_cmp(&b.0).then(a.1.cmp(&b.1))
}

// ── RoadGraphBuilder ──────────────────────────────────────────────────────────

/// Construct a [`RoadGraph`] incrementally, then call [`build`](Self::build).
///
/// This is the surface the map-data ingestion layer drives.  Nodes and
/// edges may arrive in any order as long as an edge's endpoints are added
/// first.
///
/// # Example
///
/// ```
/// use rm_core::NodeId;
/// use rm_spatial::RoadGraphBuilder;
///
/// let mut b = RoadGraphBuilder::new();
/// b.add_node(NodeId(1), -122.26, 37.87).unwrap();
/// b.add_node(NodeId(2), -122.25, 37.87).unwrap();
/// b.add_node(NodeId(3), -122.24, 37.88).unwrap(); // never connected
/// b.add_road(NodeId(1), NodeId(2)).unwrap();
/// let graph = b.build();
/// assert_eq!(graph.node_count(), 2); // node 3 pruned
/// assert_eq!(graph.edge_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct RoadGraphBuilder {
    /// Slot per ingested node; `None` once removed.
    nodes: Vec<Option<Node>>,
    id_index: FxHashMap<NodeId, usize>,
    /// Slot per distinct node pair; `None` once detached.
    raw_edges: Vec<Option<RawEdge>>,
    pair_index: FxHashMap<(usize, usize), usize>,
    /// Raw-edge slots touching each node slot.
    incident: Vec<Vec<usize>>,
    live_nodes: usize,
    live_edges: usize,
    parallel_merged: usize,
}

#[derive(Debug)]
struct RawEdge {
    a: usize,
    b: usize,
    /// `None` until `add_edge` supplies a weight.
    weight: Option<f64>,
}

#[inline]
fn pair_key(a: usize, b: usize) -> (usize, usize) {
    if a <= b { (a, b) } else { (b, a) }
}

impl RoadGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for the expected number of nodes and edges.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        let mut id_index = FxHashMap::default();
        id_index.reserve(nodes);
        Self {
            nodes: Vec::with_capacity(nodes),
            id_index,
            raw_edges: Vec::with_capacity(edges),
            incident: Vec::with_capacity(nodes),
            ..Self::default()
        }
    }

    pub fn node_count(&self) -> usize {
        self.live_nodes
    }

    pub fn edge_count(&self) -> usize {
        self.live_edges
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.id_index.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.id_index.get(&id).and_then(|&slot| self.nodes[slot].as_ref())
    }

    /// Live nodes in ingestion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter().flatten()
    }

    fn slot(&self, id: NodeId) -> SpatialResult<usize> {
        self.id_index.get(&id).copied().ok_or(SpatialError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> SpatialResult<&mut Node> {
        let slot = self.slot(id)?;
        self.nodes[slot].as_mut().ok_or(SpatialError::NodeNotFound(id))
    }

    // ── Ingestion primitives ──────────────────────────────────────────────

    /// Add a vertex.  Re-adding a known id moves it to the new coordinates
    /// and keeps its edges and attributes.
    ///
    /// Non-finite coordinates are rejected, leaving the builder unchanged.
    pub fn add_node(&mut self, id: NodeId, lon: f64, lat: f64) -> SpatialResult<()> {
        let pos = GeoPoint::new(lon, lat);
        if !pos.is_finite() {
            return Err(CoreError::InvalidCoordinate { lon, lat }.into());
        }
        if let Ok(node) = self.node_mut(id) {
            debug!(%id, "node re-added; updating position");
            node.pos = pos;
            return Ok(());
        }
        let slot = self.nodes.len();
        self.nodes.push(Some(Node::new(id, pos)));
        self.incident.push(Vec::new());
        self.id_index.insert(id, slot);
        self.live_nodes += 1;
        Ok(())
    }

    /// Attach a display name (points of interest).
    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) -> SpatialResult<()> {
        self.node_mut(id)?.name = Some(name.into());
        Ok(())
    }

    /// Record the way a node is attached to.  Later calls overwrite earlier
    /// ones, so a node shared by several ways keeps the last.
    pub fn set_way(&mut self, id: NodeId, way_id: i64, way_name: Option<&str>) -> SpatialResult<()> {
        let node = self.node_mut(id)?;
        node.way_id = Some(way_id);
        node.way_name = way_name.map(str::to_owned);
        Ok(())
    }

    /// Register `a` and `b` as mutual neighbours.
    ///
    /// A pair that never receives an explicit weight through
    /// [`add_edge`](Self::add_edge) is weighted by great-circle distance at
    /// build time.  Self-pairs are ignored.
    pub fn connect(&mut self, a: NodeId, b: NodeId) -> SpatialResult<()> {
        self.upsert_pair(a, b, None)
    }

    /// Register an undirected edge of `weight` miles under both endpoints.
    ///
    /// Any finite non-negative weight is accepted; weights below the
    /// great-circle distance lower [`RoadGraph::heuristic_scale`].  If the
    /// pair already has a weight, the smaller one is kept.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId, weight: f64) -> SpatialResult<()> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(SpatialError::InvalidWeight { a, b, weight });
        }
        self.upsert_pair(a, b, Some(weight))
    }

    /// Convenience: connect `a` and `b` with their great-circle distance as
    /// weight.
    pub fn add_road(&mut self, a: NodeId, b: NodeId) -> SpatialResult<()> {
        let pa = self.node(a).ok_or(SpatialError::NodeNotFound(a))?.pos;
        let pb = self.node(b).ok_or(SpatialError::NodeNotFound(b))?.pos;
        self.add_edge(a, b, pa.distance_miles(pb))
    }

    /// Convenience: ingest a whole way.  Tags each node with the way and
    /// join consecutive nodes with distance-weighted edges.
    pub fn add_way(&mut self, way_id: i64, way_name: Option<&str>, refs: &[NodeId]) -> SpatialResult<()> {
        for &id in refs {
            self.set_way(id, way_id, way_name)?;
        }
        for pair in refs.windows(2) {
            self.add_road(pair[0], pair[1])?;
        }
        Ok(())
    }

    fn upsert_pair(&mut self, a: NodeId, b: NodeId, weight: Option<f64>) -> SpatialResult<()> {
        let sa = self.slot(a)?;
        let sb = self.slot(b)?;
        if sa == sb {
            debug!(id = %a, "ignoring self-edge");
            return Ok(());
        }
        let key = pair_key(sa, sb);
        if let Some(&pos) = self.pair_index.get(&key) {
            if let (Some(raw), Some(w)) = (self.raw_edges[pos].as_mut(), weight) {
                raw.weight = Some(match raw.weight {
                    Some(existing) => {
                        self.parallel_merged += 1;
                        existing.min(w)
                    }
                    None => w,
                });
            }
            return Ok(());
        }
        let pos = self.raw_edges.len();
        self.raw_edges.push(Some(RawEdge { a: sa, b: sb, weight }));
        self.pair_index.insert(key, pos);
        self.incident[sa].push(pos);
        self.incident[sb].push(pos);
        self.live_edges += 1;
        Ok(())
    }

    /// Remove a vertex: detach every incident edge from both endpoints'
    /// lists, then delete the node.  Returns the removed node.
    pub fn remove_node(&mut self, id: NodeId) -> SpatialResult<Node> {
        let slot = self.slot(id)?;
        for pos in std::mem::take(&mut self.incident[slot]) {
            if let Some(raw) = self.raw_edges[pos].take() {
                let other = if raw.a == slot { raw.b } else { raw.a };
                self.incident[other].retain(|&p| p != pos);
                self.pair_index.remove(&pair_key(raw.a, raw.b));
                self.live_edges -= 1;
            }
        }
        let node = self.nodes[slot].take().ok_or(SpatialError::NodeNotFound(id))?;
        self.id_index.remove(&id);
        self.live_nodes -= 1;
        Ok(node)
    }

    // ── Build ─────────────────────────────────────────────────────────────

    /// Prune neighbourless nodes, then freeze into a [`RoadGraph`].
    ///
    /// Consuming `self` guarantees the pruning pass runs exactly once per
    /// graph.  Time complexity: O(V + E).
    pub fn build(mut self) -> RoadGraph {
        let nodes_before = self.live_nodes;

        // ── Pruning pass: collect first, then remove as a batch ───────────
        let isolated: Vec<NodeId> = self
            .nodes
            .iter()
            .zip(&self.incident)
            .filter_map(|(node, inc)| node.as_ref().filter(|_| inc.is_empty()).map(|n| n.id))
            .collect();
        for &id in &isolated {
            if let Err(e) = self.remove_node(id) {
                debug!(%id, error = %e, "prune skipped node");
            }
        }

        let RoadGraphBuilder { nodes: slots, raw_edges, parallel_merged, .. } = self;

        // ── Compact surviving nodes, preserving ingestion order ───────────
        let mut remap = vec![NodeIdx::INVALID; slots.len()];
        let mut nodes: Vec<Node> = Vec::with_capacity(slots.len() - isolated.len());
        let mut id_index = FxHashMap::default();
        id_index.reserve(nodes.capacity());
        for (slot, node) in slots.into_iter().enumerate() {
            if let Some(node) = node {
                let idx = NodeIdx(nodes.len() as u32);
                remap[slot] = idx;
                id_index.insert(node.id, idx);
                nodes.push(node);
            }
        }

        // ── Edges, filling in weights for bare `connect` pairs ────────────
        let mut weights_synthesized = 0;
        let edges: Vec<Edge> = raw_edges
            .into_iter()
            .flatten()
            .map(|raw| {
                let (a, b) = (remap[raw.a], remap[raw.b]);
                let weight = raw.weight.unwrap_or_else(|| {
                    weights_synthesized += 1;
                    nodes[a.index()].pos.distance_miles(nodes[b.index()].pos)
                });
                Edge { a, b, weight }
            })
            .collect();

        // ── CSR incidence ─────────────────────────────────────────────────
        let node_count = nodes.len();
        let mut incident_start = vec![0u32; node_count + 1];
        for e in &edges {
            incident_start[e.a.index() + 1] += 1;
            incident_start[e.b.index() + 1] += 1;
        }
        for i in 1..=node_count {
            incident_start[i] += incident_start[i - 1];
        }
        let mut cursor = incident_start.clone();
        let mut incident_edge = vec![EdgeIdx::INVALID; edges.len() * 2];
        for (i, e) in edges.iter().enumerate() {
            for end in [e.a, e.b] {
                let at = &mut cursor[end.index()];
                incident_edge[*at as usize] = EdgeIdx(i as u32);
                *at += 1;
            }
        }
        debug_assert_eq!(incident_start[node_count] as usize, edges.len() * 2);

        // ── Heuristic scale: tightest weight / straight-line ratio ────────
        let heuristic_scale = edges
            .iter()
            .filter_map(|e| {
                let straight = nodes[e.a.index()].pos.distance_miles(nodes[e.b.index()].pos);
                (straight > 0.0).then(|| e.weight / straight)
            })
            .fold(1.0_f64, f64::min);
        if heuristic_scale < 1.0 {
            debug!(heuristic_scale, "edges lighter than straight-line distance; heuristic scaled down");
        }

        let prune = PruneReport {
            nodes_before,
            nodes_removed: isolated.len(),
            weights_synthesized,
            parallel_edges_merged: parallel_merged,
        };
        info!(
            nodes = node_count,
            edges = edges.len(),
            pruned = prune.nodes_removed,
            synthesized = prune.weights_synthesized,
            "road graph built"
        );

        RoadGraph { nodes, edges, id_index, incident_start, incident_edge, prune, heuristic_scale }
    }
}
