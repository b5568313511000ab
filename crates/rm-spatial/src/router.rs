//! Routing trait with A* and Dijkstra implementations.
//!
//! # Pluggability
//!
//! Callers route through the [`Router`] trait, so the default
//! [`AStarRouter`] can be swapped for [`DijkstraRouter`] (or anything else)
//! without touching the query layer.
//!
//! # Determinism
//!
//! Frontier entries with identical priority pop in ascending [`NodeId`]
//! order, so a fixed graph and query always yield the same path.
//!
//! # Scratch state
//!
//! Every call allocates its own `dist_to` / `edge_to` / `settled` arrays and
//! frontier, and drops them on return.  Nothing is shared between calls,
//! which is what makes concurrent queries on one graph safe.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Instant;

use tracing::{debug, warn};

use rm_core::{GeoPoint, NodeId, NodeIdx, SearchBudget};

use crate::network::RoadGraph;
use crate::{AbortReason, SpatialError, SpatialResult};

/// How often (in settled nodes) the wall-clock budget is checked.
const CLOCK_CHECK_INTERVAL: usize = 1_024;

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Nodes from source to destination, both inclusive.
    pub nodes: Vec<NodeIdx>,
    /// Sum of edge weights along `nodes`, in miles.
    pub total_miles: f64,
    /// Nodes settled by the search that produced this route.
    pub explored: usize,
}

impl Route {
    /// Map the arena slots back to stable map ids.
    pub fn node_ids(&self, graph: &RoadGraph) -> Vec<NodeId> {
        self.nodes.iter().map(|&n| graph.node(n).id).collect()
    }

    /// `true` if the source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable shortest-path engine.
///
/// Implementations must be `Send + Sync` so a single router can serve
/// concurrent queries.
pub trait Router: Send + Sync {
    /// Compute a minimum-weight path from `from` to `to`.
    ///
    /// `from == to` yields a one-node route.  An unreachable destination is
    /// [`SpatialError::NoRoute`]; running out of budget is
    /// [`SpatialError::SearchAborted`].
    fn route(
        &self,
        graph: &RoadGraph,
        from: NodeIdx,
        to: NodeIdx,
        budget: &SearchBudget,
    ) -> SpatialResult<Route>;
}

/// A* with the great-circle distance to the goal as heuristic, scaled by
/// [`RoadGraph::heuristic_scale`].
///
/// The scale makes `s * d(u, goal) - s * d(v, goal) <= s * d(u, v) <= w(u, v)`
/// hold on every edge, so the heuristic stays consistent whatever weights
/// were ingested.  On distance-weighted graphs `s = 1`.
#[derive(Copy, Clone, Debug, Default)]
pub struct AStarRouter;

impl Router for AStarRouter {
    fn route(
        &self,
        graph: &RoadGraph,
        from: NodeIdx,
        to: NodeIdx,
        budget: &SearchBudget,
    ) -> SpatialResult<Route> {
        let goal = graph.pos(to);
        let scale = graph.heuristic_scale();
        search(graph, from, to, budget, |n| scale * graph.pos(n).distance_miles(goal))
    }
}

/// Plain Dijkstra (A* with a zero heuristic).  Explores more nodes than
/// [`AStarRouter`]; kept as the reference for optimality checks.
#[derive(Copy, Clone, Debug, Default)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(
        &self,
        graph: &RoadGraph,
        from: NodeIdx,
        to: NodeIdx,
        budget: &SearchBudget,
    ) -> SpatialResult<Route> {
        search(graph, from, to, budget, |_| 0.0)
    }
}

/// Snap both coordinates to their nearest vertex, then route between them.
pub fn shortest_path<R: Router + ?Sized>(
    graph: &RoadGraph,
    router: &R,
    start: GeoPoint,
    dest: GeoPoint,
    budget: &SearchBudget,
) -> SpatialResult<Route> {
    let from = graph.closest(start).ok_or(SpatialError::EmptyGraph)?;
    let to = graph.closest(dest).ok_or(SpatialError::EmptyGraph)?;
    router.route(graph, from, to, budget)
}

// ── Search internals ──────────────────────────────────────────────────────────

/// Frontier entry.  The frontier may hold several entries for one node at
/// different priorities; only the first pop of an unsettled node counts.
#[derive(Copy, Clone, Debug)]
struct Frontier {
    priority: f64,
    id: NodeId,
    node: NodeIdx,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap (a max-heap) pops the lowest priority,
        // then the smallest id.
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn search(
    graph: &RoadGraph,
    from: NodeIdx,
    to: NodeIdx,
    budget: &SearchBudget,
    heuristic: impl Fn(NodeIdx) -> f64,
) -> SpatialResult<Route> {
    if from == to {
        return Ok(Route { nodes: vec![from], total_miles: 0.0, explored: 0 });
    }

    let n = graph.node_count();
    let mut dist_to = vec![f64::INFINITY; n];
    let mut edge_to = vec![NodeIdx::INVALID; n];
    let mut settled = vec![false; n];
    let mut frontier = BinaryHeap::new();
    let mut explored = 0usize;
    let started = Instant::now();

    dist_to[from.index()] = 0.0;
    frontier.push(Frontier { priority: heuristic(from), id: graph.node(from).id, node: from });

    while let Some(Frontier { node, .. }) = frontier.pop() {
        if node == to {
            let route = reconstruct(&edge_to, from, to, dist_to[to.index()], explored);
            debug!(
                from = %graph.node(from).id,
                to = %graph.node(to).id,
                hops = route.nodes.len(),
                miles = route.total_miles,
                explored,
                "route found"
            );
            return Ok(route);
        }
        if settled[node.index()] {
            continue;
        }
        settled[node.index()] = true;
        explored += 1;

        if let Some(limit) = budget.max_explored {
            if explored > limit {
                return Err(aborted(graph, from, to, explored, AbortReason::NodeBudget(limit)));
            }
        }
        if let Some(limit) = budget.max_duration {
            if explored % CLOCK_CHECK_INTERVAL == 0 && started.elapsed() > limit {
                return Err(aborted(graph, from, to, explored, AbortReason::TimeBudget(limit)));
            }
        }

        let base = dist_to[node.index()];
        for (next, e) in graph.incident(node) {
            if settled[next.index()] {
                continue;
            }
            let candidate = base + graph.edge(e).weight;
            if candidate < dist_to[next.index()] {
                dist_to[next.index()] = candidate;
                edge_to[next.index()] = node;
                frontier.push(Frontier {
                    priority: candidate + heuristic(next),
                    id: graph.node(next).id,
                    node: next,
                });
            }
        }
    }

    debug!(from = %graph.node(from).id, to = %graph.node(to).id, explored, "no route");
    Err(SpatialError::NoRoute { from: graph.node(from).id, to: graph.node(to).id })
}

fn aborted(
    graph: &RoadGraph,
    from: NodeIdx,
    to: NodeIdx,
    explored: usize,
    reason: AbortReason,
) -> SpatialError {
    warn!(
        from = %graph.node(from).id,
        to = %graph.node(to).id,
        explored,
        %reason,
        "route search aborted"
    );
    SpatialError::SearchAborted { explored, reason }
}

/// Walk `edge_to` back from `to`.  Only called once `to` has been popped,
/// so every link on the chain is set.
fn reconstruct(
    edge_to: &[NodeIdx],
    from: NodeIdx,
    to: NodeIdx,
    total_miles: f64,
    explored: usize,
) -> Route {
    let mut nodes = vec![to];
    let mut cur = to;
    while cur != from {
        cur = edge_to[cur.index()];
        if cur == NodeIdx::INVALID {
            break;
        }
        nodes.push(cur);
    }
    nodes.reverse();
    Route { nodes, total_miles, explored }
}
