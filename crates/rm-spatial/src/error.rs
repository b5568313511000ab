//! Spatial-subsystem error type.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use rm_core::{CoreError, NodeId};

/// Why a route search gave up before reaching a verdict.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AbortReason {
    /// More nodes were finalized than the budget allows.
    NodeBudget(usize),
    /// The search ran longer than the wall-clock budget.
    TimeBudget(Duration),
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::NodeBudget(n) => write!(f, "node budget of {n} exhausted"),
            AbortReason::TimeBudget(d) => write!(f, "time budget of {d:?} exhausted"),
        }
    }
}

/// Errors produced by `rm-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// The search space was exhausted: `to` is provably unreachable.
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    /// The search stopped early; reachability is unknown.
    #[error("route search aborted after {explored} nodes: {reason}")]
    SearchAborted { explored: usize, reason: AbortReason },

    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("graph has no nodes")]
    EmptyGraph,

    #[error("edge {a}–{b} has invalid weight {weight}")]
    InvalidWeight { a: NodeId, b: NodeId, weight: f64 },

    #[error("unparseable direction: {0:?}")]
    UnparseableDirection(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
