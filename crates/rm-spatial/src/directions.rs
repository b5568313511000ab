//! Turn-by-turn directions for a computed route.
//!
//! A route is cut into segments wherever the way name changes.  Each
//! segment after the first is tagged with the turn taken onto it, bucketed
//! from the heading change at the transition node:
//!
//! | `|turn|`     | Category                 |
//! |--------------|--------------------------|
//! | < 15°        | `Straight`               |
//! | < 30°        | `SlightLeft/SlightRight` |
//! | < 100°       | `Left/Right`             |
//! | otherwise    | `SharpLeft/SharpRight`   |
//!
//! Negative turns (counter-clockwise) are left turns.
//!
//! # Text form
//!
//! ```text
//! Turn left on Shattuck Avenue and continue for 0.412 miles.
//! ```
//!
//! [`NavigationDirection`] renders to this form through `Display` and
//! parses it back through `FromStr`.  Inside the process, prefer the serde
//! struct form (feature `serde`), which round-trips exactly.

use std::fmt;
use std::str::FromStr;

use rm_core::geo::normalize_degrees;
use rm_core::NodeIdx;

use crate::network::RoadGraph;
use crate::{SpatialError, SpatialResult};

/// Way name used when a node carries none.
pub const UNKNOWN_ROAD: &str = "unknown road";

// ── TurnCategory ──────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TurnCategory {
    Start,
    Straight,
    SlightLeft,
    SlightRight,
    Left,
    Right,
    SharpLeft,
    SharpRight,
}

impl TurnCategory {
    pub const ALL: [TurnCategory; 8] = [
        TurnCategory::Start,
        TurnCategory::Straight,
        TurnCategory::SlightLeft,
        TurnCategory::SlightRight,
        TurnCategory::Left,
        TurnCategory::Right,
        TurnCategory::SharpLeft,
        TurnCategory::SharpRight,
    ];

    /// Leading phrase of the text form.
    pub fn phrase(self) -> &'static str {
        match self {
            TurnCategory::Start       => "Start",
            TurnCategory::Straight    => "Go straight",
            TurnCategory::SlightLeft  => "Slight left",
            TurnCategory::SlightRight => "Slight right",
            TurnCategory::Left        => "Turn left",
            TurnCategory::Right       => "Turn right",
            TurnCategory::SharpLeft   => "Sharp left",
            TurnCategory::SharpRight  => "Sharp right",
        }
    }

    pub fn from_phrase(phrase: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.phrase() == phrase)
    }

    /// Bucket a heading change in degrees.  Never returns `Start`.
    pub fn classify(turn_deg: f64) -> Self {
        let left = turn_deg < 0.0;
        match turn_deg.abs() {
            a if a < 15.0  => TurnCategory::Straight,
            a if a < 30.0  => if left { TurnCategory::SlightLeft } else { TurnCategory::SlightRight },
            a if a < 100.0 => if left { TurnCategory::Left } else { TurnCategory::Right },
            _              => if left { TurnCategory::SharpLeft } else { TurnCategory::SharpRight },
        }
    }
}

impl fmt::Display for TurnCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.phrase())
    }
}

// ── NavigationDirection ───────────────────────────────────────────────────────

/// One instruction: which way to turn, onto which road, for how far.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavigationDirection {
    pub category: TurnCategory,
    /// Never empty; [`UNKNOWN_ROAD`] stands in for a missing name.
    pub way: String,
    /// Length of the segment in miles.
    pub distance: f64,
}

impl NavigationDirection {
    pub fn new(category: TurnCategory, way: impl Into<String>, distance: f64) -> Self {
        let way = way.into();
        let way = if way.is_empty() { UNKNOWN_ROAD.to_owned() } else { way };
        Self { category, way, distance }
    }

    /// Parse the exact text form produced by `Display`.
    pub fn parse(text: &str) -> SpatialResult<Self> {
        let unparseable = || SpatialError::UnparseableDirection(text.to_owned());

        let body = text.strip_suffix(" miles.").ok_or_else(unparseable)?;
        let (head, miles) = body.rsplit_once(" and continue for ").ok_or_else(unparseable)?;

        if !is_rendered_miles(miles) {
            return Err(unparseable());
        }
        let distance: f64 = miles.parse().map_err(|_| unparseable())?;

        let (category, way) = TurnCategory::ALL
            .into_iter()
            .find_map(|c| {
                head.strip_prefix(c.phrase())
                    .and_then(|rest| rest.strip_prefix(" on "))
                    .map(|way| (c, way))
            })
            .ok_or_else(unparseable)?;
        if way.is_empty() {
            return Err(unparseable());
        }

        Ok(Self { category, way: way.to_owned(), distance })
    }
}

/// `digits "." three digits`, the only shape `{:.3}` gives a
/// non-negative finite distance.
fn is_rendered_miles(s: &str) -> bool {
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    match s.split_once('.') {
        Some((whole, frac)) => !whole.is_empty() && all_digits(whole) && frac.len() == 3 && all_digits(frac),
        None => false,
    }
}

impl fmt::Display for NavigationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on {} and continue for {:.3} miles.",
            self.category.phrase(),
            self.way,
            self.distance
        )
    }
}

impl FromStr for NavigationDirection {
    type Err = SpatialError;

    fn from_str(s: &str) -> SpatialResult<Self> {
        Self::parse(s)
    }
}

// ── Annotation ────────────────────────────────────────────────────────────────

fn way_of(graph: &RoadGraph, n: NodeIdx) -> &str {
    match graph.node(n).way_name.as_deref() {
        Some(w) if !w.is_empty() => w,
        _ => UNKNOWN_ROAD,
    }
}

/// Heading change at `path[i]`, arriving from `path[i - 1]`.  With no
/// outgoing leg the traveller is taken to continue straight.
fn turn_at(graph: &RoadGraph, path: &[NodeIdx], i: usize) -> f64 {
    let incoming = graph.bearing_idx(path[i - 1], path[i]);
    let outgoing = match path.get(i + 1) {
        Some(&next) => graph.bearing_idx(path[i], next),
        None => incoming,
    };
    normalize_degrees(outgoing - incoming)
}

/// Convert a node path into directions.
///
/// The first segment is always `Start`.  Distance accumulates while the
/// way name stays the same; the leg that reaches a new way counts toward
/// the way being left.  The last segment is always emitted, so a one-node
/// path yields a single zero-length `Start`.
pub fn route_directions(graph: &RoadGraph, path: &[NodeIdx]) -> Vec<NavigationDirection> {
    let Some(&first) = path.first() else {
        return Vec::new();
    };

    let mut directions = Vec::new();
    let mut current = NavigationDirection::new(TurnCategory::Start, way_of(graph, first), 0.0);

    for i in 1..path.len() {
        current.distance += graph.distance_idx(path[i - 1], path[i]);

        let way = way_of(graph, path[i]);
        if way != current.way {
            let category = TurnCategory::classify(turn_at(graph, path, i));
            let next = NavigationDirection::new(category, way, 0.0);
            directions.push(std::mem::replace(&mut current, next));
        }
    }
    directions.push(current);
    directions
}
