//! `rm-spatial` — road graph, shortest-path search, and directions.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`network`]    | `RoadGraph` (arena + CSR), `RoadGraphBuilder`, pruning    |
//! | [`router`]     | `Router` trait, `Route`, `AStarRouter`, `DijkstraRouter`  |
//! | [`directions`] | `NavigationDirection`, `TurnCategory`, `route_directions` |
//! | [`error`]      | `SpatialError`, `SpatialResult<T>`                        |
//!
//! # Lifecycle
//!
//! The ingestion side drives a [`RoadGraphBuilder`]; [`RoadGraphBuilder::build`]
//! prunes isolated nodes exactly once and freezes the result.  A built
//! [`RoadGraph`] is immutable and `Send + Sync`, so any number of route
//! queries may read it concurrently.  Each search allocates its own scratch
//! state and drops it on return.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod directions;
pub mod error;
pub mod network;
pub mod router;


pub use directions::{route_directions, NavigationDirection, TurnCategory, UNKNOWN_ROAD};
pub use error::{AbortReason, SpatialError, SpatialResult};
pub use network::{Edge, Node, PruneReport, RoadGraph, RoadGraphBuilder};
pub use router::{shortest_path, AStarRouter, DijkstraRouter, Route, Router};
