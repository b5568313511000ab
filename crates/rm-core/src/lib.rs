//! `rm-core` — foundational types for the road-map query engine.
//!
//! Every other `rm-*` crate depends on this one.  It has no `rm-*`
//! dependencies and minimal external ones (only `thiserror`, plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                |
//! |------------|---------------------------------------------------------|
//! | [`ids`]    | `NodeId` (stable OSM id), `NodeIdx`, `EdgeIdx`          |
//! | [`geo`]    | `GeoPoint`, haversine distance, initial bearing         |
//! | [`bbox`]   | `BoundingBox` in upper-left / lower-right form          |
//! | [`config`] | `MapConfig`, `SearchBudget`                             |
//! | [`error`]  | `CoreError`, `CoreResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod bbox;
pub mod config;
pub mod error;
pub mod geo;
pub mod ids;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use bbox::BoundingBox;
pub use config::{MapConfig, SearchBudget};
pub use error::{CoreError, CoreResult};
pub use geo::{bearing, distance, GeoPoint, EARTH_RADIUS_MILES};
pub use ids::{EdgeIdx, NodeId, NodeIdx};
