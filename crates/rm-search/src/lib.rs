//! `rm-search` — resolving place names for autocomplete.
//!
//! Names are compared in a normalized form: ASCII letters and spaces only,
//! lowercased (see [`clean_name`]).  Two indexes share that form:
//!
//! | Module        | Contents                                                 |
//! |---------------|----------------------------------------------------------|
//! | [`normalize`] | `clean_name`                                             |
//! | [`trie`]      | `PrefixIndex`: prefix → every original-case full name    |
//! | [`locations`] | `LocationIndex`: full name → `Location` records          |
//! | [`error`]     | `SearchError`, `SearchResult`                            |
//!
//! Both are built once and then only read, so `&PrefixIndex` and
//! `&LocationIndex` may be shared freely across threads.

pub mod error;
pub mod locations;
pub mod normalize;
pub mod trie;


pub use error::{SearchError, SearchResult};
pub use locations::{Location, LocationIndex};
pub use normalize::clean_name;
pub use trie::PrefixIndex;
