//! Immutable shared graph store.
//!
//! A publisher process builds a named region once ([`datastore::publish`]),
//! after which any number of reader processes attach read-only views
//! ([`Region::attach`], [`StaticGraph::attach`]) with no coordination.
//! The single-writer/many-reader discipline is enforced by protocol: the
//! region file only appears (atomic rename) once fully populated, and is
//! never mutated afterwards.

use thiserror::Error;

pub mod datastore;
pub mod region;
pub mod static_graph;
pub mod views;

pub use region::{Region, RegionBuilder};
pub use static_graph::StaticGraph;

/// Canonical sub-region names used by the publisher.
pub const NODE_LIST: &str = "node_list";
pub const EDGE_LIST: &str = "edge_list";
pub const COORDINATE_LIST: &str = "coordinate_list";
pub const NAME_CHAR_LIST: &str = "name_char_list";
pub const NAME_OFFSET_LIST: &str = "name_offset_list";
pub const ORIGINAL_EDGE_LIST: &str = "original_edge_list";

/// Attach-time failures. All are fatal to the attaching process; nothing
/// is retried internally. Not-found *query* results are sentinel values,
/// not errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The segment exists but does not hold the requested sub-region,
    /// usually because the publisher has not completed or crashed
    /// mid-publish.
    #[error("could not locate sub-region `{0}` in the segment")]
    RegionNotFound(String),

    #[error("segment is malformed: {0}")]
    Corrupt(String),

    #[error("invalid sub-region name `{0}`")]
    InvalidName(String),

    #[error("i/o failure on the shared segment")]
    Io(#[from] std::io::Error),
}
