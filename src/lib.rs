//! Graph-storage and preprocessing core for road-network routing.
//!
//! Two tightly coupled pieces live here:
//!
//! - [`store`]: a compact, read-only CSR graph published once into a named
//!   shared region and attached zero-copy by any number of reader
//!   processes, plus the publisher that fills the region from the upstream
//!   binary streams ([`formats`]).
//! - [`nbg`]: the mutable node-based dynamic graph and the degree-two
//!   contraction / edge-expansion pass that collapses straight-through
//!   chains, honours turn restrictions ([`restriction`]) and geometry
//!   ([`geo`]), and assigns edge-based node ids for the downstream
//!   hierarchy build.
//!
//! Hierarchy construction and shortest-path queries consume what this
//! crate produces; they are not part of it.

pub mod formats;
pub mod geo;
pub mod nbg;
pub mod restriction;
pub mod store;

/// Dense index into node arrays.
pub type NodeId = u32;
/// Index into an edge array.
pub type EdgeId = u32;

/// Sentinel for "no node" / "removed".
pub const INVALID_NODE: NodeId = u32::MAX;
/// Sentinel for "edge not found".
pub const INVALID_EDGE: EdgeId = u32::MAX;

pub use geo::Coordinate;
pub use nbg::contract::{ContractionSummary, DegreeTwoContractor, SweepMode};
pub use nbg::dynamic::DynamicGraph;
pub use nbg::{DirectedEdge, EdgeData, InputEdge, PSEUDO_ROAD_TYPE};
pub use restriction::{RestrictionIndex, TurnRestriction};
pub use store::region::{Region, RegionBuilder};
pub use store::static_graph::StaticGraph;
pub use store::StoreError;
