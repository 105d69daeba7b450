//! Binary stream codecs for the upstream extraction outputs consumed by
//! the datastore publisher.

pub mod crc;
pub mod hsgr;
pub mod names;
pub mod node_coords;
pub mod original_edges;

pub use hsgr::{HsgrFile, HsgrGraph, StaticEdge, StaticNode};
pub use names::{NameTable, NamesFile};
pub use node_coords::NodeCoordsFile;
pub use original_edges::{OriginalEdgeData, OriginalEdgesFile};
