//! Publisher: loads the upstream binary streams and populates a named
//! region with the six sub-allocations readers expect.
//!
//! Any load or decode failure aborts the publish before the region file
//! appears; a partial graph is never visible to readers.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;
use zerocopy::AsBytes;

use crate::formats::{HsgrFile, NamesFile, NodeCoordsFile, OriginalEdgesFile};
use crate::store::{
    RegionBuilder, COORDINATE_LIST, EDGE_LIST, NAME_CHAR_LIST, NAME_OFFSET_LIST, NODE_LIST,
    ORIGINAL_EDGE_LIST,
};

/// Locations of the upstream extraction outputs.
#[derive(Debug, Clone)]
pub struct DatastorePaths {
    pub hsgr_path: PathBuf,
    pub node_coords_path: PathBuf,
    pub names_path: PathBuf,
    pub original_edges_path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishSummary {
    pub checksum: u32,
    pub number_of_nodes: u32,
    pub number_of_edges: u32,
    pub number_of_names: u32,
    pub number_of_original_edges: u32,
}

/// Load all query data structures and publish them as one region.
pub fn publish(paths: &DatastorePaths, region_path: &Path) -> Result<PublishSummary> {
    info!("loading graph data");
    let graph = HsgrFile::read(&paths.hsgr_path).context("loading graph blob")?;
    info!(checksum = graph.checksum, "data checksum");

    info!("loading coordinate list");
    let coordinates = NodeCoordsFile::read(&paths.node_coords_path, graph.number_of_nodes())
        .context("loading coordinate stream")?;

    info!("loading names index");
    let names = NamesFile::read(&paths.names_path).context("loading name stream")?;

    info!("loading original edge data");
    let original_edges = OriginalEdgesFile::read(&paths.original_edges_path)
        .context("loading original-edge stream")?;

    let summary = PublishSummary {
        checksum: graph.checksum,
        number_of_nodes: graph.number_of_nodes(),
        number_of_edges: graph.number_of_edges(),
        number_of_names: names.number_of_names(),
        number_of_original_edges: original_edges.len() as u32,
    };

    let mut builder = RegionBuilder::create(region_path);
    builder.append(NODE_LIST, graph.nodes.as_bytes())?;
    builder.append(EDGE_LIST, graph.edges.as_bytes())?;
    builder.append(COORDINATE_LIST, coordinates.as_bytes())?;
    builder.append(NAME_CHAR_LIST, &names.chars)?;
    builder.append(NAME_OFFSET_LIST, names.offsets.as_bytes())?;
    builder.append(ORIGINAL_EDGE_LIST, original_edges.as_bytes())?;
    builder
        .finish()
        .with_context(|| format!("publishing region {}", region_path.display()))?;

    info!(
        nodes = summary.number_of_nodes,
        edges = summary.number_of_edges,
        names = summary.number_of_names,
        original_edges = summary.number_of_original_edges,
        "all query data structures published"
    );
    Ok(summary)
}
