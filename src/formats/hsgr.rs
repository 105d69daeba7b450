//! Graph blob codec.
//!
//! Sequential little-endian stream produced by the upstream extraction
//! and hierarchy stages:
//!
//! ```text
//! checksum:   u32   // provenance checksum, carried as-is
//! node_count: u32   // INCLUDES the trailing CSR sentinel record
//! nodes:      node_count x { first_edge: u32 }
//! edge_count: u32
//! edges:      edge_count x { target: u32, data: EdgeData (16 bytes) }
//! ```
//!
//! The node array is the CSR first-edge index: entry `i` points at node
//! i's first outgoing edge and the sentinel entry equals `edge_count`, so
//! node i's range is `[nodes[i], nodes[i+1])`.

use anyhow::{ensure, Context, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use zerocopy::{AsBytes, FromBytes, FromZeroes};

use crate::nbg::EdgeData;
use crate::NodeId;

/// CSR node record: index of the node's first outgoing edge.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromZeroes, FromBytes, AsBytes)]
pub struct StaticNode {
    pub first_edge: u32,
}

/// CSR edge record.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromZeroes, FromBytes, AsBytes)]
pub struct StaticEdge {
    pub target: NodeId,
    pub data: EdgeData,
}

#[derive(Debug, Clone)]
pub struct HsgrGraph {
    pub checksum: u32,
    /// `number_of_nodes + 1` entries; the last one is the sentinel.
    pub nodes: Vec<StaticNode>,
    pub edges: Vec<StaticEdge>,
}

impl HsgrGraph {
    pub fn number_of_nodes(&self) -> u32 {
        self.nodes.len() as u32 - 1
    }

    pub fn number_of_edges(&self) -> u32 {
        self.edges.len() as u32
    }
}

pub struct HsgrFile;

impl HsgrFile {
    pub fn write<P: AsRef<Path>>(path: P, graph: &HsgrGraph) -> Result<()> {
        let file = File::create(path.as_ref())
            .with_context(|| format!("failed to create {}", path.as_ref().display()))?;
        let mut writer = BufWriter::new(file);

        writer.write_all(&graph.checksum.to_le_bytes())?;
        writer.write_all(&(graph.nodes.len() as u32).to_le_bytes())?;
        writer.write_all(graph.nodes.as_bytes())?;
        writer.write_all(&(graph.edges.len() as u32).to_le_bytes())?;
        writer.write_all(graph.edges.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<HsgrGraph> {
        let file = File::open(path.as_ref())
            .with_context(|| format!("failed to open {}", path.as_ref().display()))?;
        let mut reader = BufReader::new(file);

        let checksum = read_u32(&mut reader).context("truncated graph blob: checksum")?;
        let node_count = read_u32(&mut reader).context("truncated graph blob: node count")?;
        ensure!(node_count >= 1, "graph blob is missing the sentinel node");

        let mut nodes = Vec::with_capacity(node_count as usize);
        let mut buf = [0u8; std::mem::size_of::<StaticNode>()];
        for i in 0..node_count {
            reader
                .read_exact(&mut buf)
                .with_context(|| format!("truncated graph blob: node record {i}"))?;
            nodes.push(
                StaticNode::read_from(&buf[..])
                    .with_context(|| format!("undecodable node record {i}"))?,
            );
        }

        let edge_count = read_u32(&mut reader).context("truncated graph blob: edge count")?;
        let mut edges = Vec::with_capacity(edge_count as usize);
        let mut buf = [0u8; std::mem::size_of::<StaticEdge>()];
        for i in 0..edge_count {
            reader
                .read_exact(&mut buf)
                .with_context(|| format!("truncated graph blob: edge record {i}"))?;
            edges.push(
                StaticEdge::read_from(&buf[..])
                    .with_context(|| format!("undecodable edge record {i}"))?,
            );
        }

        ensure!(
            nodes.last().map(|n| n.first_edge) == Some(edge_count),
            "sentinel node must point one past the last edge"
        );

        Ok(HsgrGraph {
            checksum,
            nodes,
            edges,
        })
    }
}

fn read_u32<R: Read>(reader: &mut R) -> Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}
