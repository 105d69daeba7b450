//! Zero-copy CSR graph view over a published region.
//!
//! The node array holds one `first_edge` index per node plus a trailing
//! sentinel equal to the edge count, so node `n`'s outgoing edges are
//! `[nodes[n].first_edge, nodes[n+1].first_edge)`. Parallel edges to the
//! same target may exist inside a range; lookups pick the minimum-distance
//! one. Everything is read-only and lock-free: the region is fully formed
//! before any reader attaches and never mutated afterwards.

use zerocopy::FromBytes;

use crate::formats::{StaticEdge, StaticNode};
use crate::nbg::EdgeData;
use crate::store::{Region, StoreError};
use crate::{EdgeId, NodeId, INVALID_EDGE};

pub struct StaticGraph<'a> {
    nodes: &'a [StaticNode],
    edges: &'a [StaticEdge],
}

impl<'a> StaticGraph<'a> {
    /// Locate the node and edge arrays by name inside an attached region.
    pub fn attach(
        region: &'a Region,
        node_list: &str,
        edge_list: &str,
    ) -> Result<Self, StoreError> {
        let nodes = StaticNode::slice_from(region.find(node_list)?).ok_or_else(|| {
            StoreError::Corrupt(format!("sub-region `{node_list}` is not a node array"))
        })?;
        let edges = StaticEdge::slice_from(region.find(edge_list)?).ok_or_else(|| {
            StoreError::Corrupt(format!("sub-region `{edge_list}` is not an edge array"))
        })?;

        if nodes.is_empty() {
            return Err(StoreError::Corrupt(
                "node array is missing its sentinel entry".into(),
            ));
        }
        if nodes[nodes.len() - 1].first_edge as usize != edges.len() {
            return Err(StoreError::Corrupt(
                "sentinel does not match the edge count".into(),
            ));
        }

        Ok(Self { nodes, edges })
    }

    pub fn number_of_nodes(&self) -> u32 {
        self.nodes.len() as u32 - 1
    }

    pub fn number_of_edges(&self) -> u32 {
        self.edges.len() as u32
    }

    pub fn begin_edges(&self, node: NodeId) -> EdgeId {
        self.nodes[node as usize].first_edge
    }

    pub fn end_edges(&self, node: NodeId) -> EdgeId {
        self.nodes[node as usize + 1].first_edge
    }

    pub fn out_degree(&self, node: NodeId) -> u32 {
        self.end_edges(node) - self.begin_edges(node)
    }

    pub fn target(&self, edge: EdgeId) -> NodeId {
        self.edges[edge as usize].target
    }

    pub fn edge_data(&self, edge: EdgeId) -> &EdgeData {
        &self.edges[edge as usize].data
    }

    /// Find `from -> to`. With parallel edges the minimum-distance one
    /// wins (ties: first in storage order); `INVALID_EDGE` when absent.
    pub fn find_edge(&self, from: NodeId, to: NodeId) -> EdgeId {
        let mut smallest_edge = INVALID_EDGE;
        let mut smallest_weight = u32::MAX;
        for edge in self.begin_edges(from)..self.end_edges(from) {
            let candidate = &self.edges[edge as usize];
            if candidate.target == to && candidate.data.distance < smallest_weight {
                smallest_edge = edge;
                smallest_weight = candidate.data.distance;
            }
        }
        smallest_edge
    }

    pub fn find_edge_in_either_direction(&self, from: NodeId, to: NodeId) -> EdgeId {
        let edge = self.find_edge(from, to);
        if edge != INVALID_EDGE {
            edge
        } else {
            self.find_edge(to, from)
        }
    }

    /// As [`find_edge_in_either_direction`], additionally reporting
    /// whether the match was found in the reversed direction.
    ///
    /// [`find_edge_in_either_direction`]: Self::find_edge_in_either_direction
    pub fn find_edge_indicate_if_reverse(&self, from: NodeId, to: NodeId) -> (EdgeId, bool) {
        let edge = self.find_edge(from, to);
        if edge != INVALID_EDGE {
            return (edge, false);
        }
        let reversed = self.find_edge(to, from);
        (reversed, reversed != INVALID_EDGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nbg::FLAG_FORWARD;
    use crate::store::{RegionBuilder, EDGE_LIST, NODE_LIST};
    use zerocopy::AsBytes;

    fn edge(target: NodeId, distance: u32) -> StaticEdge {
        StaticEdge {
            target,
            data: EdgeData {
                distance,
                name_id: 0,
                edge_based_node_id: 0,
                road_type: 3,
                flags: FLAG_FORWARD,
                reserved: 0,
            },
        }
    }

    fn publish(nodes: &[StaticNode], edges: &[StaticEdge]) -> (tempfile::TempDir, Region) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("region.bin");
        let mut builder = RegionBuilder::create(&path);
        builder.append(NODE_LIST, nodes.as_bytes()).unwrap();
        builder.append(EDGE_LIST, edges.as_bytes()).unwrap();
        builder.finish().unwrap();
        let region = Region::attach(&path).unwrap();
        (dir, region)
    }

    // 3 nodes: 0 -> 1 (two parallel edges, dist 5 and 3), 1 -> 2 (dist 7).
    fn diamond() -> (Vec<StaticNode>, Vec<StaticEdge>) {
        let nodes = vec![
            StaticNode { first_edge: 0 },
            StaticNode { first_edge: 2 },
            StaticNode { first_edge: 3 },
            StaticNode { first_edge: 3 }, // sentinel
        ];
        let edges = vec![edge(1, 5), edge(1, 3), edge(2, 7)];
        (nodes, edges)
    }

    #[test]
    fn counts_ranges_and_degrees() {
        let (nodes, edges) = diamond();
        let (_dir, region) = publish(&nodes, &edges);
        let graph = StaticGraph::attach(&region, NODE_LIST, EDGE_LIST).unwrap();

        assert_eq!(graph.number_of_nodes(), 3);
        assert_eq!(graph.number_of_edges(), 3);
        assert_eq!(graph.begin_edges(0), 0);
        assert_eq!(graph.end_edges(0), 2);
        // end - begin; the historical begin - end - 1 formula underflows.
        assert_eq!(graph.out_degree(0), 2);
        assert_eq!(graph.out_degree(1), 1);
        assert_eq!(graph.out_degree(2), 0);
    }

    #[test]
    fn find_edge_prefers_minimum_distance_among_parallels() {
        let (nodes, edges) = diamond();
        let (_dir, region) = publish(&nodes, &edges);
        let graph = StaticGraph::attach(&region, NODE_LIST, EDGE_LIST).unwrap();

        let found = graph.find_edge(0, 1);
        assert_ne!(found, INVALID_EDGE);
        assert_eq!(graph.edge_data(found).distance, 3);
    }

    #[test]
    fn absent_edges_yield_the_sentinel() {
        let (nodes, edges) = diamond();
        let (_dir, region) = publish(&nodes, &edges);
        let graph = StaticGraph::attach(&region, NODE_LIST, EDGE_LIST).unwrap();

        assert_eq!(graph.find_edge(0, 2), INVALID_EDGE);
        assert_eq!(graph.find_edge(2, 0), INVALID_EDGE);
    }

    #[test]
    fn either_direction_falls_back_to_the_reverse() {
        let (nodes, edges) = diamond();
        let (_dir, region) = publish(&nodes, &edges);
        let graph = StaticGraph::attach(&region, NODE_LIST, EDGE_LIST).unwrap();

        let forward = graph.find_edge_in_either_direction(1, 2);
        assert_eq!(graph.target(forward), 2);
        // 2 -> 1 only exists reversed.
        let (edge, reversed) = graph.find_edge_indicate_if_reverse(2, 1);
        assert_ne!(edge, INVALID_EDGE);
        assert!(reversed);
        let (edge, reversed) = graph.find_edge_indicate_if_reverse(1, 2);
        assert_ne!(edge, INVALID_EDGE);
        assert!(!reversed);
        let (edge, reversed) = graph.find_edge_indicate_if_reverse(0, 2);
        assert_eq!(edge, INVALID_EDGE);
        assert!(!reversed);
    }

    #[test]
    fn missing_sub_region_fails_attach() {
        let (nodes, _) = diamond();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("region.bin");
        let mut builder = RegionBuilder::create(&path);
        builder.append(NODE_LIST, nodes.as_bytes()).unwrap();
        builder.finish().unwrap();
        let region = Region::attach(&path).unwrap();

        assert!(matches!(
            StaticGraph::attach(&region, NODE_LIST, EDGE_LIST),
            Err(StoreError::RegionNotFound(name)) if name == EDGE_LIST
        ));
    }

    #[test]
    fn mismatched_sentinel_fails_attach() {
        let nodes = vec![StaticNode { first_edge: 0 }, StaticNode { first_edge: 5 }];
        let edges = vec![edge(0, 1)];
        let (_dir, region) = publish(&nodes, &edges);
        assert!(matches!(
            StaticGraph::attach(&region, NODE_LIST, EDGE_LIST),
            Err(StoreError::Corrupt(_))
        ));
    }
}
