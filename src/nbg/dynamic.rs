//! Mutable adjacency-arena multigraph.
//!
//! Nodes index into a flat edge arena via `{first_edge, num_edges}`
//! ranges. Deleting an edge compacts its node's range and marks the freed
//! slot with an `INVALID_NODE` target; inserting reuses the free slot
//! right after the range when there is one, otherwise the whole adjacency
//! relocates to the arena tail. Edge ids are therefore stable only until
//! the next mutation of the same node, and global (source, target) order
//! is not preserved after any insertion.
//!
//! Out-of-range node or edge ids are programming errors and panic via
//! slice indexing.

use crate::nbg::{DirectedEdge, EdgeData};
use crate::{EdgeId, NodeId, INVALID_NODE};

#[derive(Debug, Clone, Copy)]
struct Node {
    first_edge: EdgeId,
    num_edges: u32,
}

#[derive(Debug, Clone, Copy)]
struct Edge {
    target: NodeId,
    data: EdgeData,
}

#[derive(Debug)]
pub struct DynamicGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    num_edges: u32,
}

impl DynamicGraph {
    /// Build from directed edges. The edge list is sorted by
    /// (source, target) so each node's range is initially contiguous and
    /// ordered.
    pub fn new(num_nodes: usize, mut directed_edges: Vec<DirectedEdge>) -> Self {
        directed_edges.sort_by_key(|edge| (edge.source, edge.target));

        let mut nodes = Vec::with_capacity(num_nodes);
        let mut position = 0u32;
        let mut next = 0usize;
        for node in 0..num_nodes as NodeId {
            let first_edge = position;
            while next < directed_edges.len() && directed_edges[next].source == node {
                position += 1;
                next += 1;
            }
            nodes.push(Node {
                first_edge,
                num_edges: position - first_edge,
            });
        }
        assert_eq!(
            next,
            directed_edges.len(),
            "edge references a source outside the node range"
        );

        let edges = directed_edges
            .into_iter()
            .map(|edge| Edge {
                target: edge.target,
                data: edge.data,
            })
            .collect::<Vec<_>>();
        let num_edges = edges.len() as u32;

        Self {
            nodes,
            edges,
            num_edges,
        }
    }

    pub fn number_of_nodes(&self) -> u32 {
        self.nodes.len() as u32
    }

    pub fn number_of_edges(&self) -> u32 {
        self.num_edges
    }

    pub fn out_degree(&self, node: NodeId) -> u32 {
        self.nodes[node as usize].num_edges
    }

    pub fn begin_edges(&self, node: NodeId) -> EdgeId {
        self.nodes[node as usize].first_edge
    }

    pub fn end_edges(&self, node: NodeId) -> EdgeId {
        let node = &self.nodes[node as usize];
        node.first_edge + node.num_edges
    }

    /// Live edge ids of a node, in current adjacency order.
    pub fn edge_range(&self, node: NodeId) -> std::ops::Range<EdgeId> {
        self.begin_edges(node)..self.end_edges(node)
    }

    pub fn target(&self, edge: EdgeId) -> NodeId {
        self.edges[edge as usize].target
    }

    pub fn edge_data(&self, edge: EdgeId) -> &EdgeData {
        &self.edges[edge as usize].data
    }

    pub fn edge_data_mut(&mut self, edge: EdgeId) -> &mut EdgeData {
        &mut self.edges[edge as usize].data
    }

    /// Append a directed edge source -> target. Reuses the free slot right
    /// after the node's range when available; otherwise the adjacency is
    /// relocated to the arena tail (invalidating the node's edge ids).
    pub fn insert_edge(&mut self, source: NodeId, target: NodeId, data: EdgeData) -> EdgeId {
        let Node {
            first_edge,
            num_edges,
        } = self.nodes[source as usize];
        let slack = (first_edge + num_edges) as usize;

        let inserted = if slack < self.edges.len() && self.edges[slack].target == INVALID_NODE {
            self.edges[slack] = Edge { target, data };
            slack as EdgeId
        } else {
            let new_first = self.edges.len() as EdgeId;
            self.edges.reserve(num_edges as usize + 1);
            for offset in 0..num_edges {
                let old = (first_edge + offset) as usize;
                let moved = self.edges[old];
                self.edges.push(moved);
                self.edges[old].target = INVALID_NODE;
            }
            self.edges.push(Edge { target, data });
            self.nodes[source as usize].first_edge = new_first;
            new_first + num_edges
        };

        self.nodes[source as usize].num_edges += 1;
        self.num_edges += 1;
        inserted
    }

    /// Remove one directed edge source -> target. When parallel edges
    /// exist an unspecified one is removed. Returns false when no such
    /// edge exists.
    pub fn delete_edge(&mut self, source: NodeId, target: NodeId) -> bool {
        let range = self.edge_range(source);
        let Some(found) = range.clone().find(|&e| self.edges[e as usize].target == target)
        else {
            return false;
        };

        let last = range.end - 1;
        self.edges[found as usize] = self.edges[last as usize];
        self.edges[last as usize].target = INVALID_NODE;
        self.nodes[source as usize].num_edges -= 1;
        self.num_edges -= 1;
        true
    }

    /// Find any live edge source -> target.
    pub fn find_edge(&self, source: NodeId, target: NodeId) -> Option<EdgeId> {
        self.edge_range(source)
            .find(|&e| self.edges[e as usize].target == target)
    }
}
