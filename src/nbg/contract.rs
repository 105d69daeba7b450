//! Degree-two contraction and edge-based node id assignment.
//!
//! The pass collapses straight-through degree-2 chains: where a node `v`
//! carries exactly two edges, the path u -> v -> w is geometrically
//! collinear, the street identity continues across `v` and no turn
//! restriction, barrier or traffic signal interferes, the two edges are
//! merged into one (u, w) edge with summed distance. Afterwards every
//! remaining directed edge receives a dense edge-based node id and the
//! surviving node-based ids are renumbered compactly.
//!
//! One invocation runs the phases exactly once; the contractor is not
//! re-entrant. A sweep detects all candidates before mutating anything,
//! so visitation order inside a sweep does not matter. Chains longer than
//! one hop need further sweeps ([`SweepMode::Exhaustive`]).

use rustc_hash::FxHashSet;
use tracing::{debug, info, warn};

use crate::geo::{turn_angle, Coordinate};
use crate::nbg::dynamic::DynamicGraph;
use crate::nbg::{expand_input_edges, DirectedEdge, InputEdge, PSEUDO_ROAD_TYPE};
use crate::restriction::{RestrictionIndex, TurnRestriction};
use crate::{NodeId, INVALID_NODE};

/// How many detection+apply sweeps one [`DegreeTwoContractor::run`] call
/// performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepMode {
    /// Exactly one sweep; multi-hop chains stay partially contracted.
    Single,
    /// Sweep until a sweep merges nothing.
    Exhaustive,
}

/// A directed edge registered for the downstream hierarchy build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeBasedNode {
    pub edge_based_node_id: u32,
    pub source: NodeId,
    pub target: NodeId,
}

/// Result of edge-based id assignment.
#[derive(Debug)]
pub struct ContractionSummary {
    /// Total edge-based ids handed out (one per remaining directed edge).
    pub edge_based_node_count: u32,
    /// Edges materialized for the hierarchy build (non-pseudo road type).
    pub edge_based_nodes: Vec<EdgeBasedNode>,
    /// Original node id -> compact id, `INVALID_NODE` for isolated nodes.
    pub renumbering_table: Vec<NodeId>,
    pub renumbered_nodes: u32,
    /// Nodes left without any incident edge by the contraction.
    pub removed_nodes: u32,
}

pub struct DegreeTwoContractor {
    graph: DynamicGraph,
    coordinates: Vec<Coordinate>,
    restrictions: RestrictionIndex,
    barrier_nodes: FxHashSet<NodeId>,
    traffic_lights: FxHashSet<NodeId>,
}

impl DegreeTwoContractor {
    pub fn new(
        num_nodes: usize,
        input_edges: &[InputEdge],
        barrier_nodes: &[NodeId],
        traffic_lights: &[NodeId],
        restrictions: &[TurnRestriction],
        coordinates: Vec<Coordinate>,
    ) -> Self {
        assert_eq!(
            coordinates.len(),
            num_nodes,
            "one coordinate per node is required"
        );

        let in_range = |restriction: &&TurnRestriction| {
            let limit = num_nodes as NodeId;
            restriction.from_node < limit
                && restriction.via_node < limit
                && restriction.to_node < limit
        };
        let dropped = restrictions.iter().filter(|r| !in_range(r)).count();
        if dropped > 0 {
            warn!(dropped, "ignoring turn restrictions outside the node range");
        }
        let index = RestrictionIndex::from_restrictions(
            &restrictions
                .iter()
                .filter(in_range)
                .copied()
                .collect::<Vec<_>>(),
        );

        let graph = DynamicGraph::new(num_nodes, expand_input_edges(input_edges));

        Self {
            graph,
            coordinates,
            restrictions: index,
            barrier_nodes: barrier_nodes.iter().copied().collect(),
            traffic_lights: traffic_lights.iter().copied().collect(),
        }
    }

    pub fn graph(&self) -> &DynamicGraph {
        &self.graph
    }

    /// Hand the contracted graph off to the next build stage.
    pub fn into_graph(self) -> DynamicGraph {
        self.graph
    }

    /// Run the contraction. Returns the number of merged edge pairs.
    pub fn run(&mut self, mode: SweepMode) -> u32 {
        let before = self.graph.number_of_edges();
        let mut merged = self.sweep();
        if mode == SweepMode::Exhaustive {
            loop {
                let in_sweep = self.sweep();
                if in_sweep == 0 {
                    break;
                }
                merged += in_sweep;
            }
        }
        info!(
            edges_before = before,
            edges_after = self.graph.number_of_edges(),
            merged,
            "degree-two contraction finished"
        );
        merged
    }

    /// One detection+apply sweep.
    fn sweep(&mut self) -> u32 {
        let mut edges_to_remove: Vec<(NodeId, NodeId)> = Vec::new();
        let mut edges_to_insert: Vec<DirectedEdge> = Vec::new();
        // An edge already recorded for removal disqualifies later triples;
        // adjacent degree-2 nodes would otherwise claim the same edge.
        let mut claimed: FxHashSet<(NodeId, NodeId)> = FxHashSet::default();

        for u in 0..self.graph.number_of_nodes() {
            for e1 in self.graph.edge_range(u) {
                let v = self.graph.target(e1);
                let data1 = *self.graph.edge_data(e1);
                for e2 in self.graph.edge_range(v) {
                    let w = self.graph.target(e2);
                    let data2 = *self.graph.edge_data(e2);

                    let angle = turn_angle(
                        self.coordinates[u as usize],
                        self.coordinates[v as usize],
                        self.coordinates[w as usize],
                    );
                    if !(angle > 179.0 && angle < 181.0) {
                        continue;
                    }
                    if self.graph.out_degree(v) != 2 {
                        continue;
                    }
                    if data1.name_id != data2.name_id {
                        continue;
                    }
                    if data1.is_backward() != data2.is_backward()
                        || data1.is_access_restricted() != data2.is_access_restricted()
                    {
                        continue;
                    }
                    if self.barrier_nodes.contains(&v) || self.traffic_lights.contains(&v) {
                        continue;
                    }
                    if self.restrictions.is_prohibited(u, v, w) {
                        continue;
                    }
                    if claimed.contains(&(u, v)) || claimed.contains(&(v, w)) {
                        continue;
                    }
                    claimed.insert((u, v));
                    claimed.insert((v, w));

                    edges_to_remove.push((u, v));
                    edges_to_remove.push((v, w));

                    let mut merged = data1;
                    merged.distance += data2.distance;
                    edges_to_insert.push(DirectedEdge {
                        source: u,
                        target: w,
                        data: merged,
                    });
                }
            }
        }

        debug!(
            insertions = edges_to_insert.len(),
            removals = edges_to_remove.len(),
            "applying contraction sweep"
        );

        for (i, replacement) in edges_to_insert.iter().enumerate() {
            let (u, v) = edges_to_remove[2 * i];
            let (v2, w) = edges_to_remove[2 * i + 1];
            self.graph.delete_edge(u, v);
            self.graph.delete_edge(v2, w);
            self.graph
                .insert_edge(replacement.source, replacement.target, replacement.data);
        }

        edges_to_insert.len() as u32
    }

    /// Assign dense edge-based node ids in (node, adjacency) order and
    /// build the compact renumbering table. Pseudo-type edges receive an
    /// id and renumber their endpoints but are not materialized.
    pub fn assign_edge_based_ids(&mut self) -> ContractionSummary {
        let num_nodes = self.graph.number_of_nodes();
        let mut renumbering_table = vec![INVALID_NODE; num_nodes as usize];
        let mut renumbered_nodes = 0u32;
        let mut next_id = 0u32;
        let mut edge_based_nodes = Vec::new();

        for u in 0..num_nodes {
            for edge in self.graph.edge_range(u) {
                let v = self.graph.target(edge);
                if v == INVALID_NODE {
                    continue;
                }

                let data = self.graph.edge_data_mut(edge);
                data.edge_based_node_id = next_id;
                let assigned = next_id;
                let road_type = data.road_type;
                next_id += 1;

                // Every live edge keeps its endpoints in the compact
                // numbering; the pseudo type only gates materialization.
                if renumbering_table[u as usize] == INVALID_NODE {
                    renumbering_table[u as usize] = renumbered_nodes;
                    renumbered_nodes += 1;
                }
                if renumbering_table[v as usize] == INVALID_NODE {
                    renumbering_table[v as usize] = renumbered_nodes;
                    renumbered_nodes += 1;
                }

                if road_type == PSEUDO_ROAD_TYPE {
                    continue;
                }
                edge_based_nodes.push(EdgeBasedNode {
                    edge_based_node_id: assigned,
                    source: u,
                    target: v,
                });
            }
        }

        let removed_nodes = num_nodes - renumbered_nodes;
        info!(
            edge_based_nodes = next_id,
            removed_nodes, "generated edge-based node ids"
        );

        ContractionSummary {
            edge_based_node_count: next_id,
            edge_based_nodes,
            renumbering_table,
            renumbered_nodes,
            removed_nodes,
        }
    }
}
