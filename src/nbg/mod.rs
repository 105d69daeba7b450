//! Node-based graph: edge records, raw-edge expansion, and the mutable
//! dynamic graph the contraction pass operates on.

use zerocopy::{AsBytes, FromBytes, FromZeroes};

use crate::NodeId;

pub mod contract;
pub mod dynamic;

// Flag bits in `EdgeData::flags`.
pub const FLAG_FORWARD: u8 = 0b0000_0001;
pub const FLAG_BACKWARD: u8 = 0b0000_0010;
pub const FLAG_SHORTCUT: u8 = 0b0000_0100;
pub const FLAG_ROUNDABOUT: u8 = 0b0000_1000;
pub const FLAG_IGNORE_IN_GRID: u8 = 0b0001_0000;
pub const FLAG_ACCESS_RESTRICTED: u8 = 0b0010_0000;

/// Road type marking an edge that never materializes as an edge-based node.
pub const PSEUDO_ROAD_TYPE: i16 = i16::MAX;

/// Per-edge payload. `#[repr(C)]`, 16 bytes, identical in memory and in
/// the published edge array, so store readers can reinterpret it in place.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromZeroes, FromBytes, AsBytes)]
pub struct EdgeData {
    /// Travel weight, clamped to >= 1 at construction (zero-weight cycles
    /// would break downstream searches).
    pub distance: u32,
    /// Street name id; continuity of this id is a contraction condition.
    pub name_id: u32,
    /// Assigned by the contraction pass; dense over remaining edges.
    pub edge_based_node_id: u32,
    pub road_type: i16,
    pub flags: u8,
    pub reserved: u8,
}

impl EdgeData {
    #[inline]
    pub fn is_forward(&self) -> bool {
        self.flags & FLAG_FORWARD != 0
    }

    #[inline]
    pub fn is_backward(&self) -> bool {
        self.flags & FLAG_BACKWARD != 0
    }

    #[inline]
    pub fn is_shortcut(&self) -> bool {
        self.flags & FLAG_SHORTCUT != 0
    }

    #[inline]
    pub fn is_roundabout(&self) -> bool {
        self.flags & FLAG_ROUNDABOUT != 0
    }

    #[inline]
    pub fn ignore_in_grid(&self) -> bool {
        self.flags & FLAG_IGNORE_IN_GRID != 0
    }

    #[inline]
    pub fn is_access_restricted(&self) -> bool {
        self.flags & FLAG_ACCESS_RESTRICTED != 0
    }

    #[inline]
    pub fn set_flag(&mut self, flag: u8, value: bool) {
        if value {
            self.flags |= flag;
        } else {
            self.flags &= !flag;
        }
    }
}

/// A raw input edge from the upstream extraction stage, still carrying
/// its travel-direction annotation.
#[derive(Debug, Clone, Copy)]
pub struct InputEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub weight: u32,
    pub forward: bool,
    pub backward: bool,
    pub roundabout: bool,
    pub ignore_in_grid: bool,
    pub access_restricted: bool,
    pub name_id: u32,
    pub road_type: i16,
}

impl InputEdge {
    /// Convenience constructor for a plain bidirectional edge.
    pub fn bidirectional(source: NodeId, target: NodeId, weight: u32, name_id: u32) -> Self {
        Self {
            source,
            target,
            weight,
            forward: true,
            backward: true,
            roundabout: false,
            ignore_in_grid: false,
            access_restricted: false,
            name_id,
            road_type: 3,
        }
    }
}

/// A directed edge of the node-based graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectedEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub data: EdgeData,
}

/// Expand direction-annotated raw edges into directed edges.
///
/// A forward-only or backward-only input yields exactly one directed edge
/// oriented along its travel direction; a bidirectional input yields both
/// directions, each with the forward/backward flags swapped so the flags
/// describe travel along that directed edge. Self-loops are dropped and
/// weights clamped to >= 1. The result is sorted by (source, target).
pub fn expand_input_edges(input_edges: &[InputEdge]) -> Vec<DirectedEdge> {
    let mut edges = Vec::with_capacity(2 * input_edges.len());

    for input in input_edges {
        let (source, target, forward, backward) = if !input.forward {
            // Backward-only: orient along the permitted direction.
            (input.target, input.source, input.backward, input.forward)
        } else {
            (input.source, input.target, input.forward, input.backward)
        };
        if source == target {
            continue;
        }

        let mut data = EdgeData {
            distance: input.weight.max(1),
            name_id: input.name_id,
            edge_based_node_id: 0,
            road_type: input.road_type,
            flags: 0,
            reserved: 0,
        };
        data.set_flag(FLAG_FORWARD, forward);
        data.set_flag(FLAG_BACKWARD, backward);
        data.set_flag(FLAG_ROUNDABOUT, input.roundabout);
        data.set_flag(FLAG_IGNORE_IN_GRID, input.ignore_in_grid);
        data.set_flag(FLAG_ACCESS_RESTRICTED, input.access_restricted);

        edges.push(DirectedEdge {
            source,
            target,
            data,
        });

        if data.is_backward() && input.forward {
            // Bidirectional: emit the reverse direction as well.
            let mut reverse = data;
            reverse.set_flag(FLAG_FORWARD, input.backward);
            reverse.set_flag(FLAG_BACKWARD, input.forward);
            edges.push(DirectedEdge {
                source: target,
                target: source,
                data: reverse,
            });
        }
    }

    edges.sort_by_key(|edge| (edge.source, edge.target));
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_data_is_16_bytes() {
        assert_eq!(std::mem::size_of::<EdgeData>(), 16);
    }

    #[test]
    fn bidirectional_input_yields_both_directions() {
        let edges = expand_input_edges(&[InputEdge::bidirectional(3, 1, 10, 7)]);
        assert_eq!(edges.len(), 2);
        // Sorted by (source, target).
        assert_eq!((edges[0].source, edges[0].target), (1, 3));
        assert_eq!((edges[1].source, edges[1].target), (3, 1));
        for edge in &edges {
            assert!(edge.data.is_forward());
            assert!(edge.data.is_backward());
            assert_eq!(edge.data.distance, 10);
            assert_eq!(edge.data.name_id, 7);
        }
    }

    #[test]
    fn oneway_inputs_yield_one_oriented_edge() {
        let mut forward_only = InputEdge::bidirectional(0, 1, 5, 0);
        forward_only.backward = false;
        let mut backward_only = InputEdge::bidirectional(2, 3, 5, 0);
        backward_only.forward = false;

        let edges = expand_input_edges(&[forward_only, backward_only]);
        assert_eq!(edges.len(), 2);
        assert_eq!((edges[0].source, edges[0].target), (0, 1));
        assert!(edges[0].data.is_forward() && !edges[0].data.is_backward());
        // Backward-only input is re-oriented to its travel direction.
        assert_eq!((edges[1].source, edges[1].target), (3, 2));
        assert!(edges[1].data.is_forward() && !edges[1].data.is_backward());
    }

    #[test]
    fn self_loops_are_dropped_and_weights_clamped() {
        let loop_edge = InputEdge::bidirectional(4, 4, 10, 0);
        let zero_weight = InputEdge::bidirectional(0, 1, 0, 0);
        let edges = expand_input_edges(&[loop_edge, zero_weight]);
        assert_eq!(edges.len(), 2);
        assert!(edges.iter().all(|e| e.data.distance == 1));
    }
}
