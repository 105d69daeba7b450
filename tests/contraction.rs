//! End-to-end contraction scenarios over small synthetic road networks.

use roadgraph::geo::Coordinate;
use roadgraph::nbg::InputEdge;
use roadgraph::{DegreeTwoContractor, SweepMode, INVALID_NODE};

/// A - B - C - D: three bidirectional segments on a straight line, all
/// the same street.
fn chain4() -> (Vec<InputEdge>, Vec<Coordinate>) {
    let edges = vec![
        InputEdge::bidirectional(0, 1, 10, 42),
        InputEdge::bidirectional(1, 2, 10, 42),
        InputEdge::bidirectional(2, 3, 10, 42),
    ];
    let coords = (0..4).map(|i| Coordinate::new(0, 100 * i)).collect();
    (edges, coords)
}

#[test]
fn chain_collapses_to_a_single_bidirectional_edge() {
    let (edges, coords) = chain4();
    let mut contractor = DegreeTwoContractor::new(4, &edges, &[], &[], &[], coords);
    contractor.run(SweepMode::Exhaustive);

    let graph = contractor.graph();
    assert_eq!(graph.out_degree(1), 0);
    assert_eq!(graph.out_degree(2), 0);

    let forward = graph.find_edge(0, 3).expect("merged A->D edge");
    assert_eq!(graph.edge_data(forward).distance, 30);
    let reverse = graph.find_edge(3, 0).expect("merged D->A edge");
    assert_eq!(graph.edge_data(reverse).distance, 30);
    assert_eq!(graph.number_of_edges(), 2);
}

#[test]
fn chain_renumbering_keeps_only_the_endpoints() {
    let (edges, coords) = chain4();
    let mut contractor = DegreeTwoContractor::new(4, &edges, &[], &[], &[], coords);
    contractor.run(SweepMode::Exhaustive);
    let summary = contractor.assign_edge_based_ids();

    assert_eq!(summary.renumbering_table[0], 0);
    assert_eq!(summary.renumbering_table[1], INVALID_NODE);
    assert_eq!(summary.renumbering_table[2], INVALID_NODE);
    assert_eq!(summary.renumbering_table[3], 1);
    assert_eq!(summary.renumbered_nodes, 2);
    assert_eq!(summary.removed_nodes, 2);
    assert_eq!(summary.edge_based_node_count, 2);

    let mut ids: Vec<u32> = summary
        .edge_based_nodes
        .iter()
        .map(|n| n.edge_based_node_id)
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![0, 1]);
}

#[test]
fn single_sweep_leaves_multi_hop_chains_partially_contracted() {
    let (edges, coords) = chain4();
    let mut contractor = DegreeTwoContractor::new(4, &edges, &[], &[], &[], coords);
    let merged = contractor.run(SweepMode::Single);

    // One sweep merges the first eligible interior node per direction;
    // the full A - D edge only appears after another sweep.
    assert!(merged > 0);
    let graph = contractor.graph();
    assert!(graph.find_edge(0, 3).is_none());

    let merged_again = contractor.run(SweepMode::Single);
    assert!(merged_again > 0);
    assert!(contractor.graph().find_edge(0, 3).is_some());
}

#[test]
fn junction_nodes_survive_contraction() {
    // A crossing at node 2: degree 4, never a contraction candidate.
    //        4
    //        |
    // 0 - 1 - 2 - 3
    let edges = vec![
        InputEdge::bidirectional(0, 1, 5, 7),
        InputEdge::bidirectional(1, 2, 5, 7),
        InputEdge::bidirectional(2, 3, 5, 7),
        InputEdge::bidirectional(2, 4, 5, 8),
    ];
    let coords = vec![
        Coordinate::new(0, 0),
        Coordinate::new(0, 100),
        Coordinate::new(0, 200),
        Coordinate::new(0, 300),
        Coordinate::new(100, 200),
    ];
    let mut contractor = DegreeTwoContractor::new(5, &edges, &[], &[], &[], coords);
    contractor.run(SweepMode::Exhaustive);

    let graph = contractor.graph();
    // Node 1 went away, the junction and its spurs stayed.
    assert_eq!(graph.out_degree(1), 0);
    assert_eq!(graph.out_degree(2), 3);
    let through = graph.find_edge(0, 2).expect("merged 0->2 edge");
    assert_eq!(graph.edge_data(through).distance, 10);
    assert!(graph.find_edge(2, 4).is_some());
}
