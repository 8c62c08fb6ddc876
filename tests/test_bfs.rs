/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use dsi_progress_logger::no_logging;
use hyperball::distances::bfs::BfsTraversal;
use hyperball::distribution::DistanceDistribution;
use webgraph::graphs::vec_graph::VecGraph;

fn complete_graph(n: usize) -> VecGraph {
    let mut arcs = Vec::new();
    for u in 0..n {
        for v in 0..n {
            if u != v {
                arcs.push((u, v));
            }
        }
    }
    VecGraph::from_arcs(arcs)
}

fn directed_cycle(n: usize) -> VecGraph {
    VecGraph::from_arcs((0..n).map(|u| (u, (u + 1) % n)))
}

fn distribution(graph: &VecGraph) -> DistanceDistribution {
    BfsTraversal::new(graph).distance_distribution(no_logging![])
}

#[test]
fn test_complete_graph() {
    // Every ordered pair is at distance 1.
    let dist = distribution(&complete_graph(10));
    assert_eq!(dist.value(1), 90);
    assert_eq!(dist.len(), 1);
    assert_eq!(dist.total(), 90);
}

#[test]
fn test_directed_cycle() {
    // From every node there is exactly one node at each distance 1..n − 1.
    let dist = distribution(&directed_cycle(10));
    for distance in 1..10 {
        assert_eq!(dist.value(distance), 10);
    }
    assert_eq!(dist.total(), 90);
}

#[test]
fn test_directed_path() {
    let dist = distribution(&VecGraph::from_arcs([(0, 1), (1, 2), (2, 3)]));
    assert_eq!(dist.value(1), 3);
    assert_eq!(dist.value(2), 2);
    assert_eq!(dist.value(3), 1);
    assert_eq!(dist.total(), 6);
}

#[test]
fn test_out_star() {
    // Arcs are directed: the leaves reach nothing.
    let dist = distribution(&VecGraph::from_arcs((1..=5).map(|leaf| (0, leaf))));
    assert_eq!(dist.value(1), 5);
    assert_eq!(dist.total(), 5);
}

#[test]
fn test_shortest_path_wins() {
    // Node 3 is reachable both directly and through 1 → 2; only the direct
    // arc counts.
    let dist = distribution(&VecGraph::from_arcs([(0, 1), (1, 2), (2, 3), (0, 3)]));
    assert_eq!(dist.value(1), 4);
    assert_eq!(dist.value(2), 2);
    assert_eq!(dist.value(3), 0);
    assert_eq!(dist.total(), 6);
}

#[test]
fn test_no_arcs() {
    let dist = distribution(&VecGraph::empty(7));
    assert!(dist.is_empty());
    assert_eq!(dist.total(), 0);
}

#[test]
fn test_empty_graph() {
    let dist = distribution(&VecGraph::new());
    assert!(dist.is_empty());
}

#[test]
fn test_self_loops_are_ignored() {
    // A self loop never yields a first discovery at positive distance.
    let dist = distribution(&VecGraph::from_arcs([(0, 0), (0, 1), (1, 1)]));
    assert_eq!(dist.value(1), 1);
    assert_eq!(dist.total(), 1);
}
