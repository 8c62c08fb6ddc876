/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use dsi_progress_logger::ProgressLog;
use std::collections::VecDeque;
use sux::bits::BitVec;
use webgraph::traits::RandomAccessGraph;

use crate::distribution::DistanceDistribution;

/// Computes the exact distance distribution of a graph by running one
/// breadth-first visit per node.
///
/// Every node first discovered at distance *d* > 0 from a source increments
/// the distribution at *d* by one; ties between equal-length shortest paths
/// are irrelevant, since only the first discovery counts.
///
/// The visit queue stores (node, distance) pairs and the visited set is
/// reused across sources, so the only per-source cost is refilling the bit
/// vector. The overall cost is O(n·(n + m)) for n nodes and m arcs, which
/// makes this algorithm impractical much beyond 10 000 nodes — estimating
/// the distribution with [`HyperBall`](crate::distances::hyperball::HyperBall)
/// is the alternative on larger graphs, and this algorithm is the exact
/// baseline to validate it against.
///
/// # Examples
///
/// ```
/// use dsi_progress_logger::no_logging;
/// use hyperball::distances::bfs::BfsTraversal;
/// use webgraph::graphs::vec_graph::VecGraph;
///
/// // A directed 3-cycle: every node sees one node at distance 1 and one at
/// // distance 2.
/// let graph = VecGraph::from_arcs([(0, 1), (1, 2), (2, 0)]);
/// let dist = BfsTraversal::new(&graph).distance_distribution(no_logging![]);
///
/// assert_eq!(dist.value(1), 3);
/// assert_eq!(dist.value(2), 3);
/// assert_eq!(dist.total(), 6);
/// ```
pub struct BfsTraversal<'a, G: RandomAccessGraph> {
    graph: &'a G,
    visited: BitVec,
    queue: VecDeque<(usize, usize)>,
}

impl<'a, G: RandomAccessGraph> BfsTraversal<'a, G> {
    /// Creates a new traversal over the given graph.
    pub fn new(graph: &'a G) -> Self {
        let num_nodes = graph.num_nodes();
        Self {
            graph,
            visited: BitVec::new(num_nodes),
            queue: VecDeque::new(),
        }
    }

    /// Computes the exact distance distribution of the graph.
    pub fn distance_distribution(&mut self, pl: &mut impl ProgressLog) -> DistanceDistribution {
        let mut distribution = DistanceDistribution::new();

        pl.item_name("node");
        pl.expected_updates(Some(self.graph.num_nodes()));
        pl.start("Visiting the graph from every node...");

        for source in 0..self.graph.num_nodes() {
            self.single_source(source, &mut distribution);
            pl.light_update();
        }

        pl.done();
        distribution
    }

    /// Accumulates into `distribution` the distances of all nodes reachable
    /// from `source`.
    fn single_source(&mut self, source: usize, distribution: &mut DistanceDistribution) {
        self.visited.fill(false);
        self.queue.clear();

        self.visited.set(source, true);
        self.queue.push_back((source, 0));

        while let Some((node, distance)) = self.queue.pop_front() {
            for succ in self.graph.successors(node) {
                if !self.visited[succ] {
                    self.visited.set(succ, true);
                    distribution.increment(distance + 1);
                    self.queue.push_back((succ, distance + 1));
                }
            }
        }
    }
}
