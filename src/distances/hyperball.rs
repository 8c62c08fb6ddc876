/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::{Result, ensure};
use dsi_progress_logger::ProgressLog;
use rayon::prelude::*;
use webgraph::traits::RandomAccessGraph;

use crate::distribution::DistanceDistribution;
use crate::hyper_log_log::{CounterArray, HyperLogLog};

/// An algorithm that computes an approximation of the distance distribution
/// of a graph by iterated propagation of HyperLogLog counters.
///
/// Every node owns a counter approximating the set of nodes reachable from
/// it within the current radius; the counter is seeded with the node itself,
/// and at iteration *t* every node unions its counter with the counters its
/// successors had at the end of iteration *t* − 1. The growth of the
/// estimated cardinality of a node's counter during iteration *t* thus
/// approximates the number of nodes at distance exactly *t* + 1 from it, and
/// the growths summed over all nodes are accumulated into the distribution.
///
/// Since unions only ever raise registers, the computation reaches a fixed
/// point after at most diameter + 1 iterations, and stops there; an
/// [iteration cap](Self::max_iterations) acts as a safety valve, and runs
/// stopped by it yield a partial distribution, reported by
/// [`completed`](Self::completed) returning false.
///
/// Within an iteration the per-node updates are independent — they read only
/// the previous iteration's counters — so they run in parallel on disjoint
/// blocks of the next counter array; the two arrays are swapped at the
/// iteration boundary. This also makes the result independent of the node
/// processing order.
///
/// Memory is the dominant cost: the two counter arrays take 2·n·m bytes for
/// n nodes and m registers per counter, and no spilling to secondary storage
/// is attempted.
///
/// # Examples
///
/// ```
/// use dsi_progress_logger::no_logging;
/// use hyperball::distances::hyperball::HyperBall;
/// use hyperball::hyper_log_log::{FingerprintWidth, HyperLogLog};
/// use webgraph::graphs::vec_graph::VecGraph;
///
/// # fn main() -> anyhow::Result<()> {
/// let graph = VecGraph::from_arcs([(0, 1), (1, 2), (2, 0)]);
/// let logic = HyperLogLog::new(8, FingerprintWidth::W64)?;
///
/// let mut hyperball = HyperBall::new(&graph, logic);
/// hyperball.run(no_logging![])?;
///
/// assert!(hyperball.completed());
/// // On a directed 3-cycle the counters stabilize within three iterations.
/// assert!(hyperball.iterations() <= 3);
/// assert!(hyperball.distance_distribution()?.total() > 0);
/// # Ok(())
/// # }
/// ```
pub struct HyperBall<'a, G: RandomAccessGraph + Sync> {
    /// The graph to analyze.
    graph: &'a G,
    logic: HyperLogLog,
    /// The counters at the end of the previous iteration.
    curr_state: CounterArray,
    /// The counters being computed by the current iteration.
    next_state: CounterArray,
    max_iterations: usize,
    /// The number of iterations performed by the last run.
    iteration: usize,
    /// Whether the last run reached a fixed point (as opposed to the
    /// iteration cap).
    completed: bool,
    ran: bool,
    distribution: DistanceDistribution,
}

impl<'a, G: RandomAccessGraph + Sync> HyperBall<'a, G> {
    /// Creates a new HyperBall computation over the given graph.
    ///
    /// The logic fixes the accuracy/memory trade-off: `2^b` registers per
    /// node give a relative standard deviation of about 1.04/√2^b on each
    /// counter.
    pub fn new(graph: &'a G, logic: HyperLogLog) -> Self {
        let num_nodes = graph.num_nodes();
        let curr_state = CounterArray::new(&logic, num_nodes);
        let next_state = CounterArray::new(&logic, num_nodes);
        Self {
            graph,
            logic,
            curr_state,
            next_state,
            max_iterations: usize::MAX,
            iteration: 0,
            completed: false,
            ran: false,
            distribution: DistanceDistribution::new(),
        }
    }

    /// Sets an upper bound to the number of iterations.
    ///
    /// Runs stopped by the bound return a partial distribution and report
    /// [`completed`](Self::completed) as false; this is not an error.
    ///
    /// # Panics
    ///
    /// Panics if `max_iterations` is zero.
    pub fn max_iterations(&mut self, max_iterations: usize) -> &mut Self {
        assert!(max_iterations >= 1, "at least one iteration must be allowed");
        self.max_iterations = max_iterations;
        self
    }

    /// Runs HyperBall until the counters stabilize or the iteration cap is
    /// reached.
    pub fn run(&mut self, pl: &mut impl ProgressLog) -> Result<()> {
        let num_nodes = self.graph.num_nodes();

        self.iteration = 0;
        self.completed = false;
        self.distribution = DistanceDistribution::new();

        if num_nodes == 0 {
            self.completed = true;
            self.ran = true;
            return Ok(());
        }

        log::info!("Using counter logic: {}", self.logic);

        self.curr_state.clear();
        self.next_state.clear();
        for node in 0..num_nodes {
            self.logic.add(self.curr_state.registers_mut(node), node);
        }

        // No finite distance exceeds num_nodes − 1, so even an unbounded run
        // performs at most num_nodes iterations.
        let upper_bound = self.max_iterations.min(num_nodes);

        pl.item_name("iteration");
        pl.expected_updates(None);
        pl.start(format!(
            "Running HyperBall for a maximum of {upper_bound} iterations"
        ));

        loop {
            let (modified_counters, delta) = self.iterate();

            // The total growth of the counters' cardinalities during
            // iteration t estimates the number of pairs at distance t + 1.
            self.distribution.increase(self.iteration + 1, delta);
            std::mem::swap(&mut self.curr_state, &mut self.next_state);
            self.iteration += 1;

            pl.update();
            pl.info(format_args!(
                "Modified counters: {}/{} ({:.3}%)",
                modified_counters,
                num_nodes,
                (modified_counters as f64 / num_nodes as f64) * 100.0
            ));

            if modified_counters == 0 {
                pl.info(format_args!(
                    "Terminating after {} iteration(s) by stabilization",
                    self.iteration
                ));
                self.completed = true;
                break;
            }

            if self.iteration >= upper_bound {
                log::warn!(
                    "Iteration limit ({upper_bound}) reached before a fixed point: the distance distribution is partial"
                );
                break;
            }
        }

        pl.done();
        self.ran = true;
        Ok(())
    }

    /// Performs one iteration, returning the number of modified counters and
    /// the total truncated-cardinality growth.
    fn iterate(&mut self) -> (u64, i64) {
        let graph = self.graph;
        let logic = &self.logic;
        let curr_state = &self.curr_state;
        let registers_per_counter = curr_state.registers_per_counter();

        self.next_state
            .as_mut_slice()
            .par_chunks_mut(registers_per_counter)
            .enumerate()
            .map(|(node, next_counter)| {
                next_counter.copy_from_slice(curr_state.registers(node));
                let mut counter_modified = false;
                for succ in graph.successors(node) {
                    if succ != node {
                        counter_modified |= logic.merge(next_counter, curr_state.registers(succ));
                    }
                }
                if counter_modified {
                    // Estimates are truncated to integers before
                    // differencing, matching the distribution's integer pair
                    // counts; the difference can be negative out of pure
                    // estimator noise.
                    let pre = logic.estimate(curr_state.registers(node)) as i64;
                    let post = logic.estimate(next_counter) as i64;
                    (1, post - pre)
                } else {
                    (0, 0)
                }
            })
            .reduce(
                || (0, 0),
                |(modified_0, delta_0), (modified_1, delta_1)| {
                    (modified_0 + modified_1, delta_0 + delta_1)
                },
            )
    }

    fn ensure_run(&self) -> Result<()> {
        ensure!(
            self.ran,
            "HyperBall was not run. Please call HyperBall::run before accessing computed fields"
        );
        Ok(())
    }

    /// Returns the approximate distance distribution computed by the last
    /// run.
    pub fn distance_distribution(&self) -> Result<&DistanceDistribution> {
        self.ensure_run()?;
        Ok(&self.distribution)
    }

    /// Returns the number of iterations performed by the last run.
    pub fn iterations(&self) -> usize {
        self.iteration
    }

    /// Returns whether the last run reached a fixed point, rather than being
    /// stopped by the [iteration cap](Self::max_iterations).
    pub fn completed(&self) -> bool {
        self.completed
    }

    /// Estimates the number of nodes reachable from the given node.
    pub fn reachable_nodes_from(&self, node: usize) -> Result<f64> {
        self.ensure_run()?;
        Ok(self.logic.estimate(self.curr_state.registers(node)))
    }

    /// Estimates the number of nodes reachable from every node of the
    /// graph.
    ///
    /// `hyperball.reachable_nodes().unwrap()[i]` is equal to
    /// `hyperball.reachable_nodes_from(i).unwrap()`.
    pub fn reachable_nodes(&self) -> Result<Vec<f64>> {
        self.ensure_run()?;
        Ok((0..self.graph.num_nodes())
            .map(|node| self.logic.estimate(self.curr_state.registers(node)))
            .collect())
    }
}
