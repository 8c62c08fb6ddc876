/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Distance distributions of directed graphs.
//!
//! This crate computes, for every integer distance *d*, the number of ordered
//! node pairs (*u*, *v*) whose shortest-path distance is exactly *d*, using
//! two interchangeable algorithms:
//!
//! - [`BfsTraversal`](distances::bfs::BfsTraversal), an exact multi-source
//!   breadth-first traversal, quadratic in the number of nodes and thus
//!   usable only on small graphs;
//! - [`HyperBall`](distances::hyperball::HyperBall), an approximate
//!   fixed-point propagation of [HyperLogLog
//!   counters](hyper_log_log::HyperLogLog) whose cost per iteration is linear
//!   in the number of arcs and whose iteration count is bounded by the
//!   graph's diameter.
//!
//! Both algorithms produce a [`DistanceDistribution`](distribution::DistanceDistribution),
//! which exposes derived statistics (mean, variance, dispersion index) and
//! lossless persistence; [`analysis::compare`] measures an approximate
//! distribution against an exact baseline.
//!
//! Graphs are consumed through the [`webgraph`] random-access traits, so any
//! backend of the WebGraph framework (in-memory
//! [`VecGraph`](webgraph::graphs::vec_graph::VecGraph), compressed
//! [`BvGraph`](webgraph::graphs::bvgraph), …) can be analyzed unchanged.

pub mod analysis;
pub mod distances;
pub mod distribution;
pub mod hyper_log_log;

pub mod prelude {
    pub use crate::analysis::compare;
    pub use crate::distances::bfs::BfsTraversal;
    pub use crate::distances::hyperball::HyperBall;
    pub use crate::distribution::DistanceDistribution;
    pub use crate::hyper_log_log::{FingerprintWidth, HyperLogLog, HyperLogLogCounter};
}
