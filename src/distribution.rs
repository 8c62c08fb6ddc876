/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The distance distribution of a graph and its derived statistics.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// A sparse mapping from distance to the number of ordered node pairs at
/// that distance.
///
/// Distances that were never observed are absent and read as zero. Counts
/// are signed: approximate algorithms can produce small negative deltas out
/// of pure estimation noise, and these are accumulated as-is — clamping
/// would bias the aggregate — with a warning when a cumulative count turns
/// negative.
///
/// The statistics ([`mean`](Self::mean), [`variance`](Self::variance),
/// [`dispersion_index`](Self::dispersion_index)) treat the distribution as a
/// discrete random variable with probability mass `count(d)/total` and are
/// meaningful only for non-empty distributions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceDistribution {
    counts: BTreeMap<usize, i64>,
}

impl DistanceDistribution {
    /// Creates an empty distribution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments by one the number of pairs at the given distance.
    pub fn increment(&mut self, distance: usize) {
        *self.counts.entry(distance).or_insert(0) += 1;
    }

    /// Increases by `delta`, which may be negative, the number of pairs at
    /// the given distance.
    ///
    /// A zero delta at an unobserved distance is a no-op, so distances never
    /// actually observed do not appear as keys.
    pub fn increase(&mut self, distance: usize, delta: i64) {
        if delta == 0 && !self.counts.contains_key(&distance) {
            return;
        }
        let count = self.counts.entry(distance).or_insert(0);
        *count += delta;
        if *count < 0 {
            log::warn!(
                "Negative pair count {count} at distance {distance} after an increase of {delta}"
            );
        }
    }

    /// Returns the number of pairs at the given distance, zero if the
    /// distance was never observed.
    pub fn value(&self, distance: usize) -> i64 {
        self.counts.get(&distance).copied().unwrap_or(0)
    }

    /// Returns the total number of pairs over all distances.
    pub fn total(&self) -> i64 {
        self.counts.values().sum()
    }

    /// Returns the number of observed distances.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns whether no distance was ever observed.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Returns an iterator over the observed distances, in increasing order.
    pub fn distances(&self) -> impl Iterator<Item = usize> + '_ {
        self.counts.keys().copied()
    }

    /// Returns an iterator over (distance, pairs), in increasing order of
    /// distance.
    pub fn iter(&self) -> impl Iterator<Item = (usize, i64)> + '_ {
        self.counts.iter().map(|(&distance, &count)| (distance, count))
    }

    /// Returns the probability mass function of the distribution.
    pub fn probability_mass(&self) -> BTreeMap<usize, f64> {
        let total = self.total() as f64;
        self.counts
            .iter()
            .map(|(&distance, &count)| (distance, count as f64 / total))
            .collect()
    }

    /// Returns the mean distance, Σ d·P(d).
    pub fn mean(&self) -> f64 {
        self.probability_mass()
            .iter()
            .map(|(&distance, &probability)| distance as f64 * probability)
            .sum()
    }

    /// Returns the variance of the distance, Σ d²·P(d) − mean².
    pub fn variance(&self) -> f64 {
        let mean = self.mean();
        self.probability_mass()
            .iter()
            .map(|(&distance, &probability)| (distance * distance) as f64 * probability)
            .sum::<f64>()
            - mean * mean
    }

    /// Returns the dispersion index (variance over mean), also known as
    /// spid.
    ///
    /// A dispersion index smaller than one marks the distribution as
    /// sub-Poissonian, which is typical of proper web graphs.
    pub fn dispersion_index(&self) -> f64 {
        self.variance() / self.mean()
    }

    /// Stores the distribution at the given path as JSON.
    pub fn store(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Could not create {}", path.display()))?;
        serde_json::to_writer(BufWriter::new(file), self)
            .with_context(|| format!("Could not store distribution at {}", path.display()))?;
        Ok(())
    }

    /// Loads a distribution stored with [`store`](Self::store).
    ///
    /// For every distribution `d`, `load(store(d)) == d`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file =
            File::open(path).with_context(|| format!("Could not open {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Could not load distribution from {}", path.display()))
    }
}

impl fmt::Display for DistanceDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>10} {:>20}", "distance", "pairs")?;
        for (distance, count) in self.iter() {
            writeln!(f, "{distance:>10} {count:>20}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_zero_increase_leaves_no_key() {
        let mut dist = DistanceDistribution::new();
        dist.increase(3, 0);
        assert!(dist.is_empty());
        assert_eq!(dist.value(3), 0);

        dist.increase(3, 5);
        dist.increase(3, 0);
        assert_eq!(dist.len(), 1);
        assert_eq!(dist.value(3), 5);
    }

    #[test]
    fn test_negative_deltas_accumulate() {
        let mut dist = DistanceDistribution::new();
        dist.increase(1, 10);
        dist.increase(1, -3);
        dist.increase(2, -2);
        assert_eq!(dist.value(1), 7);
        assert_eq!(dist.value(2), -2);
        assert_eq!(dist.total(), 5);
    }
}
