/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Comparison of an approximate distance distribution against an exact
//! baseline.

use anyhow::{Result, ensure};
use std::fmt;

use crate::distribution::DistanceDistribution;

/// The error of an approximate pair count at one distance.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceError {
    pub distance: usize,
    pub exact: i64,
    pub approximate: i64,
    /// The signed relative error (approximate − exact)/exact, or `None` when
    /// the exact count is zero, in which case the relative error is
    /// undefined.
    pub relative_error: Option<f64>,
}

/// The outcome of [`compare`].
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorReport {
    /// One entry per distance observed by the approximate distribution, in
    /// increasing order of distance.
    pub per_distance: Vec<DistanceError>,
    /// Σ |approximate − exact| over the observed distances. Absolute values
    /// prevent errors of opposite sign from cancelling out.
    pub total_absolute_difference: i64,
    /// The total absolute difference divided by the exact distribution's
    /// total number of pairs.
    pub aggregate_relative_error: f64,
    /// The number of observed distances at which the exact count is zero and
    /// the relative error is therefore undefined.
    pub undefined_distances: usize,
}

/// Compares an approximate distance distribution against an exact one,
/// computing per-distance and aggregate relative errors.
///
/// The comparison walks the distances observed by the approximate
/// distribution. Distances at which the exact count is zero cannot be given
/// a relative error; they are flagged in the report (and logged) rather than
/// silently producing non-finite values, but they still contribute to the
/// total absolute difference.
///
/// # Errors
///
/// If either distribution is empty.
pub fn compare(
    exact: &DistanceDistribution,
    approximate: &DistanceDistribution,
) -> Result<ErrorReport> {
    ensure!(!exact.is_empty(), "the exact distribution is empty");
    ensure!(
        !approximate.is_empty(),
        "the approximate distribution is empty"
    );

    let mut per_distance = Vec::with_capacity(approximate.len());
    let mut total_absolute_difference = 0;
    let mut undefined_distances = 0;

    for (distance, approximate_count) in approximate.iter() {
        let exact_count = exact.value(distance);
        let difference = approximate_count - exact_count;
        total_absolute_difference += difference.abs();

        let relative_error = if exact_count == 0 {
            log::warn!(
                "No exact pairs at distance {distance}: the relative error there is undefined"
            );
            undefined_distances += 1;
            None
        } else {
            Some(difference as f64 / exact_count as f64)
        };

        per_distance.push(DistanceError {
            distance,
            exact: exact_count,
            approximate: approximate_count,
            relative_error,
        });
    }

    Ok(ErrorReport {
        per_distance,
        total_absolute_difference,
        aggregate_relative_error: total_absolute_difference as f64 / exact.total() as f64,
        undefined_distances,
    })
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>10} {:>20} {:>20} {:>12}",
            "distance", "approximate", "exact", "error"
        )?;
        for error in &self.per_distance {
            match error.relative_error {
                Some(relative_error) => writeln!(
                    f,
                    "{:>10} {:>20} {:>20} {:>11.4}%",
                    error.distance,
                    error.approximate,
                    error.exact,
                    relative_error * 100.0
                )?,
                None => writeln!(
                    f,
                    "{:>10} {:>20} {:>20} {:>12}",
                    error.distance, error.approximate, error.exact, "undefined"
                )?,
            }
        }
        writeln!(
            f,
            "Aggregate relative error: {:.4}%",
            self.aggregate_relative_error * 100.0
        )
    }
}
