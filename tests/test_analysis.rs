/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::Result;
use hyperball::analysis::compare;
use hyperball::distribution::DistanceDistribution;

fn distribution(counts: &[(usize, i64)]) -> DistanceDistribution {
    let mut dist = DistanceDistribution::new();
    for &(distance, count) in counts {
        dist.increase(distance, count);
    }
    dist
}

#[test]
fn test_per_distance_errors() -> Result<()> {
    let exact = distribution(&[(1, 90), (2, 10)]);
    let approximate = distribution(&[(1, 80), (2, 12)]);

    let report = compare(&exact, &approximate)?;
    assert_eq!(report.per_distance.len(), 2);

    let first = &report.per_distance[0];
    assert_eq!(first.distance, 1);
    assert_eq!(first.exact, 90);
    assert_eq!(first.approximate, 80);
    assert!((first.relative_error.unwrap() - (-10.0 / 90.0)).abs() < 1E-12);

    let second = &report.per_distance[1];
    assert!((second.relative_error.unwrap() - 0.2).abs() < 1E-12);

    // Opposite signs must not cancel: |−10| + |2| = 12 over 100 pairs.
    assert_eq!(report.total_absolute_difference, 12);
    assert!((report.aggregate_relative_error - 0.12).abs() < 1E-12);
    assert_eq!(report.undefined_distances, 0);
    Ok(())
}

#[test]
fn test_identical_distributions() -> Result<()> {
    let exact = distribution(&[(1, 30), (2, 12), (3, 5)]);
    let report = compare(&exact, &exact.clone())?;
    assert_eq!(report.total_absolute_difference, 0);
    assert_eq!(report.aggregate_relative_error, 0.0);
    assert!(report
        .per_distance
        .iter()
        .all(|error| error.relative_error == Some(0.0)));
    Ok(())
}

#[test]
fn test_spurious_distance_is_undefined() -> Result<()> {
    // The approximation observes distance 3, the exact baseline does not.
    let exact = distribution(&[(1, 50), (2, 20)]);
    let approximate = distribution(&[(1, 50), (2, 18), (3, 4)]);

    let report = compare(&exact, &approximate)?;
    assert_eq!(report.undefined_distances, 1);

    let spurious = &report.per_distance[2];
    assert_eq!(spurious.distance, 3);
    assert_eq!(spurious.exact, 0);
    assert_eq!(spurious.relative_error, None);

    // The spurious pairs still count toward the aggregate.
    assert_eq!(report.total_absolute_difference, 6);
    assert!((report.aggregate_relative_error - 6.0 / 70.0).abs() < 1E-12);
    Ok(())
}

#[test]
fn test_empty_inputs_fail() {
    let empty = DistanceDistribution::new();
    let nonempty = distribution(&[(1, 1)]);
    assert!(compare(&empty, &nonempty).is_err());
    assert!(compare(&nonempty, &empty).is_err());
    assert!(compare(&empty, &empty).is_err());
}

#[test]
fn test_report_display() -> Result<()> {
    let exact = distribution(&[(1, 90), (2, 10)]);
    let approximate = distribution(&[(1, 85), (3, 2)]);
    let table = compare(&exact, &approximate)?.to_string();
    assert!(table.contains("undefined"));
    assert!(table.contains("Aggregate relative error"));
    Ok(())
}
