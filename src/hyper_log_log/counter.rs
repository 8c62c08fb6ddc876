/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::HyperLogLog;

/// An owned HyperLogLog counter: a [logic](HyperLogLog) together with its
/// register block.
///
/// Cloning a counter yields an independent copy; mutating the copy never
/// affects the original. For one counter per graph node, use a
/// [`CounterArray`](super::CounterArray) instead of a vector of owned
/// counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyperLogLogCounter {
    logic: HyperLogLog,
    registers: Box<[u8]>,
}

impl HyperLogLogCounter {
    /// Creates an empty counter (all registers zero) using the given logic.
    pub fn new(logic: HyperLogLog) -> Self {
        let registers = vec![0; logic.num_registers()].into_boxed_slice();
        Self { logic, registers }
    }

    /// Returns the logic of this counter.
    pub fn logic(&self) -> &HyperLogLog {
        &self.logic
    }

    /// Hashes `item` and adds its fingerprint to this counter.
    ///
    /// Returns whether a register changed; callers can use the returned
    /// value to detect that a counter has reached a fixed point.
    pub fn add(&mut self, item: usize) -> bool {
        self.logic.add(&mut self.registers, item)
    }

    /// Adds an already-computed fingerprint to this counter.
    ///
    /// Returns whether a register changed.
    pub fn add_fingerprint(&mut self, fingerprint: u64) -> bool {
        self.logic.add_fingerprint(&mut self.registers, fingerprint)
    }

    /// Unions `other` into this counter by taking register-wise maxima.
    ///
    /// Returns whether a register changed.
    ///
    /// # Panics
    ///
    /// If the two counters were built with incompatible logics.
    pub fn union(&mut self, other: &Self) -> bool {
        assert!(
            self.logic == other.logic,
            "incompatible counter logics: {} and {}",
            self.logic,
            other.logic
        );
        self.logic.merge(&mut self.registers, &other.registers)
    }

    /// Estimates the number of distinct items added to this counter,
    /// directly or through unions.
    pub fn estimate_cardinality(&self) -> f64 {
        self.logic.estimate(&self.registers)
    }

    /// Returns the value of the register of given index.
    pub fn register(&self, index: usize) -> u8 {
        self.registers[index]
    }

    /// Returns the registers of this counter.
    pub fn registers(&self) -> &[u8] {
        &self.registers
    }
}
