/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::HyperLogLog;

/// A fixed-size array of HyperLogLog counters sharing one logic, backed by a
/// single contiguous buffer.
///
/// Counter `i` occupies the byte range `i·m..(i + 1)·m`, where `m` is the
/// number of registers per counter. Compared with a vector of owned
/// counters, the arena avoids per-counter allocations and keeps the
/// registers of consecutive nodes adjacent in memory; the whole backing
/// buffer is available through [`as_mut_slice`](Self::as_mut_slice), so
/// parallel algorithms can split it into disjoint per-counter chunks.
#[derive(Debug, Clone)]
pub struct CounterArray {
    len: usize,
    registers_per_counter: usize,
    backend: Box<[u8]>,
}

impl CounterArray {
    /// Allocates `len` empty counters with the given logic.
    pub fn new(logic: &HyperLogLog, len: usize) -> Self {
        let registers_per_counter = logic.num_registers();
        Self {
            len,
            registers_per_counter,
            backend: vec![0; len * registers_per_counter].into_boxed_slice(),
        }
    }

    /// Returns the number of counters.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns whether the array contains no counters.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of registers per counter.
    pub fn registers_per_counter(&self) -> usize {
        self.registers_per_counter
    }

    /// Returns the registers of the counter of given index.
    pub fn registers(&self, index: usize) -> &[u8] {
        let offset = index * self.registers_per_counter;
        &self.backend[offset..offset + self.registers_per_counter]
    }

    /// Returns the registers of the counter of given index, mutably.
    pub fn registers_mut(&mut self, index: usize) -> &mut [u8] {
        let offset = index * self.registers_per_counter;
        &mut self.backend[offset..offset + self.registers_per_counter]
    }

    /// Returns the whole backing buffer, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.backend
    }

    /// Resets all counters to the empty state.
    pub fn clear(&mut self) {
        self.backend.fill(0);
    }
}
