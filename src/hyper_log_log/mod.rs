/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! HyperLogLog cardinality estimation.
//!
//! This module follows the usual split between *counter logic* and *counter
//! backends*: a [`HyperLogLog`] instance owns the configuration (number of
//! registers, fingerprint width, bias-correction constant, hasher) and
//! operates on raw register slices, while the storage of the registers is
//! provided either by an owned [`HyperLogLogCounter`] or by a
//! [`CounterArray`] packing one register block per graph node into a single
//! contiguous buffer.
//!
//! A counter approximates the set of all fingerprints ever added to it,
//! directly or through [unions](HyperLogLog::merge); registers only ever
//! increase, and union is commutative, idempotent, and monotone, which is
//! what makes the counters usable in fixed-point computations such as
//! [HyperBall](crate::distances::hyperball::HyperBall).
//!
//! # Examples
//!
//! ```
//! use hyperball::hyper_log_log::{FingerprintWidth, HyperLogLog, HyperLogLogCounter};
//!
//! # fn main() -> anyhow::Result<()> {
//! let logic = HyperLogLog::new(6, FingerprintWidth::W64)?;
//! let mut counter = HyperLogLogCounter::new(logic);
//! for i in 0..1000 {
//!     counter.add(i);
//! }
//! let estimate = counter.estimate_cardinality();
//! assert!((estimate - 1000.0).abs() / 1000.0 < 0.5);
//! # Ok(())
//! # }
//! ```

mod array;
mod counter;

pub use array::CounterArray;
pub use counter::HyperLogLogCounter;

use anyhow::{Result, ensure};
use kahan::KahanSum;
use std::fmt;
use std::hash::{BuildHasher, BuildHasherDefault, DefaultHasher};

/// The width in bits of the fingerprints fed to the registers.
///
/// The original HyperLogLog paper works with 32-bit hashes; 64-bit
/// fingerprints postpone the large-range saturation of the fingerprint space
/// and are the sensible choice for graphs beyond a few hundred million
/// nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FingerprintWidth {
    /// 32-bit fingerprints.
    W32,
    /// 64-bit fingerprints.
    W64,
}

impl FingerprintWidth {
    /// Returns the number of bits of a fingerprint.
    pub fn bits(self) -> u32 {
        match self {
            FingerprintWidth::W32 => 32,
            FingerprintWidth::W64 => 64,
        }
    }
}

impl fmt::Display for FingerprintWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

/// HyperLogLog counter logic.
///
/// The logic is cheap to clone and operates on raw register slices of length
/// [`num_registers`](Self::num_registers); it does not own any register. A
/// fingerprint is split into its top `b` bits, selecting a register, and the
/// remaining `w − b` bits, whose number of leading zeros (plus one) is the
/// rank stored in the register. Zero is reserved for untouched registers, so
/// the minimum stored rank is one.
#[derive(Debug, Clone)]
pub struct HyperLogLog {
    /// The base-2 logarithm of the number of registers.
    b: u32,
    /// The number of registers, 2^b.
    num_registers: usize,
    /// α_m · m², the bias-corrected scaling factor of the raw estimator.
    alpha_m2: f64,
    width: FingerprintWidth,
    build_hasher: BuildHasherDefault<DefaultHasher>,
}

impl PartialEq for HyperLogLog {
    fn eq(&self, other: &Self) -> bool {
        // The hasher is stateless, so configuration equality is logic
        // equality.
        self.b == other.b && self.width == other.width
    }
}

impl Eq for HyperLogLog {}

impl HyperLogLog {
    /// Creates a new counter logic with `2^b` registers on fingerprints of
    /// the given width.
    ///
    /// # Errors
    ///
    /// If `b` is zero or leaves no fingerprint bits for the rank (i.e., if
    /// `b ≥ width`).
    pub fn new(b: u32, width: FingerprintWidth) -> Result<Self> {
        ensure!(b >= 1, "the register index must use at least one bit");
        ensure!(
            b < width.bits(),
            "a register index of {b} bits leaves no room for the rank in a {width}-bit fingerprint"
        );
        let num_registers = 1_usize << b;
        Ok(Self {
            b,
            num_registers,
            // m² in floating point: the usize product would overflow for
            // b ≥ 32.
            alpha_m2: Self::alpha(num_registers)
                * (num_registers as f64)
                * (num_registers as f64),
            width,
            build_hasher: BuildHasherDefault::default(),
        })
    }

    /// The bias-correction constant α_m.
    ///
    /// Closed-form values for small register counts, and the asymptotic
    /// formula from Flajolet, Fusy, Gandouet, and Meunier, “HyperLogLog: the
    /// analysis of a near-optimal cardinality estimation algorithm”,
    /// otherwise.
    fn alpha(num_registers: usize) -> f64 {
        match num_registers {
            16 => 0.673,
            32 => 0.697,
            64 => 0.709,
            _ => 0.7213 / (1.0 + 1.079 / num_registers as f64),
        }
    }

    /// Returns the number of registers per counter.
    pub fn num_registers(&self) -> usize {
        self.num_registers
    }

    /// Returns the width of the fingerprints this logic splits.
    pub fn width(&self) -> FingerprintWidth {
        self.width
    }

    /// Returns the expected relative standard deviation of the estimator,
    /// ≈ 1.04/√m.
    pub fn rel_std_dev(&self) -> f64 {
        1.04 / (self.num_registers as f64).sqrt()
    }

    /// Maps an item to a fingerprint with approximately uniform bit
    /// distribution, stable across calls with the same input.
    ///
    /// For 32-bit widths the fingerprint is the high half of the 64-bit
    /// hash, returned in the low 32 bits of the result.
    pub fn fingerprint(&self, item: usize) -> u64 {
        let hash = self.build_hasher.hash_one(item);
        match self.width {
            FingerprintWidth::W32 => hash >> 32,
            FingerprintWidth::W64 => hash,
        }
    }

    /// Hashes `item` and adds its fingerprint to the given registers.
    ///
    /// Returns whether a register changed.
    pub fn add(&self, registers: &mut [u8], item: usize) -> bool {
        self.add_fingerprint(registers, self.fingerprint(item))
    }

    /// Adds a fingerprint to the given registers.
    ///
    /// Returns whether a register changed.
    pub fn add_fingerprint(&self, registers: &mut [u8], fingerprint: u64) -> bool {
        debug_assert_eq!(registers.len(), self.num_registers);
        let width = self.width.bits();
        let index = (fingerprint >> (width - self.b)) as usize;
        // Align the w − b non-index bits with the top of a 64-bit word; the
        // rank cannot exceed w − b + 1 even when they are all zero.
        let rest = fingerprint << (64 - width + self.b);
        let rank = (rest.leading_zeros().min(width - self.b) + 1) as u8;
        if rank > registers[index] {
            registers[index] = rank;
            true
        } else {
            false
        }
    }

    /// Takes the register-wise maximum of `registers` and `other`, storing
    /// it in `registers`.
    ///
    /// This operation models exactly the union of the represented sets.
    /// Returns whether a register changed.
    pub fn merge(&self, registers: &mut [u8], other: &[u8]) -> bool {
        debug_assert_eq!(registers.len(), self.num_registers);
        debug_assert_eq!(other.len(), self.num_registers);
        let mut changed = false;
        for (register, &other_register) in registers.iter_mut().zip(other) {
            if other_register > *register {
                *register = other_register;
                changed = true;
            }
        }
        changed
    }

    /// Estimates the number of distinct fingerprints added to the given
    /// registers.
    ///
    /// The harmonic mean of the registers gives the raw estimate
    /// `E = α_m·m²/Σ 2^(−reg[i])`; the sum mixes terms whose magnitudes can
    /// differ by dozens of binary orders, so it is accumulated with Kahan
    /// compensation. `E` is then range-corrected: below (5/2)m the
    /// linear-counting estimator `m·ln(m/V)` over the `V` zero registers is
    /// used (unless `V = 0`, in which case `E` stands), and close to the
    /// fingerprint space size 2^w the saturation correction
    /// `−2^w·ln(1 − E/2^w)` applies.
    pub fn estimate(&self, registers: &[u8]) -> f64 {
        debug_assert_eq!(registers.len(), self.num_registers);
        let m = self.num_registers as f64;

        let mut harmonic_sum = KahanSum::new_with_value(0.0_f64);
        let mut zero_registers = 0_usize;
        for &register in registers {
            if register == 0 {
                zero_registers += 1;
            }
            harmonic_sum += (-(register as f64)).exp2();
        }

        let estimate = self.alpha_m2 / harmonic_sum.sum();
        let fingerprint_space = (self.width.bits() as f64).exp2();

        if estimate < 2.5 * m {
            if zero_registers == 0 {
                estimate
            } else {
                m * (m / zero_registers as f64).ln()
            }
        } else if estimate <= fingerprint_space / 30.0 {
            estimate
        } else {
            -fingerprint_space * (1.0 - estimate / fingerprint_space).ln()
        }
    }
}

impl fmt::Display for HyperLogLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HyperLogLog with 2^{} registers on {}-bit fingerprints (rel. std. dev. {:.2}%)",
            self.b,
            self.width,
            self.rel_std_dev() * 100.0
        )
    }
}
