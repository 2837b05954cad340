//! Symbol deduplication: hashing, cardinality estimation, and the
//! concurrent symbol map.

use std::ops::Index;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

use crate::{Error, Result};

/// The symbol-name hash function of the gdb-index format.
///
/// ASCII upper-case letters fold to lower case before mixing, so hashes are
/// case-insensitive for ASCII names. Deliberately matches the debugger's own
/// hash, since it drives the on-disk probe sequence.
pub fn gdb_hash(name: &[u8]) -> u32 {
    let mut h = 0u32;
    for &b in name {
        let c = if b.is_ascii_uppercase() { b + 32 } else { b };
        h = h
            .wrapping_mul(67)
            .wrapping_add(u32::from(c))
            .wrapping_sub(113);
    }
    h
}

// Estimator geometry: the low NBITS of a hash pick a bucket, the leading
// zeros of the rest set its rank.
const NBUCKETS: usize = 2048;
const NBITS: u32 = 11;
const ALPHA: f64 = 0.7213 / (1.0 + 1.079 / 2048.0);

/// A distinct-value estimator over 32 bit hashes.
///
/// The symbol map is allocated once, before any insertion, so its capacity
/// has to come from an estimate of how many distinct symbols the link
/// contains. Per-unit estimators are cheap to fill independently and merge
/// by a register-wise maximum.
#[derive(Debug, Clone)]
pub struct HyperLogLog {
    buckets: [u8; NBUCKETS],
}

impl HyperLogLog {
    /// Construct an empty estimator.
    pub fn new() -> HyperLogLog {
        HyperLogLog {
            buckets: [0; NBUCKETS],
        }
    }

    /// Record one hash observation.
    pub fn insert(&mut self, hash: u32) {
        let idx = hash as usize & (NBUCKETS - 1);
        let rank = (hash << NBITS).leading_zeros() as u8 + 1;
        if self.buckets[idx] < rank {
            self.buckets[idx] = rank;
        }
    }

    /// Fold another estimator's observations into this one.
    pub fn merge(&mut self, other: &HyperLogLog) {
        for (a, &b) in self.buckets.iter_mut().zip(other.buckets.iter()) {
            if *a < b {
                *a = b;
            }
        }
    }

    /// Return the estimated number of distinct hashes observed.
    ///
    /// The raw harmonic-mean estimate is used without a small-range
    /// correction; it only sizes allocations, where an overestimate for
    /// small inputs is harmless.
    pub fn cardinality(&self) -> usize {
        let m = NBUCKETS as f64;
        let z: f64 = self
            .buckets
            .iter()
            .map(|&b| (-f64::from(b)).exp2())
            .sum();
        (ALPHA * m * m / z) as usize
    }
}

impl Default for HyperLogLog {
    fn default() -> HyperLogLog {
        HyperLogLog::new()
    }
}

/// A stable handle to a deduplicated symbol.
///
/// Handles index the map's slot array and stay valid for the map's
/// lifetime, so units can record them while other units keep inserting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolId(u32);

impl SymbolId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A deduplicated symbol, shared by every compilation unit that mentions it.
#[derive(Debug)]
pub struct MapValue<'input> {
    /// The symbol name, without its terminating NUL.
    pub name: &'input [u8],
    /// The gdb-index hash of `name`.
    pub hash: u32,
    /// Occurrences across all compilation units.
    pub count: AtomicU32,
    /// Offset of the name in the constant pool; filled in during layout.
    pub name_offset: AtomicU32,
    /// Offset of the type/CU-index array in the constant pool; filled in
    /// during layout.
    pub type_offset: AtomicU32,
}

impl<'input> MapValue<'input> {
    fn new(name: &'input [u8], hash: u32) -> MapValue<'input> {
        MapValue {
            name,
            hash,
            count: AtomicU32::new(0),
            name_offset: AtomicU32::new(0),
            type_offset: AtomicU32::new(0),
        }
    }
}

/// An insert-only concurrent hash map keyed by `(hash, name)`.
///
/// The slot array is allocated once and never grows. Insertion uses linear
/// probing; each slot is published exactly once, so concurrent callers with
/// equal keys always converge on the same slot.
#[derive(Debug)]
pub struct SymbolMap<'input> {
    slots: Vec<OnceLock<MapValue<'input>>>,
}

impl<'input> SymbolMap<'input> {
    /// Create a map with room for at least `capacity` distinct symbols.
    pub fn with_capacity(capacity: usize) -> SymbolMap<'input> {
        let nslots = capacity.max(16).next_power_of_two();
        let mut slots = Vec::new();
        slots.resize_with(nslots, OnceLock::new);
        SymbolMap { slots }
    }

    /// Insert `(name, hash)` and return its handle.
    ///
    /// The caller is expected to bump the handle's `count` for each
    /// occurrence. Fails only if the map was sized too small for the number
    /// of distinct keys actually inserted.
    pub fn insert(&self, name: &'input [u8], hash: u32) -> Result<SymbolId> {
        let mask = self.slots.len() - 1;
        let mut j = hash as usize & mask;

        for _ in 0..self.slots.len() {
            let value = self.slots[j].get_or_init(|| MapValue::new(name, hash));
            if value.hash == hash && value.name == name {
                return Ok(SymbolId(j as u32));
            }
            j = (j + 1) & mask;
        }
        Err(Error::SymbolMapFull)
    }

    /// Return the handles of every occupied slot, in slot order.
    pub fn ids(&self) -> Vec<SymbolId> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.get().is_some())
            .map(|(j, _)| SymbolId(j as u32))
            .collect()
    }
}

impl<'input> Index<SymbolId> for SymbolMap<'input> {
    type Output = MapValue<'input>;

    fn index(&self, id: SymbolId) -> &MapValue<'input> {
        self.slots[id.index()].get().expect("vacant symbol slot")
    }
}
