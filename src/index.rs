//! Layout and emission of the `.gdb_index` payload.
//!
//! The on-disk format is fixed by the debugger: a 24 byte header, the CU
//! list, the address areas, an open-addressed symbol hash table, and a
//! constant pool holding per-symbol CU-index arrays and name strings. See
//! <https://sourceware.org/gdb/onlinedocs/gdb/Index-Section-Format.html>.

use std::sync::atomic::Ordering;

use byteorder::{ByteOrder, LittleEndian as LE};
use rayon::prelude::*;

use crate::endian_slice::EndianSlice;
use crate::endianity::Endianity;
use crate::pubnames::{self, NameType, ObjectPubnames};
use crate::symbol::{HyperLogLog, SymbolId, SymbolMap};
use crate::unit::{self, Compunit};
use crate::Result;

/// The index format version this crate emits.
const INDEX_VERSION: u32 = 7;

/// The version word plus five section offsets.
const HEADER_SIZE: usize = 24;

/// The decompressed debug sections of the output image.
///
/// All buffers borrow from the relocated output; sections the image does
/// not have stay empty. Only `debug_info` and `debug_abbrev` are required
/// to produce an index at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugSections<'input> {
    /// The output `.debug_info` section.
    pub debug_info: &'input [u8],
    /// The output `.debug_abbrev` section.
    pub debug_abbrev: &'input [u8],
    /// The output `.debug_ranges` section (DWARF 2–4 range lists).
    pub debug_ranges: &'input [u8],
    /// The output `.debug_addr` section (DWARF 5 address tables).
    pub debug_addr: &'input [u8],
    /// The output `.debug_rnglists` section (DWARF 5 range lists).
    pub debug_rnglists: &'input [u8],
}

/// Builds the `.gdb_index` section payload for a linked image.
///
/// The builder borrows every input buffer; nothing is copied until the
/// final payload is allocated.
#[derive(Debug)]
pub struct IndexBuilder<'input, E>
where
    E: Endianity,
{
    sections: DebugSections<'input>,
    objects: Vec<ObjectPubnames<'input>>,
    endian: E,
    address_size: u8,
}

impl<'input, E> IndexBuilder<'input, E>
where
    E: Endianity,
{
    /// Construct a builder for an image with the given sections, endianity,
    /// and word size.
    pub fn new(
        sections: DebugSections<'input>,
        endian: E,
        address_size: u8,
    ) -> IndexBuilder<'input, E> {
        IndexBuilder {
            sections,
            objects: Vec::new(),
            endian,
            address_size,
        }
    }

    /// Register one input object's pubnames sections.
    pub fn add_object(&mut self, object: ObjectPubnames<'input>) -> &mut Self {
        self.objects.push(object);
        self
    }

    /// Build the section payload.
    ///
    /// Returns `Ok(None)` when the image has no `.debug_info`, in which
    /// case no section should be emitted at all.
    #[tracing::instrument(skip_all, name = "Build .gdb_index")]
    pub fn build(&self) -> Result<Option<Vec<u8>>> {
        if self.sections.debug_info.is_empty() {
            return Ok(None);
        }

        let mut cus = self.read_compunits()?;

        // Estimate the number of distinct symbols, then deduplicate them
        // through a map allocated once from the estimate.
        let estimator = cus
            .par_iter()
            .map(|cu| {
                let mut estimator = HyperLogLog::new();
                for nt in &cu.name_types {
                    estimator.insert(nt.hash);
                }
                estimator
            })
            .reduce(HyperLogLog::new, |mut a, b| {
                a.merge(&b);
                a
            });

        let map = SymbolMap::with_capacity(estimator.cardinality() * 3 / 2);

        cus.par_iter_mut().try_for_each(|cu| -> Result<()> {
            cu.entries.reserve(cu.name_types.len());
            for nt in &cu.name_types {
                let id = map.insert(nt.name, nt.hash)?;
                map[id].count.fetch_add(1, Ordering::Relaxed);
                cu.entries.push(id);
            }
            Ok(())
        })?;

        // Sort symbols for build reproducibility.
        let mut entries = map.ids();
        entries.par_sort_unstable_by(|&a, &b| {
            let (a, b) = (&map[a], &map[b]);
            (a.hash, a.name).cmp(&(b.hash, b.name))
        });

        tracing::debug!(
            compunits = cus.len(),
            symbols = entries.len(),
            "deduplicated symbols"
        );

        Ok(Some(self.emit(&cus, &map, &entries)))
    }

    /// Enumerate the output's compilation units, read their address ranges,
    /// and attach each object's pubnames records to them.
    #[tracing::instrument(skip_all, name = "Scan compilation units")]
    fn read_compunits(&self) -> Result<Vec<Compunit<'input>>> {
        let debug_info = EndianSlice::new(self.sections.debug_info, self.endian);
        let mut cus = unit::parse_compunits(debug_info)?;

        cus.par_iter_mut().try_for_each(|cu| -> Result<()> {
            cu.ranges = unit::read_address_ranges(
                &self.sections,
                self.endian,
                self.address_size,
                cu,
            )?;
            // Ranges discarded by the linker come back empty or zero-based.
            cu.ranges
                .retain(|range| range.begin != 0 && range.begin != range.end);
            Ok(())
        })?;

        // Objects are parsed in parallel; attaching stays sequential since
        // the records of several objects land in the shared unit list.
        let contributions: Vec<Vec<(usize, NameType<'input>)>> = self
            .objects
            .par_iter()
            .map(|object| pubnames::read_pubnames(&cus, object, self.endian))
            .collect::<Result<_>>()?;
        for contribution in contributions {
            for (cu_index, nt) in contribution {
                cus[cu_index].name_types.push(nt);
            }
        }

        // Compilers may emit one record per comdat group, so a unit's list
        // can be mostly duplicates.
        cus.par_iter_mut().for_each(|cu| {
            cu.name_types.sort_unstable();
            cu.name_types.dedup();
        });

        Ok(cus)
    }

    fn emit(
        &self,
        cus: &[Compunit<'input>],
        map: &SymbolMap<'input>,
        entries: &[SymbolId],
    ) -> Vec<u8> {
        // Compute the layout. The CU-types area is always empty: type units
        // are not indexed.
        let cu_list_offset = HEADER_SIZE;
        let cu_types_offset = cu_list_offset + cus.len() * 16;
        let ranges_offset = cu_types_offset;
        let nranges: usize = cus.iter().map(|cu| cu.ranges.len()).sum();
        let symtab_offset = ranges_offset + nranges * 20;
        // The debugger wants at most 4/5 of the table occupied.
        let ht_size = ((entries.len() * 5 + 3) / 4).next_power_of_two();
        let const_pool_offset = symtab_offset + ht_size * 8;

        // Constant pool layout: per-symbol CU-index arrays first, each a
        // count word plus one word per occurrence, then the name strings.
        let mut offset = 0u32;
        for &id in entries {
            let ent = &map[id];
            ent.type_offset.store(offset, Ordering::Relaxed);
            offset += (ent.count.load(Ordering::Relaxed) + 1) * 4;
        }
        let names_offset = offset;
        for &id in entries {
            let ent = &map[id];
            ent.name_offset.store(offset, Ordering::Relaxed);
            offset += ent.name.len() as u32 + 1;
        }

        let mut buf = vec![0u8; const_pool_offset + offset as usize];

        // Header.
        LE::write_u32(&mut buf[0..], INDEX_VERSION);
        LE::write_u32(&mut buf[4..], cu_list_offset as u32);
        LE::write_u32(&mut buf[8..], cu_types_offset as u32);
        LE::write_u32(&mut buf[12..], ranges_offset as u32);
        LE::write_u32(&mut buf[16..], symtab_offset as u32);
        LE::write_u32(&mut buf[20..], const_pool_offset as u32);

        // CU list.
        let mut p = cu_list_offset;
        for cu in cus {
            LE::write_u64(&mut buf[p..], cu.offset.0);
            LE::write_u64(&mut buf[p + 8..], cu.size);
            p += 16;
        }

        // Address areas, in CU order.
        for (i, cu) in cus.iter().enumerate() {
            for range in &cu.ranges {
                LE::write_u64(&mut buf[p..], range.begin);
                LE::write_u64(&mut buf[p + 8..], range.end);
                LE::write_u32(&mut buf[p + 16..], i as u32);
                p += 20;
            }
        }

        // Symbol hash table: open addressing with double hashing. A slot is
        // vacant while both words are zero.
        let mask = (ht_size - 1) as u32;
        for &id in entries {
            let ent = &map[id];
            let step = (ent.hash & mask) | 1;
            let mut j = ent.hash & mask;

            loop {
                let slot = symtab_offset + j as usize * 8;
                if LE::read_u32(&buf[slot..]) == 0 && LE::read_u32(&buf[slot + 4..]) == 0
                {
                    LE::write_u32(
                        &mut buf[slot..],
                        ent.name_offset.load(Ordering::Relaxed),
                    );
                    LE::write_u32(
                        &mut buf[slot + 4..],
                        ent.type_offset.load(Ordering::Relaxed),
                    );
                    break;
                }
                j = (j + step) & mask;
            }
        }

        // Per-symbol CU-index arrays. Each array's leading word counts the
        // records appended so far, so it ends up holding the true count.
        for (i, cu) in cus.iter().enumerate() {
            for (nt, &id) in cu.name_types.iter().zip(&cu.entries) {
                let base = const_pool_offset
                    + map[id].type_offset.load(Ordering::Relaxed) as usize;
                let idx = LE::read_u32(&buf[base..]) + 1;
                LE::write_u32(&mut buf[base..], idx);
                LE::write_u32(
                    &mut buf[base + idx as usize * 4..],
                    (u32::from(nt.ty) << 24) | i as u32,
                );
            }
        }

        // Name strings. The pool tail is carved into one sub-slice per
        // entry so the copies can run in parallel.
        let mut rest = &mut buf[const_pool_offset + names_offset as usize..];
        let mut names = Vec::with_capacity(entries.len());
        for &id in entries {
            let name = map[id].name;
            let (head, tail) =
                std::mem::take(&mut rest).split_at_mut(name.len() + 1);
            names.push((head, name));
            rest = tail;
        }
        names.into_par_iter().for_each(|(dst, name)| {
            dst[..name.len()].copy_from_slice(name);
        });

        tracing::debug!(bytes = buf.len(), "emitted .gdb_index payload");
        buf
    }
}
