//! Compilation unit enumeration and address-range extraction.
//!
//! Only the root record of each unit is ever decoded: it carries everything
//! the index needs (`DW_AT_low_pc`/`DW_AT_high_pc` or `DW_AT_ranges`, plus
//! the DWARF 5 base attributes). The rest of the unit's records are never
//! visited.

use crate::abbrev::locate_unit_abbrev;
use crate::constants;
use crate::endian_slice::EndianSlice;
use crate::endianity::Endianity;
use crate::index::DebugSections;
use crate::pubnames::NameType;
use crate::ranges::{LegacyRangeIter, Range};
use crate::rnglists::{AddrTable, RngListIter};
use crate::symbol::SymbolId;
use crate::{DebugInfoOffset, Error, Result};

/// One compilation unit of the output `.debug_info` section.
#[derive(Debug)]
pub struct Compunit<'input> {
    /// Byte offset of the unit's header within the output `.debug_info`.
    pub offset: DebugInfoOffset,
    /// Total size in bytes, including the four byte length prefix.
    pub size: u64,
    /// The address ranges the unit covers, already filtered of empty and
    /// zero-based entries.
    pub ranges: Vec<Range>,
    /// The public names and types the unit contributes, sorted and deduped.
    pub name_types: Vec<NameType<'input>>,
    /// Handle of the global symbol for each element of `name_types`.
    pub entries: Vec<SymbolId>,
}

impl<'input> Compunit<'input> {
    pub(crate) fn new(offset: DebugInfoOffset, size: u64) -> Compunit<'input> {
        Compunit {
            offset,
            size,
            ranges: Vec::new(),
            name_types: Vec::new(),
            entries: Vec::new(),
        }
    }
}

/// Enumerate the compilation units of the output `.debug_info` section.
///
/// Units are returned in section order with only their offsets and sizes
/// filled in; range extraction happens per unit afterwards.
pub fn parse_compunits<'input, E>(
    debug_info: EndianSlice<'input, E>,
) -> Result<Vec<Compunit<'input>>>
where
    E: Endianity,
{
    let mut cus = Vec::new();
    let mut input = debug_info;

    while !input.is_empty() {
        let offset = (debug_info.len() - input.len()) as u64;
        let length = input.read_u32()?;
        if length == 0xffff_ffff {
            return Err(Error::UnsupportedDwarf64);
        }
        input.skip(length as usize)?;
        cus.push(Compunit::new(
            DebugInfoOffset(offset),
            u64::from(length) + 4,
        ));
    }

    Ok(cus)
}

// The unit header fields the extractor cares about. The cursor is left at
// the root record's ULEB abbreviation code.
struct UnitHeader {
    version: u16,
    abbrev_offset: u64,
}

fn parse_unit_header<E>(
    unit: &mut EndianSlice<'_, E>,
    address_size: u8,
) -> Result<UnitHeader>
where
    E: Endianity,
{
    unit.skip(4)?; // length prefix, validated during enumeration
    let version = unit.read_u16()?;

    let abbrev_offset = match version {
        2..=4 => {
            let abbrev_offset = u64::from(unit.read_u32()?);
            let unit_address_size = unit.read_u8()?;
            if unit_address_size != address_size {
                return Err(Error::UnsupportedAddressSize(unit_address_size));
            }
            abbrev_offset
        }
        5 => {
            let unit_type = constants::DwUt(unit.read_u8()?);
            let unit_address_size = unit.read_u8()?;
            if unit_address_size != address_size {
                return Err(Error::UnsupportedAddressSize(unit_address_size));
            }
            let abbrev_offset = u64::from(unit.read_u32()?);
            match unit_type {
                constants::DW_UT_compile | constants::DW_UT_partial => {}
                constants::DW_UT_skeleton | constants::DW_UT_split_compile => {
                    unit.skip(8)?; // dwo_id
                }
                otherwise => return Err(Error::UnknownUnitType(otherwise)),
            }
            abbrev_offset
        }
        otherwise => return Err(Error::UnknownVersion(otherwise)),
    };

    Ok(UnitHeader {
        version,
        abbrev_offset,
    })
}

// Consume one attribute value, returning it as a scalar.
//
// Forms that do not carry a useful scalar (strings, presence flags) still
// consume exactly their encoded size so that the cursor stays in sync with
// the abbreviation's attribute list.
fn read_scalar<'input, E>(
    input: &mut EndianSlice<'input, E>,
    form: constants::DwForm,
    address_size: u8,
) -> Result<u64>
where
    E: Endianity,
{
    match form {
        constants::DW_FORM_flag_present => Ok(0),
        constants::DW_FORM_data1
        | constants::DW_FORM_flag
        | constants::DW_FORM_strx1
        | constants::DW_FORM_addrx1
        | constants::DW_FORM_ref1 => input.read_u8().map(u64::from),
        constants::DW_FORM_data2
        | constants::DW_FORM_strx2
        | constants::DW_FORM_addrx2
        | constants::DW_FORM_ref2 => input.read_u16().map(u64::from),
        constants::DW_FORM_strx3 | constants::DW_FORM_addrx3 => {
            input.read_u24().map(u64::from)
        }
        constants::DW_FORM_data4
        | constants::DW_FORM_strp
        | constants::DW_FORM_sec_offset
        | constants::DW_FORM_line_strp
        | constants::DW_FORM_strx4
        | constants::DW_FORM_addrx4
        | constants::DW_FORM_ref4 => input.read_u32().map(u64::from),
        constants::DW_FORM_data8 | constants::DW_FORM_ref8 => input.read_u64(),
        constants::DW_FORM_addr | constants::DW_FORM_ref_addr => {
            input.read_address(address_size)
        }
        constants::DW_FORM_strx
        | constants::DW_FORM_addrx
        | constants::DW_FORM_udata
        | constants::DW_FORM_ref_udata
        | constants::DW_FORM_loclistx
        | constants::DW_FORM_rnglistx => input.read_uleb128(),
        constants::DW_FORM_string => {
            input.read_null_terminated_slice()?;
            Ok(0)
        }
        otherwise => Err(Error::UnhandledForm(otherwise)),
    }
}

/// Return the address ranges covered by the unit at `cu.offset`.
///
/// If the root record carries `DW_AT_ranges`, the ranges come from
/// `.debug_ranges` (DWARF ≤ 4) or `.debug_rnglists` (DWARF 5), otherwise a
/// single range is formed from `DW_AT_low_pc`/`DW_AT_high_pc`, resolving
/// `.debug_addr` indirection where the forms ask for it.
pub fn read_address_ranges<'input, E>(
    sections: &DebugSections<'input>,
    endian: E,
    address_size: u8,
    cu: &Compunit<'input>,
) -> Result<Vec<Range>>
where
    E: Endianity,
{
    let data = &sections.debug_info[cu.offset.0 as usize..(cu.offset.0 + cu.size) as usize];
    let mut unit = EndianSlice::new(data, endian);

    let header = parse_unit_header(&mut unit, address_size)?;
    let abbrev_code = unit.read_uleb128()?;
    let mut abbrev = locate_unit_abbrev(
        EndianSlice::new(sections.debug_abbrev, endian),
        header.abbrev_offset,
        abbrev_code,
    )?;

    let mut low_pc: Option<(constants::DwForm, u64)> = None;
    let mut high_pc: Option<(constants::DwForm, u64)> = None;
    let mut ranges_attr: Option<(constants::DwForm, u64)> = None;
    let mut rnglists_base: Option<u64> = None;
    let mut addr_table: Option<AddrTable<'input, E>> = None;

    // Walk the root record's attributes, keeping the interesting ones.
    loop {
        let name = abbrev.read_uleb128()?;
        let form = abbrev.read_uleb128()?;
        if name == 0 && form == 0 {
            break;
        }

        let form = constants::DwForm(form);
        let value = read_scalar(&mut unit, form, address_size)?;

        match constants::DwAt(name) {
            constants::DW_AT_low_pc => low_pc = Some((form, value)),
            constants::DW_AT_high_pc => high_pc = Some((form, value)),
            constants::DW_AT_rnglists_base => rnglists_base = Some(value),
            constants::DW_AT_addr_base => {
                addr_table = Some(AddrTable::new(
                    EndianSlice::new(sections.debug_addr, endian),
                    value,
                    address_size,
                ));
            }
            constants::DW_AT_ranges => ranges_attr = Some((form, value)),
            _ => {}
        }
    }

    // Discontiguous address ranges supersede the low_pc/high_pc pair.
    if let Some((form, value)) = ranges_attr {
        let base = low_pc.map_or(0, |(_, value)| value);

        if header.version <= 4 {
            let mut input = EndianSlice::new(sections.debug_ranges, endian);
            input.skip(value as usize)?;
            let mut iter = LegacyRangeIter::new(input, address_size, base);
            let mut vec = Vec::new();
            while let Some(range) = iter.next()? {
                vec.push(range);
            }
            return Ok(vec);
        }

        let rnglists = EndianSlice::new(sections.debug_rnglists, endian);
        let mut vec = Vec::new();

        if form == constants::DW_FORM_sec_offset {
            let mut input = rnglists;
            input.skip(value as usize)?;
            let mut iter = RngListIter::new(input, address_size, addr_table, base);
            while let Some(range) = iter.next()? {
                vec.push(range);
            }
            return Ok(vec);
        }

        // Indexed lists: read every list of the table named by
        // DW_AT_rnglists_base. The offset count sits in the four bytes
        // preceding the base, and the offsets are relative to it.
        let table_base = rnglists_base.ok_or(Error::MissingRngListsBase)? as usize;
        if table_base < 4 {
            return Err(Error::UnexpectedEof);
        }
        let mut offsets = rnglists;
        offsets.skip(table_base - 4)?;
        let num_offsets = offsets.read_u32()?;

        for _ in 0..num_offsets {
            let list_offset = offsets.read_u32()?;
            let mut input = rnglists;
            input.skip(table_base + list_offset as usize)?;
            let mut iter = RngListIter::new(input, address_size, addr_table, base);
            while let Some(range) = iter.next()? {
                vec.push(range);
            }
        }
        return Ok(vec);
    }

    // A contiguous address range.
    if let (Some((low_form, low_value)), Some((high_form, high_value))) =
        (low_pc, high_pc)
    {
        let addr = |index: u64| match addr_table {
            Some(ref table) => table.get(index),
            None => Err(Error::MissingAddrBase),
        };

        let begin = match low_form {
            constants::DW_FORM_addr => low_value,
            constants::DW_FORM_addrx
            | constants::DW_FORM_addrx1
            | constants::DW_FORM_addrx2
            | constants::DW_FORM_addrx3
            | constants::DW_FORM_addrx4 => addr(low_value)?,
            otherwise => return Err(Error::UnhandledLowPcForm(otherwise)),
        };

        let end = match high_form {
            constants::DW_FORM_addr => high_value,
            constants::DW_FORM_addrx
            | constants::DW_FORM_addrx1
            | constants::DW_FORM_addrx2
            | constants::DW_FORM_addrx3
            | constants::DW_FORM_addrx4 => addr(high_value)?,
            constants::DW_FORM_udata
            | constants::DW_FORM_data1
            | constants::DW_FORM_data2
            | constants::DW_FORM_data4
            | constants::DW_FORM_data8 => begin.wrapping_add(high_value),
            otherwise => return Err(Error::UnhandledHighPcForm(otherwise)),
        };

        return Ok(vec![Range { begin, end }]);
    }

    Ok(Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endianity::LittleEndian;
    use crate::test_util::SectionMethods;
    use test_assembler::{Endian, Label, LabelMaker, Section};

    fn bytes(section: Section) -> Vec<u8> {
        section.get_contents().unwrap()
    }

    fn sections<'a>(
        debug_info: &'a [u8],
        debug_abbrev: &'a [u8],
    ) -> DebugSections<'a> {
        DebugSections {
            debug_info,
            debug_abbrev,
            ..DebugSections::default()
        }
    }

    // A DWARF 4 unit whose root record carries the given attribute values.
    fn unit_v4(attr_values: &[u8]) -> Vec<u8> {
        let start = Label::new();
        let end = Label::new();
        let length = Label::new();
        let section = Section::with_endian(Endian::Little)
            .mark(&start)
            .L32(&length)
            .L16(4) // version
            .L32(0) // abbrev offset
            .L8(8) // address size
            .uleb(1) // abbreviation code
            .append_bytes(attr_values)
            .mark(&end);
        length.set_const((&end - &start - 4) as u64);
        section.get_contents().unwrap()
    }

    // An abbreviation table declaring one compile-unit record with the given
    // attribute specifications.
    fn abbrev_with(attrs: &[(u64, u64)]) -> Vec<u8> {
        let mut section = Section::with_endian(Endian::Little)
            .uleb(1)
            .uleb(0x11) // DW_TAG_compile_unit
            .L8(0);
        for &(name, form) in attrs {
            section = section.uleb(name).uleb(form);
        }
        section.uleb(0).uleb(0).uleb(0).get_contents().unwrap()
    }

    #[test]
    fn test_parse_compunits() {
        let section = Section::with_endian(Endian::Little)
            .L32(8).append_bytes(&[0u8; 8])
            .L32(4).append_bytes(&[0u8; 4]);
        let buf = section.get_contents().unwrap();

        let cus = parse_compunits(EndianSlice::new(&buf, LittleEndian)).unwrap();
        assert_eq!(cus.len(), 2);
        assert_eq!(cus[0].offset, DebugInfoOffset(0));
        assert_eq!(cus[0].size, 12);
        assert_eq!(cus[1].offset, DebugInfoOffset(12));
        assert_eq!(cus[1].size, 8);
    }

    #[test]
    fn test_parse_compunits_rejects_dwarf64() {
        let section = Section::with_endian(Endian::Little).L32(0xffff_ffff).L64(8);
        let buf = section.get_contents().unwrap();

        assert_eq!(
            parse_compunits(EndianSlice::new(&buf, LittleEndian)).map(|v| v.len()),
            Err(Error::UnsupportedDwarf64)
        );
    }

    #[test]
    fn test_parse_compunits_rejects_truncated_unit() {
        let section = Section::with_endian(Endian::Little).L32(100).L32(0);
        let buf = section.get_contents().unwrap();

        assert_eq!(
            parse_compunits(EndianSlice::new(&buf, LittleEndian)).map(|v| v.len()),
            Err(Error::UnexpectedEof)
        );
    }

    #[test]
    fn test_unit_header_v4() {
        let section = Section::with_endian(Endian::Little)
            .L32(0)
            .L16(4)
            .L32(0x42)
            .L8(8);
        let buf = section.get_contents().unwrap();
        let mut unit = EndianSlice::new(&buf, LittleEndian);

        let header = parse_unit_header(&mut unit, 8).unwrap();
        assert_eq!(header.version, 4);
        assert_eq!(header.abbrev_offset, 0x42);
        assert!(unit.is_empty());
    }

    #[test]
    fn test_unit_header_address_size_mismatch() {
        let section = Section::with_endian(Endian::Little)
            .L32(0)
            .L16(4)
            .L32(0)
            .L8(4);
        let buf = section.get_contents().unwrap();
        let mut unit = EndianSlice::new(&buf, LittleEndian);

        assert!(matches!(
            parse_unit_header(&mut unit, 8),
            Err(Error::UnsupportedAddressSize(4))
        ));
    }

    #[test]
    fn test_unit_header_v5_compile() {
        let section = Section::with_endian(Endian::Little)
            .L32(0)
            .L16(5)
            .L8(0x01) // DW_UT_compile
            .L8(8)
            .L32(0x10);
        let buf = section.get_contents().unwrap();
        let mut unit = EndianSlice::new(&buf, LittleEndian);

        let header = parse_unit_header(&mut unit, 8).unwrap();
        assert_eq!(header.version, 5);
        assert_eq!(header.abbrev_offset, 0x10);
        assert!(unit.is_empty());
    }

    #[test]
    fn test_unit_header_v5_skeleton_skips_dwo_id() {
        let section = Section::with_endian(Endian::Little)
            .L32(0)
            .L16(5)
            .L8(0x04) // DW_UT_skeleton
            .L8(8)
            .L32(0x10)
            .L64(0xdead_beef); // dwo_id
        let buf = section.get_contents().unwrap();
        let mut unit = EndianSlice::new(&buf, LittleEndian);

        let header = parse_unit_header(&mut unit, 8).unwrap();
        assert_eq!(header.abbrev_offset, 0x10);
        assert!(unit.is_empty());
    }

    #[test]
    fn test_unit_header_v5_unknown_unit_type() {
        let section = Section::with_endian(Endian::Little)
            .L32(0)
            .L16(5)
            .L8(0x02) // DW_UT_type is not indexable
            .L8(8)
            .L32(0x10);
        let buf = section.get_contents().unwrap();
        let mut unit = EndianSlice::new(&buf, LittleEndian);

        assert!(matches!(
            parse_unit_header(&mut unit, 8),
            Err(Error::UnknownUnitType(constants::DW_UT_type))
        ));
    }

    #[test]
    fn test_unit_header_unknown_version() {
        let section = Section::with_endian(Endian::Little).L32(0).L16(6);
        let buf = section.get_contents().unwrap();
        let mut unit = EndianSlice::new(&buf, LittleEndian);

        assert!(matches!(
            parse_unit_header(&mut unit, 8),
            Err(Error::UnknownVersion(6))
        ));
    }

    #[test]
    fn test_contiguous_range_from_low_and_high_pc() {
        let debug_info = unit_v4(&bytes(
            Section::with_endian(Endian::Little)
                .L64(0x1000) // DW_AT_low_pc
                .L32(0x100), // DW_AT_high_pc, data4 length
        ));
        let debug_abbrev = abbrev_with(&[(0x11, 0x01), (0x12, 0x06)]);
        let sections = sections(&debug_info, &debug_abbrev);
        let cus = parse_compunits(EndianSlice::new(sections.debug_info, LittleEndian))
            .unwrap();

        let ranges =
            read_address_ranges(&sections, LittleEndian, 8, &cus[0]).unwrap();
        assert_eq!(
            ranges,
            vec![Range {
                begin: 0x1000,
                end: 0x1100,
            }]
        );
    }

    #[test]
    fn test_high_pc_as_address() {
        let debug_info = unit_v4(&bytes(
            Section::with_endian(Endian::Little).L64(0x1000).L64(0x2000),
        ));
        let debug_abbrev = abbrev_with(&[(0x11, 0x01), (0x12, 0x01)]);
        let sections = sections(&debug_info, &debug_abbrev);
        let cus = parse_compunits(EndianSlice::new(sections.debug_info, LittleEndian))
            .unwrap();

        let ranges =
            read_address_ranges(&sections, LittleEndian, 8, &cus[0]).unwrap();
        assert_eq!(
            ranges,
            vec![Range {
                begin: 0x1000,
                end: 0x2000,
            }]
        );
    }

    #[test]
    fn test_no_range_attributes_means_no_ranges() {
        let debug_info = unit_v4(&[]);
        let debug_abbrev = abbrev_with(&[]);
        let sections = sections(&debug_info, &debug_abbrev);
        let cus = parse_compunits(EndianSlice::new(sections.debug_info, LittleEndian))
            .unwrap();

        let ranges =
            read_address_ranges(&sections, LittleEndian, 8, &cus[0]).unwrap();
        assert!(ranges.is_empty());
    }

    #[test]
    fn test_unhandled_high_pc_form() {
        // DW_AT_high_pc as DW_FORM_string makes no sense; the attribute walk
        // consumes it, and resolution must then reject it.
        let debug_info = unit_v4(&bytes(
            Section::with_endian(Endian::Little)
                .L64(0x1000)
                .append_bytes(b"x\0"),
        ));
        let debug_abbrev = abbrev_with(&[(0x11, 0x01), (0x12, 0x08)]);
        let sections = sections(&debug_info, &debug_abbrev);
        let cus = parse_compunits(EndianSlice::new(sections.debug_info, LittleEndian))
            .unwrap();

        assert!(matches!(
            read_address_ranges(&sections, LittleEndian, 8, &cus[0]),
            Err(Error::UnhandledHighPcForm(constants::DW_FORM_string))
        ));
    }

    #[test]
    fn test_ranges_attribute_reads_debug_ranges() {
        // DW_AT_ranges with DW_FORM_sec_offset pointing into .debug_ranges,
        // with low_pc as the base address.
        let debug_info = unit_v4(&bytes(
            Section::with_endian(Endian::Little)
                .L64(0x100) // DW_AT_low_pc
                .L32(0x10), // DW_AT_ranges
        ));
        let debug_abbrev = abbrev_with(&[(0x11, 0x01), (0x55, 0x17)]);
        let ranges_section = Section::with_endian(Endian::Little)
            .append_bytes(&[0u8; 0x10]) // padding up to the list offset
            .L64(0x10).L64(0x20)
            .L64(!0u64).L64(0x1000) // base selector
            .L64(0x0).L64(0x8)
            .L64(0).L64(0);
        let debug_ranges = ranges_section.get_contents().unwrap();
        let sections = DebugSections {
            debug_info: &debug_info,
            debug_abbrev: &debug_abbrev,
            debug_ranges: &debug_ranges,
            ..DebugSections::default()
        };
        let cus = parse_compunits(EndianSlice::new(sections.debug_info, LittleEndian))
            .unwrap();

        let ranges =
            read_address_ranges(&sections, LittleEndian, 8, &cus[0]).unwrap();
        assert_eq!(
            ranges,
            vec![
                Range {
                    begin: 0x110,
                    end: 0x120,
                },
                Range {
                    begin: 0x1000,
                    end: 0x1008,
                },
            ]
        );
    }

    // A DWARF 5 unit with the given attribute specs and values.
    fn unit_v5(attrs: &[(u64, u64)], attr_values: &[u8]) -> (Vec<u8>, Vec<u8>) {
        let start = Label::new();
        let end = Label::new();
        let length = Label::new();
        let section = Section::with_endian(Endian::Little)
            .mark(&start)
            .L32(&length)
            .L16(5)
            .L8(0x01) // DW_UT_compile
            .L8(8)
            .L32(0) // abbrev offset
            .uleb(1)
            .append_bytes(attr_values)
            .mark(&end);
        length.set_const((&end - &start - 4) as u64);
        (section.get_contents().unwrap(), abbrev_with(attrs))
    }

    #[test]
    fn test_dwarf5_sec_offset_rnglist() {
        // DW_AT_addr_base resolving index 2 to 0x2000, then an offset_pair
        // under a base_addressx entry.
        let (debug_info, debug_abbrev) = unit_v5(
            &[(0x73, 0x17), (0x55, 0x17)], // addr_base, ranges, both sec_offset
            &bytes(Section::with_endian(Endian::Little).L32(8).L32(0)),
        );
        let addrs = Section::with_endian(Endian::Little)
            .L64(0) // table header stand-in
            .L64(0x0)
            .L64(0x0)
            .L64(0x2000); // index 2 from base 8
        let debug_addr = addrs.get_contents().unwrap();
        let rnglist = Section::with_endian(Endian::Little)
            .L8(1).uleb(2) // base_addressx
            .L8(4).uleb(0x10).uleb(0x20) // offset_pair
            .L8(0);
        let debug_rnglists = rnglist.get_contents().unwrap();
        let sections = DebugSections {
            debug_info: &debug_info,
            debug_abbrev: &debug_abbrev,
            debug_addr: &debug_addr,
            debug_rnglists: &debug_rnglists,
            ..DebugSections::default()
        };
        let cus = parse_compunits(EndianSlice::new(sections.debug_info, LittleEndian))
            .unwrap();

        let ranges =
            read_address_ranges(&sections, LittleEndian, 8, &cus[0]).unwrap();
        assert_eq!(
            ranges,
            vec![Range {
                begin: 0x2010,
                end: 0x2020,
            }]
        );
    }

    #[test]
    fn test_dwarf5_indexed_rnglist_walks_whole_table() {
        // DW_AT_ranges with DW_FORM_rnglistx: every list of the table at
        // DW_AT_rnglists_base is read.
        let (debug_info, debug_abbrev) = unit_v5(
            &[(0x74, 0x17), (0x55, 0x23)], // rnglists_base, ranges (rnglistx)
            &bytes(Section::with_endian(Endian::Little).L32(12).uleb(0)),
        );
        // Table: count at base-4, two offsets, then the two lists.
        let rnglists_section = Section::with_endian(Endian::Little)
            .append_bytes(&[0u8; 8]) // header stand-in
            .L32(2) // offset count, at base - 4
            .L32(8) // list 0, relative to base
            .L32(26) // list 1
            .L8(6).L64(0x1000).L64(0x1100).L8(0)
            .L8(6).L64(0x3000).L64(0x3010).L8(0);
        let debug_rnglists = rnglists_section.get_contents().unwrap();
        let sections = DebugSections {
            debug_info: &debug_info,
            debug_abbrev: &debug_abbrev,
            debug_rnglists: &debug_rnglists,
            ..DebugSections::default()
        };
        let cus = parse_compunits(EndianSlice::new(sections.debug_info, LittleEndian))
            .unwrap();

        let ranges =
            read_address_ranges(&sections, LittleEndian, 8, &cus[0]).unwrap();
        assert_eq!(
            ranges,
            vec![
                Range {
                    begin: 0x1000,
                    end: 0x1100,
                },
                Range {
                    begin: 0x3000,
                    end: 0x3010,
                },
            ]
        );
    }

    #[test]
    fn test_dwarf5_indexed_rnglist_requires_base() {
        let (debug_info, debug_abbrev) = unit_v5(
            &[(0x55, 0x23)], // ranges as rnglistx, no rnglists_base
            &bytes(Section::with_endian(Endian::Little).uleb(0)),
        );
        let sections = sections(&debug_info, &debug_abbrev);
        let cus = parse_compunits(EndianSlice::new(sections.debug_info, LittleEndian))
            .unwrap();

        assert!(matches!(
            read_address_ranges(&sections, LittleEndian, 8, &cus[0]),
            Err(Error::MissingRngListsBase)
        ));
    }

    #[test]
    fn test_low_pc_through_addr_index() {
        // DW_AT_low_pc as DW_FORM_addrx1, resolved through .debug_addr.
        let (debug_info, debug_abbrev) = unit_v5(
            &[(0x73, 0x17), (0x11, 0x29), (0x12, 0x0f)],
            &bytes(
                Section::with_endian(Endian::Little)
                    .L32(0) // addr_base
                    .L8(1) // low_pc index
                    .uleb(0x80), // high_pc length
            ),
        );
        let addrs = Section::with_endian(Endian::Little).L64(0x5000).L64(0x6000);
        let debug_addr = addrs.get_contents().unwrap();
        let sections = DebugSections {
            debug_info: &debug_info,
            debug_abbrev: &debug_abbrev,
            debug_addr: &debug_addr,
            ..DebugSections::default()
        };
        let cus = parse_compunits(EndianSlice::new(sections.debug_info, LittleEndian))
            .unwrap();

        let ranges =
            read_address_ranges(&sections, LittleEndian, 8, &cus[0]).unwrap();
        assert_eq!(
            ranges,
            vec![Range {
                begin: 0x6000,
                end: 0x6080,
            }]
        );
    }
}
