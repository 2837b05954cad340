//! The DWARF 5 `.debug_rnglists` decoder and `.debug_addr` indirection.

use fallible_iterator::FallibleIterator;

use crate::constants;
use crate::endian_slice::EndianSlice;
use crate::endianity::Endianity;
use crate::ranges::Range;
use crate::{Error, Result};

/// A view of one compilation unit's address table in `.debug_addr`.
///
/// `DW_AT_addr_base` points at the first address following the table's
/// header; `DW_FORM_addrx*` values and the indexed rnglist entries select
/// word-sized entries from there.
#[derive(Debug, Clone, Copy)]
pub struct AddrTable<'input, E>
where
    E: Endianity,
{
    section: EndianSlice<'input, E>,
    base: u64,
    address_size: u8,
}

impl<'input, E> AddrTable<'input, E>
where
    E: Endianity,
{
    /// Construct a table over the whole `.debug_addr` section with the given
    /// `DW_AT_addr_base` value.
    pub fn new(
        section: EndianSlice<'input, E>,
        base: u64,
        address_size: u8,
    ) -> AddrTable<'input, E> {
        AddrTable {
            section,
            base,
            address_size,
        }
    }

    /// Return the address at the given index.
    pub fn get(&self, index: u64) -> Result<u64> {
        let mut input = self.section;
        input.skip((self.base + index * u64::from(self.address_size)) as usize)?;
        input.read_address(self.address_size)
    }
}

/// An iterator over one DWARF 5 range list in `.debug_rnglists`.
///
/// Base addresses are applied internally, and indexed entries are resolved
/// through the unit's [`AddrTable`], so the iterator only yields finished
/// ranges. Indexed entries in a unit without `DW_AT_addr_base` fail with
/// [`Error::MissingAddrBase`].
#[derive(Debug)]
pub struct RngListIter<'input, E>
where
    E: Endianity,
{
    input: EndianSlice<'input, E>,
    address_size: u8,
    addr_table: Option<AddrTable<'input, E>>,
    base: u64,
    done: bool,
}

impl<'input, E> RngListIter<'input, E>
where
    E: Endianity,
{
    /// Construct an iterator over the list starting at the front of `input`.
    ///
    /// `base` is the initial base address, normally the unit's `DW_AT_low_pc`.
    pub fn new(
        input: EndianSlice<'input, E>,
        address_size: u8,
        addr_table: Option<AddrTable<'input, E>>,
        base: u64,
    ) -> RngListIter<'input, E> {
        RngListIter {
            input,
            address_size,
            addr_table,
            base,
            done: false,
        }
    }

    fn addr(&self, index: u64) -> Result<u64> {
        match self.addr_table {
            Some(ref table) => table.get(index),
            None => Err(Error::MissingAddrBase),
        }
    }

    /// Advance the iterator to the next range.
    pub fn next(&mut self) -> Result<Option<Range>> {
        if self.done {
            return Ok(None);
        }

        loop {
            let entry = constants::DwRle(self.input.read_u8()?);
            match entry {
                constants::DW_RLE_end_of_list => {
                    self.done = true;
                    return Ok(None);
                }
                constants::DW_RLE_base_addressx => {
                    let index = self.input.read_uleb128()?;
                    self.base = self.addr(index)?;
                }
                constants::DW_RLE_startx_endx => {
                    let begin = self.input.read_uleb128()?;
                    let end = self.input.read_uleb128()?;
                    return Ok(Some(Range {
                        begin: self.addr(begin)?,
                        end: self.addr(end)?,
                    }));
                }
                constants::DW_RLE_startx_length => {
                    let index = self.input.read_uleb128()?;
                    let length = self.input.read_uleb128()?;
                    let begin = self.addr(index)?;
                    return Ok(Some(Range {
                        begin,
                        end: begin.wrapping_add(length),
                    }));
                }
                constants::DW_RLE_offset_pair => {
                    let begin = self.input.read_uleb128()?;
                    let end = self.input.read_uleb128()?;
                    return Ok(Some(Range {
                        begin: self.base.wrapping_add(begin),
                        end: self.base.wrapping_add(end),
                    }));
                }
                constants::DW_RLE_base_address => {
                    self.base = self.input.read_address(self.address_size)?;
                }
                constants::DW_RLE_start_end => {
                    let begin = self.input.read_address(self.address_size)?;
                    let end = self.input.read_address(self.address_size)?;
                    return Ok(Some(Range { begin, end }));
                }
                constants::DW_RLE_start_length => {
                    let begin = self.input.read_address(self.address_size)?;
                    let length = self.input.read_uleb128()?;
                    return Ok(Some(Range {
                        begin,
                        end: begin.wrapping_add(length),
                    }));
                }
                otherwise => return Err(Error::UnknownRangeListEntry(otherwise)),
            }
        }
    }
}

impl<'input, E> FallibleIterator for RngListIter<'input, E>
where
    E: Endianity,
{
    type Item = Range;
    type Error = Error;

    fn next(&mut self) -> ::core::result::Result<Option<Range>, Error> {
        RngListIter::next(self)
    }
}
