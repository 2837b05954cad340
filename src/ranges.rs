//! Address ranges and the legacy `.debug_ranges` decoder.

use fallible_iterator::FallibleIterator;

use crate::endian_slice::EndianSlice;
use crate::endianity::Endianity;
use crate::{Error, Result};

/// A half-open address range covered by a compilation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    /// The beginning address of the range.
    pub begin: u64,

    /// The first address past the end of the range.
    pub end: u64,
}

/// An iterator over a DWARF 2–4 range list in `.debug_ranges`.
///
/// The list is a sequence of address-sized `(begin, end)` pairs. A pair
/// whose first word is the all-ones value selects a new base address; a
/// pair of two zeros terminates the list. Every other pair is emitted with
/// the current base applied.
#[derive(Debug)]
pub struct LegacyRangeIter<'input, E>
where
    E: Endianity,
{
    input: EndianSlice<'input, E>,
    address_size: u8,
    base: u64,
    done: bool,
}

impl<'input, E> LegacyRangeIter<'input, E>
where
    E: Endianity,
{
    /// Construct an iterator over the list starting at the front of `input`.
    ///
    /// `base` is the initial base address, normally the unit's `DW_AT_low_pc`.
    pub fn new(
        input: EndianSlice<'input, E>,
        address_size: u8,
        base: u64,
    ) -> LegacyRangeIter<'input, E> {
        LegacyRangeIter {
            input,
            address_size,
            base,
            done: false,
        }
    }

    /// Advance the iterator to the next range.
    pub fn next(&mut self) -> Result<Option<Range>> {
        if self.done {
            return Ok(None);
        }

        loop {
            let begin = self.input.read_address(self.address_size)?;
            let end = self.input.read_address(self.address_size)?;

            if begin == 0 && end == 0 {
                self.done = true;
                return Ok(None);
            }

            // A base address selection entry.
            if begin == !0 >> (64 - u32::from(self.address_size) * 8) {
                self.base = end;
                continue;
            }

            return Ok(Some(Range {
                begin: begin.wrapping_add(self.base),
                end: end.wrapping_add(self.base),
            }));
        }
    }
}

impl<'input, E> FallibleIterator for LegacyRangeIter<'input, E>
where
    E: Endianity,
{
    type Item = Range;
    type Error = Error;

    fn next(&mut self) -> ::core::result::Result<Option<Range>, Error> {
        LegacyRangeIter::next(self)
    }
}
