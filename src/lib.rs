//! Construction of the `.gdb_index` section for a link editor.
//!
//! `.gdb_index` is an optional ELF section that speeds up the GNU debugger.
//! It contains two maps: one from function, variable, and type names to
//! compilation units, and one from address ranges to compilation units. The
//! debugger uses them to find the unit covering a name or an instruction
//! pointer without first loading every piece of debug info into memory.
//!
//! The index can only be computed from post-relocation section contents, so
//! a link editor produces it at the very end of a link: enumerate the
//! compilation units of the output `.debug_info`, parse just enough DWARF
//! to learn each unit's covered address ranges, collect the public names
//! each input object contributes through `.debug_gnu_pubnames` and
//! `.debug_gnu_pubtypes`, and serialize the version 7 on-disk format. This
//! crate does all of that over borrowed byte buffers; reading the sections
//! out of the output image and writing the payload back stay with the
//! caller.
//!
//! Parsing DWARF for this purpose is deliberately shallow. Only each unit's
//! root record is decoded, and only far enough to resolve its address
//! ranges across the DWARF versions in the wild: inline `low_pc`/`high_pc`
//! pairs, DWARF 2–4 `.debug_ranges` lists, and DWARF 5 `.debug_rnglists`
//! with `.debug_addr` indirection.
//!
//! [`IndexBuilder`] is the entry point:
//!
//! ```
//! use gdb_index::{DebugSections, IndexBuilder, LittleEndian, ObjectPubnames};
//!
//! # fn main() -> gdb_index::Result<()> {
//! # let (debug_info, debug_abbrev): (&[u8], &[u8]) = (&[], &[]);
//! let sections = DebugSections {
//!     debug_info,
//!     debug_abbrev,
//!     ..DebugSections::default()
//! };
//! let mut builder = IndexBuilder::new(sections, LittleEndian, 8);
//! builder.add_object(ObjectPubnames {
//!     debug_info_offset: 0,
//!     debug_pubnames: None,
//!     debug_pubtypes: None,
//! });
//! if let Some(payload) = builder.build()? {
//!     // Write the payload into the output file and grow the
//!     // section header to match.
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Any deviation from the DWARF shape the pipeline expects is fatal: the
//! error propagates out of [`IndexBuilder::build`] and the link should be
//! aborted with it. There is nothing to salvage from a partially indexed
//! image.
//!
//! The format itself is specified in the GDB manual:
//! <https://sourceware.org/gdb/onlinedocs/gdb/Index-Section-Format.html>.

#![deny(missing_docs)]

use std::error;
use std::fmt;
use std::result;

pub mod constants;

mod abbrev;
mod endian_slice;
mod endianity;
mod index;
mod pubnames;
mod ranges;
mod rnglists;
mod symbol;
#[cfg(test)]
mod test_util;
mod unit;

pub use crate::endian_slice::EndianSlice;
pub use crate::endianity::{BigEndian, Endianity, LittleEndian, NativeEndian};
pub use crate::index::{DebugSections, IndexBuilder};
pub use crate::pubnames::ObjectPubnames;
pub use crate::symbol::gdb_hash;

/// An offset into the output `.debug_info` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugInfoOffset(pub u64);

/// An error that occurred while building the index.
///
/// Every variant is fatal to the link; see the crate docs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Hit the end of a debug section before it was expected.
    UnexpectedEof,
    /// An error parsing an unsigned LEB128 value.
    BadUnsignedLeb128,
    /// Found an unknown DWARF version.
    UnknownVersion(u16),
    /// A unit's address size does not match the target word size.
    UnsupportedAddressSize(u8),
    /// Found a DWARF 5 unit of a type that cannot appear in `.debug_info`.
    UnknownUnitType(constants::DwUt),
    /// Found a 64-bit DWARF length prefix.
    UnsupportedDwarf64,
    /// `.debug_abbrev` does not declare the unit's abbreviation code.
    MissingUnitAbbreviation(u64),
    /// The unit's abbreviation has a tag other than a unit tag.
    UnexpectedUnitTag(constants::DwTag),
    /// Found an attribute form the scalar reader cannot consume.
    UnhandledForm(constants::DwForm),
    /// Found a `DW_AT_low_pc` form that does not yield an address.
    UnhandledLowPcForm(constants::DwForm),
    /// Found a `DW_AT_high_pc` form that yields neither an address nor a
    /// length.
    UnhandledHighPcForm(constants::DwForm),
    /// Found an unknown `.debug_rnglists` entry kind.
    UnknownRangeListEntry(constants::DwRle),
    /// A unit uses indexed range lists without `DW_AT_rnglists_base`.
    MissingRngListsBase,
    /// A unit uses address indexing without `DW_AT_addr_base`.
    MissingAddrBase,
    /// A pubnames table is shorter than its own header.
    TruncatedPubnames,
    /// A pubnames table names a `.debug_info` offset with no unit at it.
    UnresolvedDebugInfoOffset(DebugInfoOffset),
    /// The symbol map was sized too small for the distinct keys inserted.
    SymbolMapFull,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        match *self {
            Error::UnexpectedEof => {
                write!(f, "hit the end of a debug section before it was expected")
            }
            Error::BadUnsignedLeb128 => {
                write!(f, "malformed unsigned LEB128 value")
            }
            Error::UnknownVersion(version) => {
                write!(f, "unknown DWARF version: {}", version)
            }
            Error::UnsupportedAddressSize(size) => {
                write!(f, "unsupported address size: {}", size)
            }
            Error::UnknownUnitType(unit_type) => {
                write!(f, "unknown unit type: {}", unit_type)
            }
            Error::UnsupportedDwarf64 => {
                write!(f, "64-bit DWARF is not supported")
            }
            Error::MissingUnitAbbreviation(code) => write!(
                f,
                ".debug_abbrev does not declare abbreviation code {}",
                code
            ),
            Error::UnexpectedUnitTag(tag) => write!(
                f,
                "the unit's tag is not DW_TAG_compile_unit or \
                 DW_TAG_skeleton_unit: {}",
                tag
            ),
            Error::UnhandledForm(form) => {
                write!(f, "unhandled debug info form: {}", form)
            }
            Error::UnhandledLowPcForm(form) => {
                write!(f, "unhandled form for DW_AT_low_pc: {}", form)
            }
            Error::UnhandledHighPcForm(form) => {
                write!(f, "unhandled form for DW_AT_high_pc: {}", form)
            }
            Error::UnknownRangeListEntry(entry) => {
                write!(f, "unknown range list entry kind: {}", entry)
            }
            Error::MissingRngListsBase => {
                write!(f, "missing DW_AT_rnglists_base")
            }
            Error::MissingAddrBase => write!(f, "missing DW_AT_addr_base"),
            Error::TruncatedPubnames => {
                write!(f, "corrupted pubnames table header")
            }
            Error::UnresolvedDebugInfoOffset(offset) => write!(
                f,
                "no compilation unit at .debug_info offset {:#x}",
                offset.0
            ),
            Error::SymbolMapFull => {
                write!(f, "symbol map capacity exhausted")
            }
        }
    }
}

impl error::Error for Error {}

/// The result of an index-building operation.
pub type Result<T> = result::Result<T, Error>;
