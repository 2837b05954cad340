//! Reading `.debug_gnu_pubnames` and `.debug_gnu_pubtypes`.
//!
//! These sections are emitted per input object when a compiler is given
//! `-ggnu-pubnames`. Each one is a stream of tables: a 14 byte header that
//! names the contributing compilation unit by its `.debug_info` offset,
//! followed by `(u32 offset, type byte, NUL-terminated name)` records and a
//! zero-offset terminator. The type byte lets the debugger tell function
//! names from type names without touching `.debug_info`.

use crate::endian_slice::EndianSlice;
use crate::endianity::Endianity;
use crate::symbol::gdb_hash;
use crate::unit::Compunit;
use crate::{DebugInfoOffset, Error, Result};

/// One public name or type record, hashed and ready for deduplication.
///
/// The derived ordering compares `(hash, ty, name)`, which groups duplicate
/// records next to each other once a unit's records are sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NameType<'input> {
    /// The gdb-index hash of `name`.
    pub hash: u32,
    /// The record's attribute byte.
    pub ty: u8,
    /// The name, without its terminating NUL.
    pub name: &'input [u8],
}

/// One input object's public-name sections.
///
/// The buffers must already be decompressed. Objects that carry no debug
/// info simply leave both sections `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectPubnames<'input> {
    /// Byte offset at which this object's debug-info contribution begins in
    /// the output `.debug_info` section.
    pub debug_info_offset: u64,
    /// The object's `.debug_gnu_pubnames` contents, if present.
    pub debug_pubnames: Option<&'input [u8]>,
    /// The object's `.debug_gnu_pubtypes` contents, if present.
    pub debug_pubtypes: Option<&'input [u8]>,
}

/// Parse one object's pubnames and pubtypes.
///
/// Returns the parsed records paired with the index of the compilation unit
/// each belongs to; the caller owns attaching them, so that objects can be
/// parsed in parallel while the unit list stays shared.
pub fn read_pubnames<'input, E>(
    cus: &[Compunit<'input>],
    object: &ObjectPubnames<'input>,
    endian: E,
) -> Result<Vec<(usize, NameType<'input>)>>
where
    E: Endianity,
{
    let mut records = Vec::new();
    if let Some(contents) = object.debug_pubnames {
        read_tables(cus, object.debug_info_offset, contents, endian, &mut records)?;
    }
    if let Some(contents) = object.debug_pubtypes {
        read_tables(cus, object.debug_info_offset, contents, endian, &mut records)?;
    }
    Ok(records)
}

fn read_tables<'input, E>(
    cus: &[Compunit<'input>],
    base_offset: u64,
    contents: &'input [u8],
    endian: E,
    records: &mut Vec<(usize, NameType<'input>)>,
) -> Result<()>
where
    E: Endianity,
{
    let mut input = EndianSlice::new(contents, endian);

    while !input.is_empty() {
        if input.len() < 14 {
            return Err(Error::TruncatedPubnames);
        }

        // Table header: length, version, debug-info offset, debug-info
        // length. The length field counts the bytes that follow it.
        let mut header = input;
        let total = header.read_u32()? as usize + 4;
        header.skip(2)?;
        let info_offset = u64::from(header.read_u32()?);
        if total < 14 {
            return Err(Error::TruncatedPubnames);
        }

        let mut table = input.split(total)?;
        table.skip(14)?;

        let cu_index = find_cu(cus, DebugInfoOffset(base_offset + info_offset))?;

        loop {
            if table.is_empty() {
                break;
            }
            let offset = table.read_u32()?;
            if offset == 0 {
                break;
            }
            let ty = table.read_u8()?;
            let name = table.read_null_terminated_slice()?;
            records.push((
                cu_index,
                NameType {
                    hash: gdb_hash(name),
                    ty,
                    name,
                },
            ));
        }
    }

    Ok(())
}

// The contribution a table names must exist in the output; a miss means the
// offset bookkeeping is corrupted.
fn find_cu(cus: &[Compunit<'_>], offset: DebugInfoOffset) -> Result<usize> {
    cus.iter()
        .position(|cu| cu.offset == offset)
        .ok_or(Error::UnresolvedDebugInfoOffset(offset))
}
