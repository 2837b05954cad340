//! Locating a compilation unit's declaration in `.debug_abbrev`.

use crate::constants;
use crate::endian_slice::EndianSlice;
use crate::endianity::Endianity;
use crate::{Error, Result};

/// Find the abbreviation record for a unit's root debug-info record.
///
/// `debug_abbrev` covers the whole `.debug_abbrev` section; `abbrev_offset`
/// is the table offset from the unit header, and `code` is the ULEB
/// abbreviation code read from the first byte of the unit's own data.
///
/// The root record of a unit must describe the unit itself, so the matched
/// record's tag has to be `DW_TAG_compile_unit` or `DW_TAG_skeleton_unit`.
/// On success the returned cursor points at the record's first attribute
/// specification, just past the has-children byte.
pub fn locate_unit_abbrev<'input, E>(
    debug_abbrev: EndianSlice<'input, E>,
    abbrev_offset: u64,
    code: u64,
) -> Result<EndianSlice<'input, E>>
where
    E: Endianity,
{
    let mut input = debug_abbrev;
    input.skip(abbrev_offset as usize)?;

    loop {
        let candidate = input.read_uleb128()?;
        if candidate == 0 {
            return Err(Error::MissingUnitAbbreviation(code));
        }

        let tag = constants::DwTag(input.read_uleb128()?);
        input.skip(1)?; // has_children

        if candidate == code {
            if tag != constants::DW_TAG_compile_unit
                && tag != constants::DW_TAG_skeleton_unit
            {
                return Err(Error::UnexpectedUnitTag(tag));
            }
            return Ok(input);
        }

        // Skip an uninteresting record's attribute specifications.
        loop {
            let name = input.read_uleb128()?;
            let form = input.read_uleb128()?;
            if name == 0 && form == 0 {
                break;
            }
            // `DW_FORM_implicit_const` stores its value inline in the
            // abbreviation table.
            if constants::DwForm(form) == constants::DW_FORM_implicit_const {
                input.read_uleb128()?;
            }
        }
    }
}
