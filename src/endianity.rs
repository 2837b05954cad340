//! Types for compile-time endianity of the parsed debug sections.
//!
//! Endianity only governs the parse side: the emitted `.gdb_index` payload
//! is always little-endian, whatever the target.

use byteorder::ByteOrder;
use std::fmt::Debug;

/// A trait describing the endianity of the DWARF sections being indexed.
///
/// All interesting methods are defaulted.
pub trait Endianity:
    Debug + Default + Clone + Copy + PartialEq + Eq + Send + Sync
{
    /// Return true for big endian byte order.
    fn is_big_endian(self) -> bool;

    /// Return true for little endian byte order.
    #[inline]
    fn is_little_endian(self) -> bool {
        !self.is_big_endian()
    }

    /// Reads an unsigned 16 bit integer from `buf`.
    ///
    /// # Panics
    ///
    /// Panics when `buf.len() < 2`.
    #[inline]
    fn read_u16(self, buf: &[u8]) -> u16 {
        if self.is_big_endian() {
            byteorder::BigEndian::read_u16(buf)
        } else {
            byteorder::LittleEndian::read_u16(buf)
        }
    }

    /// Reads an unsigned 24 bit integer from `buf`, zero-extended to `u32`.
    ///
    /// # Panics
    ///
    /// Panics when `buf.len() < 3`.
    #[inline]
    fn read_u24(self, buf: &[u8]) -> u32 {
        if self.is_big_endian() {
            byteorder::BigEndian::read_u24(buf)
        } else {
            byteorder::LittleEndian::read_u24(buf)
        }
    }

    /// Reads an unsigned 32 bit integer from `buf`.
    ///
    /// # Panics
    ///
    /// Panics when `buf.len() < 4`.
    #[inline]
    fn read_u32(self, buf: &[u8]) -> u32 {
        if self.is_big_endian() {
            byteorder::BigEndian::read_u32(buf)
        } else {
            byteorder::LittleEndian::read_u32(buf)
        }
    }

    /// Reads an unsigned 64 bit integer from `buf`.
    ///
    /// # Panics
    ///
    /// Panics when `buf.len() < 8`.
    #[inline]
    fn read_u64(self, buf: &[u8]) -> u64 {
        if self.is_big_endian() {
            byteorder::BigEndian::read_u64(buf)
        } else {
            byteorder::LittleEndian::read_u64(buf)
        }
    }
}

/// Little endian byte order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LittleEndian;

impl Endianity for LittleEndian {
    #[inline]
    fn is_big_endian(self) -> bool {
        false
    }
}

/// Big endian byte order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BigEndian;

impl Endianity for BigEndian {
    #[inline]
    fn is_big_endian(self) -> bool {
        true
    }
}

/// The native endianity for the host platform.
#[cfg(target_endian = "little")]
pub type NativeEndian = LittleEndian;

/// The native endianity for the host platform.
#[cfg(target_endian = "big")]
pub type NativeEndian = BigEndian;
