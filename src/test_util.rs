#![allow(missing_docs)]

use test_assembler::Section;

/// DWARF-flavored additions to `test_assembler::Section`.
pub trait SectionMethods {
    fn uleb(self, val: u64) -> Self;
    fn word(self, size: u8, val: u64) -> Self;
}

impl SectionMethods for Section {
    fn uleb(self, val: u64) -> Self {
        let mut buf = Vec::new();
        let written = leb128::write::unsigned(&mut buf, val).unwrap();
        self.append_bytes(&buf[0..written])
    }

    fn word(self, size: u8, val: u64) -> Self {
        match size {
            4 => self.L32(val as u32),
            8 => self.L64(val),
            _ => panic!("unsupported word size"),
        }
    }
}
