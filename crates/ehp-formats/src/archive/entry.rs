//! Entry table records and parsed file descriptors

use crate::archive::constants::{ENTRY_REF_SIZE, SIZE_FIELD};
use crate::archive::naming;
use binrw::{BinRead, BinWrite};
use serde::Serialize;
use std::ops::Range;

/// One slot of the on-disk entry table
///
/// The table holds `entry_count + 1` slots; the last one is all zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, BinRead, BinWrite)]
#[brw(little)]
pub struct EntryRef {
    /// Offset of the entry's name/size record
    pub info_pointer: i32,
    /// Offset of the entry's payload
    pub data_offset: i32,
}

impl EntryRef {
    /// Size of one slot in bytes
    pub const SIZE: usize = ENTRY_REF_SIZE;

    /// The zero/zero slot closing the table
    pub const TERMINATOR: Self = Self {
        info_pointer: 0,
        data_offset: 0,
    };

    /// Create a new entry reference
    pub fn new(info_pointer: i32, data_offset: i32) -> Self {
        Self {
            info_pointer,
            data_offset,
        }
    }

    /// Check if this is the terminator slot
    pub fn is_terminator(&self) -> bool {
        *self == Self::TERMINATOR
    }
}

/// Name/size record stored in the name block
///
/// On disk: name bytes, a NUL terminator, then a little-endian `i32` size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    /// Entry name without the terminator
    pub name: String,
    /// Payload size in bytes
    pub size: i32,
}

impl EntryInfo {
    /// Create a new name/size record
    pub fn new(name: impl Into<String>, size: i32) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    /// Bytes occupied in the name block
    pub fn encoded_len(&self) -> usize {
        record_len(&self.name)
    }

    /// Append the on-disk form to `out`
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.name.as_bytes());
        out.push(0);
        out.extend_from_slice(&self.size.to_le_bytes());
    }
}

/// Bytes a name occupies in the name block: name, NUL, size field
pub fn record_len(name: &str) -> usize {
    name.len() + 1 + SIZE_FIELD
}

/// Parsed entry: where its payload lives and how large it is
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDescriptor {
    /// Name as stored in the archive
    pub name: String,
    /// Payload size in bytes
    pub size: u32,
    /// Offset of the payload within the archive
    pub data_offset: u32,
}

impl FileDescriptor {
    /// Create a new descriptor
    pub fn new(name: impl Into<String>, size: u32, data_offset: u32) -> Self {
        Self {
            name: name.into(),
            size,
            data_offset,
        }
    }

    /// Byte range of the payload within the archive
    pub fn data_range(&self) -> Range<usize> {
        let start = self.data_offset as usize;
        start..start + self.size as usize
    }

    /// Check if the payload is a pointer table
    pub fn is_pointer_table(&self) -> bool {
        naming::is_pointer_table(&self.name)
    }

    /// Check if the entry only reserves zero-filled space
    pub fn is_padding(&self) -> bool {
        naming::padding_size(&self.name).is_some()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use binrw::io::Cursor;

    #[test]
    fn test_entry_ref_layout() {
        let entry = EntryRef::new(0x28, 0x40);
        let mut cursor = Cursor::new(Vec::new());
        entry.write(&mut cursor).expect("Should write entry");
        let data = cursor.into_inner();

        assert_eq!(data, [0x28, 0, 0, 0, 0x40, 0, 0, 0]);
        assert!(!entry.is_terminator());
        assert!(EntryRef::TERMINATOR.is_terminator());
    }

    #[test]
    fn test_entry_info_encoding() {
        let info = EntryInfo::new("ab.bin", 0x1F);
        let mut out = Vec::new();
        info.write_to(&mut out);

        assert_eq!(info.encoded_len(), 11);
        assert_eq!(out, b"ab.bin\0\x1F\0\0\0");
    }

    #[test]
    fn test_record_len_counts_utf8_bytes() {
        assert_eq!(record_len("é.bin"), "é.bin".len() + 5);
        assert_eq!(record_len(""), 5);
    }

    #[test]
    fn test_descriptor_classification() {
        let file = FileDescriptor::new("bg-ptrs.txt", 8, 0x30);
        assert!(file.is_pointer_table());
        assert!(!file.is_padding());
        assert_eq!(file.data_range(), 0x30..0x38);

        let pad = FileDescriptor::new("zz_pad#20.txt", 0x20, 0x40);
        assert!(pad.is_padding());
        assert!(!pad.is_pointer_table());
    }
}
