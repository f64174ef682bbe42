//! Bounds-checked decoding of an archive buffer into an [`EntryIndex`]

use crate::archive::constants::{HEADER_SIZE, SIZE_FIELD};
use crate::archive::entry::{EntryRef, FileDescriptor};
use crate::archive::error::{ArchiveError, ArchiveResult};
use crate::archive::header::ArchiveHeader;
use crate::archive::index::EntryIndex;
use crate::diagnostics::{Diagnostics, Warning};
use binrw::BinRead;
use binrw::io::Cursor;
use tracing::debug;

/// Borrow `width` bytes at `offset`, or report the read as truncated
pub(crate) fn checked_slice(data: &[u8], offset: usize, width: usize) -> ArchiveResult<&[u8]> {
    offset
        .checked_add(width)
        .and_then(|end| data.get(offset..end))
        .ok_or(ArchiveError::Truncated {
            offset,
            width,
            len: data.len(),
        })
}

fn read_i32_at(data: &[u8], offset: usize) -> ArchiveResult<i32> {
    let bytes = checked_slice(data, offset, SIZE_FIELD)?;
    Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Read the NUL-terminated name at `offset`, returning it with its byte length
fn read_name_at(
    data: &[u8],
    offset: usize,
    diagnostics: &mut Diagnostics,
) -> ArchiveResult<(String, usize)> {
    let tail = data.get(offset..).ok_or(ArchiveError::Truncated {
        offset,
        width: 1,
        len: data.len(),
    })?;
    let len = tail
        .iter()
        .position(|&b| b == 0)
        .ok_or(ArchiveError::Truncated {
            offset,
            width: tail.len() + 1,
            len: data.len(),
        })?;

    let raw = &tail[..len];
    let name = match std::str::from_utf8(raw) {
        Ok(name) => name.to_string(),
        Err(_) => {
            let name = String::from_utf8_lossy(raw).into_owned();
            diagnostics.record(Warning::LossyEntryName { name: name.clone() });
            name
        }
    };

    Ok((name, len))
}

fn non_negative(value: i32, field: &'static str, slot: usize) -> ArchiveResult<u32> {
    u32::try_from(value).map_err(|_| ArchiveError::NegativeOffset { field, value, slot })
}

impl EntryIndex {
    /// Parse the entry table of an archive
    ///
    /// Warnings are logged and discarded; use [`EntryIndex::parse_with`] to
    /// keep them.
    pub fn parse(data: &[u8]) -> ArchiveResult<Self> {
        Self::parse_with(data, &mut Diagnostics::new())
    }

    /// Parse the entry table of an archive, recording warnings
    ///
    /// Every descriptor's payload range is checked against the buffer, so a
    /// successfully parsed index can be sliced without further checks.
    pub fn parse_with(data: &[u8], diagnostics: &mut Diagnostics) -> ArchiveResult<Self> {
        let header_bytes = checked_slice(data, 0, HEADER_SIZE)?;
        let header = ArchiveHeader::read(&mut Cursor::new(header_bytes))?;
        header.validate()?;

        if usize::try_from(header.total_size).ok() != Some(data.len()) {
            diagnostics.record(Warning::SizeMismatch {
                declared: header.total_size,
                actual: data.len(),
            });
        }

        let count = header.entries();
        debug!("Parsing {} entries", count);

        let table = checked_slice(data, HEADER_SIZE, count.saturating_mul(EntryRef::SIZE))?;
        let mut cursor = Cursor::new(table);
        let mut files = Vec::with_capacity(count);

        for slot in 0..count {
            let entry = EntryRef::read(&mut cursor)?;
            let info_pointer = non_negative(entry.info_pointer, "info pointer", slot)? as usize;
            let data_offset = non_negative(entry.data_offset, "data offset", slot)?;

            let (name, name_len) = read_name_at(data, info_pointer, diagnostics)?;
            let size = read_i32_at(data, info_pointer + name_len + 1)?;
            let size = u32::try_from(size).map_err(|_| ArchiveError::NegativeSize {
                name: name.clone(),
                size,
            })?;

            checked_slice(data, data_offset as usize, size as usize)?;
            files.push(FileDescriptor::new(name, size, data_offset));
        }

        Ok(Self::new(header, files))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::archive::constants::{MAGIC, MAGIC2};

    /// Hand-assembled archive with two entries:
    /// "a.bin" (3 bytes at 0x40) and "b" (4 bytes at 0x50)
    fn two_entry_archive() -> Vec<u8> {
        let mut data = vec![0u8; 0x60];
        data[0..4].copy_from_slice(&MAGIC.to_le_bytes());
        data[4..8].copy_from_slice(&0x60i32.to_le_bytes());
        data[8..12].copy_from_slice(&MAGIC2.to_le_bytes());
        data[12..16].copy_from_slice(&2i32.to_le_bytes());

        // entry table at 16: two slots + terminator, name block at 40
        data[16..20].copy_from_slice(&40i32.to_le_bytes());
        data[20..24].copy_from_slice(&0x40i32.to_le_bytes());
        data[24..28].copy_from_slice(&51i32.to_le_bytes());
        data[28..32].copy_from_slice(&0x50i32.to_le_bytes());

        data[40..46].copy_from_slice(b"a.bin\0");
        data[46..50].copy_from_slice(&3i32.to_le_bytes());
        data[51..53].copy_from_slice(b"b\0");
        data[53..57].copy_from_slice(&4i32.to_le_bytes());

        data[0x40..0x43].copy_from_slice(b"abc");
        data[0x50..0x54].copy_from_slice(b"wxyz");
        data
    }

    #[test]
    fn test_parse_entries() {
        let data = two_entry_archive();
        let mut diagnostics = Diagnostics::new();
        let index = EntryIndex::parse_with(&data, &mut diagnostics).expect("Should parse");

        assert!(diagnostics.is_empty());
        assert_eq!(index.len(), 2);
        assert_eq!(index.files()[0], FileDescriptor::new("a.bin", 3, 0x40));
        assert_eq!(index.files()[1], FileDescriptor::new("b", 4, 0x50));
        assert_eq!(index.by_offset(0x50).unwrap().name, "b");

        let b = &index.files()[1];
        assert_eq!(index.payload(&data, b).unwrap(), b"wxyz");
    }

    #[test]
    fn test_bad_magic() {
        let mut data = two_entry_archive();
        data[0] = b'X';
        let err = EntryIndex::parse(&data).unwrap_err();
        assert!(err.is_format_error());
        assert!(matches!(err, ArchiveError::InvalidMagic { .. }));
    }

    #[test]
    fn test_short_header() {
        let err = EntryIndex::parse(b"EHP\x03").unwrap_err();
        assert!(matches!(
            err,
            ArchiveError::Truncated {
                offset: 0,
                width: 16,
                len: 4
            }
        ));
    }

    #[test]
    fn test_entry_table_past_end() {
        let mut data = two_entry_archive();
        data[12..16].copy_from_slice(&100i32.to_le_bytes());
        assert!(EntryIndex::parse(&data).unwrap_err().is_truncation());
    }

    #[test]
    fn test_info_pointer_past_end() {
        let mut data = two_entry_archive();
        data[16..20].copy_from_slice(&0x1000i32.to_le_bytes());
        assert!(matches!(
            EntryIndex::parse(&data),
            Err(ArchiveError::Truncated { offset: 0x1000, .. })
        ));
    }

    #[test]
    fn test_unterminated_name() {
        let mut data = two_entry_archive();
        data[16..20].copy_from_slice(&0x5Ci32.to_le_bytes());
        data[0x5C..0x60].copy_from_slice(b"zzzz");
        assert!(EntryIndex::parse(&data).unwrap_err().is_truncation());
    }

    #[test]
    fn test_size_field_past_end() {
        let mut data = two_entry_archive();
        data[16..20].copy_from_slice(&0x5Ci32.to_le_bytes());
        data[0x5C..0x60].copy_from_slice(b"zz\0\0");
        assert!(matches!(
            EntryIndex::parse(&data),
            Err(ArchiveError::Truncated {
                offset: 0x5F,
                width: 4,
                ..
            })
        ));
    }

    #[test]
    fn test_payload_past_end() {
        let mut data = two_entry_archive();
        data[53..57].copy_from_slice(&0x100i32.to_le_bytes());
        assert!(matches!(
            EntryIndex::parse(&data),
            Err(ArchiveError::Truncated {
                offset: 0x50,
                width: 0x100,
                ..
            })
        ));
    }

    #[test]
    fn test_negative_fields() {
        let mut data = two_entry_archive();
        data[46..50].copy_from_slice(&(-5i32).to_le_bytes());
        assert!(matches!(
            EntryIndex::parse(&data),
            Err(ArchiveError::NegativeSize { size: -5, .. })
        ));

        let mut data = two_entry_archive();
        data[28..32].copy_from_slice(&(-16i32).to_le_bytes());
        assert!(matches!(
            EntryIndex::parse(&data),
            Err(ArchiveError::NegativeOffset {
                field: "data offset",
                slot: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_size_mismatch_is_a_warning() {
        let mut data = two_entry_archive();
        data[4..8].copy_from_slice(&0x70i32.to_le_bytes());
        let mut diagnostics = Diagnostics::new();
        let index = EntryIndex::parse_with(&data, &mut diagnostics).expect("Should parse");

        assert_eq!(index.len(), 2);
        assert_eq!(
            diagnostics.warnings(),
            &[Warning::SizeMismatch {
                declared: 0x70,
                actual: 0x60
            }]
        );
    }

    #[test]
    fn test_lossy_name_is_a_warning() {
        let mut data = two_entry_archive();
        data[51] = 0xFF;
        let mut diagnostics = Diagnostics::new();
        let index = EntryIndex::parse_with(&data, &mut diagnostics).expect("Should parse");

        assert_eq!(index.files()[1].name, "\u{FFFD}");
        assert!(matches!(
            diagnostics.warnings(),
            [Warning::LossyEntryName { .. }]
        ));
    }
}
