//! Serialization of a planned archive

use crate::archive::entry::{EntryInfo, EntryRef};
use crate::archive::error::ArchiveResult;
use crate::archive::header::ArchiveHeader;
use crate::archive::layout::{ArchiveLayout, PlannedPayload};
use crate::diagnostics::Diagnostics;
use crate::pointer;
use binrw::BinWrite;
use binrw::io::Cursor;
use tracing::debug;

/// Writes the bytes of an [`ArchiveLayout`]
///
/// The layout fixes every offset, so building only fills a zeroed buffer:
/// header, entry table with its terminator, name/size block, then payloads.
/// Pointer tables are encoded against the layout's final offsets here.
#[derive(Debug, Clone, Copy)]
pub struct ArchiveBuilder<'l, 'a> {
    layout: &'l ArchiveLayout<'a>,
}

impl<'l, 'a> ArchiveBuilder<'l, 'a> {
    /// Create a builder for `layout`
    pub fn new(layout: &'l ArchiveLayout<'a>) -> Self {
        Self { layout }
    }

    /// Produce the archive bytes
    ///
    /// Only allocating the output can fail; unresolved pointer targets are
    /// written as NULL and recorded in `diagnostics`.
    pub fn build(&self, diagnostics: &mut Diagnostics) -> ArchiveResult<Vec<u8>> {
        let layout = self.layout;
        let total = layout.total_size as usize;

        let mut data = Vec::new();
        data.try_reserve_exact(total)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::OutOfMemory, e))?;
        data.resize(total, 0);

        let header = ArchiveHeader::new(layout.total_size as i32, layout.entries.len() as i32);
        let mut cursor = Cursor::new(data.as_mut_slice());
        header.write(&mut cursor)?;

        for entry in &layout.entries {
            EntryRef::new(entry.info_pointer as i32, entry.offset as i32).write(&mut cursor)?;
        }
        EntryRef::TERMINATOR.write(&mut cursor)?;

        let mut names = Vec::new();
        for entry in &layout.entries {
            EntryInfo::new(entry.name.as_str(), entry.binary_size as i32).write_to(&mut names);
        }
        let name_block = layout.name_block_offset();
        data[name_block..name_block + names.len()].copy_from_slice(&names);

        for entry in &layout.entries {
            let start = entry.offset as usize;
            match &entry.payload {
                PlannedPayload::Padding => {}
                PlannedPayload::Raw(bytes) => {
                    data[start..start + bytes.len()].copy_from_slice(bytes);
                }
                PlannedPayload::Pointers(table) => {
                    debug!("Resolving pointers for {}", entry.name);
                    let bytes =
                        pointer::reference(&entry.name, table, &layout.offsets, diagnostics);
                    data[start..start + bytes.len()].copy_from_slice(&bytes);
                }
            }
        }

        debug!(
            "Built archive with {} entries ({} bytes)",
            layout.entries.len(),
            data.len()
        );
        Ok(data)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::archive::constants::{MAGIC, MAGIC2};
    use crate::archive::layout::LayoutPlanner;
    use crate::archive::session::RepackEntry;
    use crate::diagnostics::Warning;
    use pretty_assertions::assert_eq;

    fn build(entries: &[RepackEntry]) -> (Vec<u8>, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let layout = LayoutPlanner::new(false)
            .plan(entries, &mut diagnostics)
            .expect("Should plan");
        let data = ArchiveBuilder::new(&layout)
            .build(&mut diagnostics)
            .expect("Should build");
        (data, diagnostics)
    }

    fn i32_at(data: &[u8], offset: usize) -> i32 {
        i32::from_le_bytes(data[offset..offset + 4].try_into().unwrap())
    }

    #[test]
    fn test_build_bytes() {
        let (data, diagnostics) = build(&[
            RepackEntry::bytes("b", b"wxyz".to_vec()),
            RepackEntry::bytes("a.bin", b"abc".to_vec()),
        ]);

        assert!(diagnostics.is_empty());
        assert_eq!(data.len(), 0x60);
        assert_eq!(i32_at(&data, 0) as u32, MAGIC);
        assert_eq!(i32_at(&data, 4), 0x60);
        assert_eq!(i32_at(&data, 8) as u32, MAGIC2);
        assert_eq!(i32_at(&data, 12), 2);

        // entry table
        assert_eq!(i32_at(&data, 16), 40);
        assert_eq!(i32_at(&data, 20), 0x40);
        assert_eq!(i32_at(&data, 24), 50);
        assert_eq!(i32_at(&data, 28), 0x50);
        assert_eq!(&data[32..40], &[0; 8]);

        // name block
        assert_eq!(&data[40..46], b"a.bin\0");
        assert_eq!(i32_at(&data, 46), 3);
        assert_eq!(&data[50..52], b"b\0");
        assert_eq!(i32_at(&data, 52), 4);

        assert_eq!(&data[0x40..0x44], b"abc\0");
        assert_eq!(&data[0x50..0x54], b"wxyz");
    }

    #[test]
    fn test_build_pointer_table() {
        let (data, diagnostics) = build(&[
            RepackEntry::bytes("a.bin", vec![7; 5]),
            RepackEntry::text("bg-ptrs.txt", "a.bin\nNULL\nmissing.bin\nEND"),
        ]);

        let table_offset = i32_at(&data, 28) as usize;
        assert_eq!(i32_at(&data, table_offset), i32_at(&data, 20));
        assert_eq!(i32_at(&data, table_offset + 4), 0);
        assert_eq!(i32_at(&data, table_offset + 8), 0);
        assert_eq!(i32_at(&data, table_offset + 12), -1);
        assert_eq!(
            diagnostics.warnings(),
            &[Warning::UnresolvedReference {
                table: "bg-ptrs.txt".to_string(),
                target: "missing.bin".to_string()
            }]
        );
    }

    #[test]
    fn test_padding_is_zero_filled() {
        let (data, _) = build(&[RepackEntry::bytes("pad#10.txt", b"text".to_vec())]);
        let offset = i32_at(&data, 20) as usize;
        assert_eq!(data.len(), offset + 0x10);
        assert_eq!(&data[offset..], &[0; 0x10]);
    }

    #[test]
    fn test_empty_archive() {
        let (data, _) = build(&[]);
        assert_eq!(data.len(), 0x20);
        assert_eq!(i32_at(&data, 12), 0);
        assert_eq!(&data[16..], &[0; 16]);
    }
}
