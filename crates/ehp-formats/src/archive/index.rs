//! Parsed entry index with offset lookup

use crate::archive::entry::FileDescriptor;
use crate::archive::error::{ArchiveError, ArchiveResult};
use crate::archive::header::ArchiveHeader;
use std::collections::HashMap;

/// Entries of one archive in table order, plus a `data_offset` lookup
///
/// The lookup is what pointer tables are resolved against. When several
/// entries share a payload offset (zero-sized entries followed by another
/// entry) the one appearing last in the table wins.
#[derive(Debug, Clone)]
pub struct EntryIndex {
    /// Header the index was parsed from
    pub header: ArchiveHeader,
    files: Vec<FileDescriptor>,
    by_offset: HashMap<u32, usize>,
}

impl EntryIndex {
    /// Build an index from descriptors in table order
    pub fn new(header: ArchiveHeader, files: Vec<FileDescriptor>) -> Self {
        let by_offset = files
            .iter()
            .enumerate()
            .map(|(position, file)| (file.data_offset, position))
            .collect();

        Self {
            header,
            files,
            by_offset,
        }
    }

    /// Descriptors in entry table order
    pub fn files(&self) -> &[FileDescriptor] {
        &self.files
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if the archive has no entries
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Find the entry whose payload starts at `offset`
    pub fn by_offset(&self, offset: i32) -> Option<&FileDescriptor> {
        let offset = u32::try_from(offset).ok()?;
        self.by_offset
            .get(&offset)
            .and_then(|&position| self.files.get(position))
    }

    /// Find an entry by its archive name
    pub fn by_name(&self, name: &str) -> Option<&FileDescriptor> {
        self.files.iter().find(|file| file.name == name)
    }

    /// Payload bytes of `file` within `data`
    pub fn payload<'a>(&self, data: &'a [u8], file: &FileDescriptor) -> ArchiveResult<&'a [u8]> {
        let range = file.data_range();
        data.get(range.clone()).ok_or(ArchiveError::Truncated {
            offset: range.start,
            width: range.len(),
            len: data.len(),
        })
    }
}
