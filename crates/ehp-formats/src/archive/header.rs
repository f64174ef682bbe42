//! Fixed 16-byte archive header

use crate::archive::constants::{ENTRY_REF_SIZE, HEADER_SIZE, MAGIC, MAGIC2};
use crate::archive::error::{ArchiveError, ArchiveResult};
use binrw::{BinRead, BinWrite};
use serde::Serialize;

/// EHP archive header
///
/// Layout (all little-endian):
/// - Magic `EHP\x03` (4 bytes)
/// - Total archive size (4 bytes, signed)
/// - Secondary magic `NOT ` (4 bytes)
/// - Entry count (4 bytes, signed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite, Serialize)]
#[brw(little)]
pub struct ArchiveHeader {
    /// Primary signature
    pub magic: u32,
    /// Archive length in bytes
    pub total_size: i32,
    /// Secondary signature
    pub magic2: u32,
    /// Number of real entries (the entry table holds one more, the terminator)
    pub entry_count: i32,
}

impl ArchiveHeader {
    /// Create a header with both signatures filled in
    pub fn new(total_size: i32, entry_count: i32) -> Self {
        Self {
            magic: MAGIC,
            total_size,
            magic2: MAGIC2,
            entry_count,
        }
    }

    /// Validate the header fields
    pub fn validate(&self) -> ArchiveResult<()> {
        if self.magic != MAGIC {
            return Err(ArchiveError::InvalidMagic {
                expected: MAGIC,
                actual: self.magic,
            });
        }

        if self.magic2 != MAGIC2 {
            return Err(ArchiveError::InvalidSecondaryMagic {
                expected: MAGIC2,
                actual: self.magic2,
            });
        }

        if self.entry_count < 0 {
            return Err(ArchiveError::InvalidEntryCount(self.entry_count));
        }

        Ok(())
    }

    /// Number of entries, assuming the header has been validated
    pub fn entries(&self) -> usize {
        self.entry_count.max(0) as usize
    }

    /// Size of the entry table including the terminator slot
    pub fn entry_table_size(&self) -> usize {
        (self.entries() + 1) * ENTRY_REF_SIZE
    }

    /// Offset of the first byte after the entry table
    pub fn name_block_offset(&self) -> usize {
        HEADER_SIZE + self.entry_table_size()
    }
}
