//! EHP archive container
//!
//! An EHP archive is a flat list of named payloads behind a small index:
//!
//! ```text
//! +----------------------+ 0
//! | header (16 bytes)    |  "EHP\x03", total size, "NOT ", entry count
//! +----------------------+ 16
//! | entry table          |  (count + 1) x {info pointer, data offset}
//! +----------------------+
//! | name/size block      |  per entry: name, NUL, i32 size
//! +----------------------+ aligned to 16
//! | payloads             |  each starting on a 16-byte boundary
//! +----------------------+ total size
//! ```
//!
//! All integers are little-endian.
//!
//! Unpacking goes through [`EntryIndex::parse`] and the pointer
//! dereferencer; repacking through [`LayoutPlanner`] and [`ArchiveBuilder`].
//! [`ArchiveSession`] wraps both directions.

mod builder;
pub mod collate;
mod entry;
mod error;
mod header;
mod index;
mod layout;
pub mod naming;
mod parser;
mod session;

pub use builder::ArchiveBuilder;
pub use entry::{EntryInfo, EntryRef, FileDescriptor, record_len};
pub use error::{ArchiveError, ArchiveResult, LayoutError};
pub use header::ArchiveHeader;
pub use index::EntryIndex;
pub use layout::{ArchiveLayout, LayoutPlanner, PlannedEntry, PlannedPayload};
pub use session::{
    ArchiveSession, EntryContent, EntryPlacement, RepackEntry, RepackedArchive, UnpackedArchive,
    UnpackedEntry, repack_archive, unpack_archive,
};

/// Format constants
pub mod constants {
    /// Primary signature, `"EHP\x03"` read as a little-endian `u32`
    pub const MAGIC: u32 = 0x0350_4845;

    /// Secondary signature, `"NOT "` read as a little-endian `u32`
    pub const MAGIC2: u32 = 0x2054_4F4E;

    /// Size of the archive header
    pub const HEADER_SIZE: usize = 16;

    /// Size of one entry table slot
    pub const ENTRY_REF_SIZE: usize = 8;

    /// Size of the payload size field following each name
    pub const SIZE_FIELD: usize = 4;

    /// Payload alignment
    pub const ALIGNMENT: u64 = 16;

    /// Name suffix marking pointer tables
    pub const POINTER_TABLE_SUFFIX: &str = "-ptrs.txt";

    /// Round `value` up to the next multiple of [`ALIGNMENT`]
    pub fn align16(value: u64) -> Option<u64> {
        value
            .checked_add(ALIGNMENT - 1)
            .map(|v| v & !(ALIGNMENT - 1))
    }

}
