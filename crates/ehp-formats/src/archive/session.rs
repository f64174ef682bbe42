//! Unpack and repack entry points
//!
//! An [`ArchiveSession`] carries the only option the codec has, custom mode,
//! so nothing lives in global state. Each call builds and discards its own
//! index and layout.
//!
//! ```rust
//! use ehp_formats::archive::{ArchiveSession, RepackEntry};
//!
//! let session = ArchiveSession::new(false);
//! let repacked = session.repack(&[
//!     RepackEntry::bytes("model.bin", vec![1, 2, 3]),
//!     RepackEntry::text("model-ptrs.txt", "model.bin\nEND"),
//! ])?;
//!
//! let unpacked = session.unpack(&repacked.data)?;
//! assert_eq!(unpacked.entries.len(), 2);
//! assert_eq!(
//!     unpacked.entry("model-ptrs.txt").map(|e| e.bytes().into_owned()),
//!     Some(b"model.bin\nEND".to_vec())
//! );
//! # Ok::<(), ehp_formats::archive::ArchiveError>(())
//! ```

use crate::archive::builder::ArchiveBuilder;
use crate::archive::error::ArchiveResult;
use crate::archive::header::ArchiveHeader;
use crate::archive::index::EntryIndex;
use crate::archive::layout::LayoutPlanner;
use crate::archive::naming;
use crate::diagnostics::{Diagnostics, Warning};
use crate::pointer::{self, PointerTable};
use serde::Serialize;
use std::borrow::Cow;
use tracing::{debug, info};

/// Content of one entry as seen by collaborators
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryContent {
    /// Opaque payload bytes (also used for pointer-table text)
    Bytes(Vec<u8>),
    /// Decoded pointer table
    PointerTable(PointerTable),
    /// Zero-filled space of the given size
    Padding(u32),
}

impl EntryContent {
    /// Short label for listings
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bytes(_) => "data",
            Self::PointerTable(_) => "pointers",
            Self::Padding(_) => "padding",
        }
    }
}

/// Entry extracted from an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpackedEntry {
    /// Name shown to collaborators (custom-mode alias applied)
    pub name: String,
    /// Name stored in the archive
    pub archive_name: String,
    /// Payload size recorded in the archive
    pub size: u32,
    /// Payload offset in the archive
    pub data_offset: u32,
    /// Decoded content
    pub content: EntryContent,
}

impl UnpackedEntry {
    /// Bytes a collaborator stores for this entry
    ///
    /// Pointer tables yield their text form, padding yields nothing.
    pub fn bytes(&self) -> Cow<'_, [u8]> {
        match &self.content {
            EntryContent::Bytes(bytes) => Cow::Borrowed(bytes.as_slice()),
            EntryContent::PointerTable(table) => Cow::Owned(table.to_string().into_bytes()),
            EntryContent::Padding(_) => Cow::Borrowed(&[]),
        }
    }
}

/// Result of [`ArchiveSession::unpack`]
#[derive(Debug, Clone)]
pub struct UnpackedArchive {
    /// Parsed header
    pub header: ArchiveHeader,
    /// Entries in archive order
    pub entries: Vec<UnpackedEntry>,
    /// Non-fatal findings
    pub warnings: Vec<Warning>,
    /// Whether custom-mode aliases were applied
    pub custom_mode: bool,
}

impl UnpackedArchive {
    /// Entries in the shape [`ArchiveSession::repack`] accepts
    pub fn repack_entries(&self) -> Vec<RepackEntry> {
        self.entries
            .iter()
            .map(|entry| RepackEntry {
                name: entry.name.clone(),
                content: entry.content.clone(),
            })
            .collect()
    }

    /// Find an entry by its collaborator-facing name
    pub fn entry(&self, name: &str) -> Option<&UnpackedEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }
}

/// Named entry handed to [`ArchiveSession::repack`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepackEntry {
    /// Collaborator-facing name
    pub name: String,
    /// Content to store
    pub content: EntryContent,
}

impl RepackEntry {
    /// Entry holding raw bytes (pointer tables given this way are parsed as text)
    pub fn bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content: EntryContent::Bytes(bytes),
        }
    }

    /// Entry holding text, typically an edited pointer table
    pub fn text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::bytes(name, text.into().into_bytes())
    }

    /// Entry holding an already decoded pointer table
    pub fn pointer_table(name: impl Into<String>, table: PointerTable) -> Self {
        Self {
            name: name.into(),
            content: EntryContent::PointerTable(table),
        }
    }

    /// Entry reserving `size` zero bytes
    pub fn padding(name: impl Into<String>, size: u32) -> Self {
        Self {
            name: name.into(),
            content: EntryContent::Padding(size),
        }
    }
}

/// Where an entry landed in a repacked archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryPlacement {
    /// Name stored in the archive
    pub name: String,
    /// Payload offset
    pub offset: u32,
    /// Offset of the name/size record
    pub info_pointer: u32,
    /// Recorded payload size
    pub size: u32,
}

/// Result of [`ArchiveSession::repack`]
#[derive(Debug, Clone)]
pub struct RepackedArchive {
    /// Archive bytes
    pub data: Vec<u8>,
    /// Entries in write order
    pub layout: Vec<EntryPlacement>,
    /// Non-fatal findings
    pub warnings: Vec<Warning>,
}

/// Codec options shared by unpack and repack
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveSession {
    /// Translate `all-ptrs.txt`/`alletc-ptrs.txt` to and from their
    /// `_anim-ptrs.txt`/`_animetc-ptrs.txt` aliases
    pub custom_mode: bool,
}

impl ArchiveSession {
    /// Create a session
    pub fn new(custom_mode: bool) -> Self {
        Self { custom_mode }
    }

    /// Decode every entry of `data`, dereferencing pointer tables
    pub fn unpack(&self, data: &[u8]) -> ArchiveResult<UnpackedArchive> {
        let mut diagnostics = Diagnostics::new();
        let index = EntryIndex::parse_with(data, &mut diagnostics)?;
        let mut entries = Vec::with_capacity(index.len());

        for file in index.files() {
            let payload = index.payload(data, file)?;
            let content = if file.is_padding() {
                EntryContent::Padding(file.size)
            } else if file.is_pointer_table() {
                EntryContent::PointerTable(pointer::dereference(
                    file,
                    payload,
                    &index,
                    &mut diagnostics,
                ))
            } else {
                EntryContent::Bytes(payload.to_vec())
            };

            entries.push(UnpackedEntry {
                name: naming::to_display_name(&file.name, self.custom_mode).to_string(),
                archive_name: file.name.clone(),
                size: file.size,
                data_offset: file.data_offset,
                content,
            });
        }

        info!(
            "Unpacked {} entries with {} warnings",
            entries.len(),
            diagnostics.len()
        );
        Ok(UnpackedArchive {
            header: index.header,
            entries,
            warnings: diagnostics.into_warnings(),
            custom_mode: self.custom_mode,
        })
    }

    /// Build a new archive from `entries`
    ///
    /// Unresolved pointer targets never fail the call; they are written as
    /// NULL and reported in [`RepackedArchive::warnings`].
    pub fn repack(&self, entries: &[RepackEntry]) -> ArchiveResult<RepackedArchive> {
        let mut diagnostics = Diagnostics::new();
        let layout = LayoutPlanner::new(self.custom_mode).plan(entries, &mut diagnostics)?;
        debug!("Writing {} bytes", layout.total_size);
        let data = ArchiveBuilder::new(&layout).build(&mut diagnostics)?;

        let placements = layout
            .entries
            .iter()
            .map(|entry| EntryPlacement {
                name: entry.name.clone(),
                offset: entry.offset,
                info_pointer: entry.info_pointer,
                size: entry.binary_size,
            })
            .collect();

        info!(
            "Repacked {} entries into {} bytes with {} warnings",
            entries.len(),
            data.len(),
            diagnostics.len()
        );
        Ok(RepackedArchive {
            data,
            layout: placements,
            warnings: diagnostics.into_warnings(),
        })
    }
}

/// Unpack `data` with a one-off session
pub fn unpack_archive(data: &[u8], custom_mode: bool) -> ArchiveResult<UnpackedArchive> {
    ArchiveSession::new(custom_mode).unpack(data)
}

/// Repack `entries` with a one-off session
pub fn repack_archive(entries: &[RepackEntry], custom_mode: bool) -> ArchiveResult<RepackedArchive> {
    ArchiveSession::new(custom_mode).repack(entries)
}
