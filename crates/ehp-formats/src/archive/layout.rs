//! Offset planning for a new archive
//!
//! Given the entries of a project, decide their order and every offset the
//! builder will write: info pointers into the name block and 16-aligned
//! payload offsets. Pointer tables are sized here, from their slot count,
//! before any of their targets are resolved.

use crate::archive::collate;
use crate::archive::constants::{ENTRY_REF_SIZE, HEADER_SIZE, align16};
use crate::archive::entry::record_len;
use crate::archive::error::{ArchiveResult, LayoutError};
use crate::archive::naming;
use crate::archive::session::{EntryContent, RepackEntry};
use crate::diagnostics::Diagnostics;
use crate::pointer::PointerTable;
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// What the builder writes into an entry's payload range
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedPayload<'a> {
    /// Bytes copied verbatim
    Raw(Cow<'a, [u8]>),
    /// Pointer table encoded against the final offsets
    Pointers(Cow<'a, PointerTable>),
    /// Zero bytes, nothing written
    Padding,
}

/// One entry with its final name and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedEntry<'a> {
    /// Name stored in the archive
    pub name: String,
    /// Payload source
    pub payload: PlannedPayload<'a>,
    /// Size recorded in the name block
    pub binary_size: u32,
    /// Payload offset
    pub offset: u32,
    /// Offset of the name/size record
    pub info_pointer: u32,
}

/// Complete plan for one archive
#[derive(Debug, Clone)]
pub struct ArchiveLayout<'a> {
    /// Entries in write order
    pub entries: Vec<PlannedEntry<'a>>,
    /// Final payload offset of every entry by archive name
    pub offsets: HashMap<String, u32>,
    /// Offset of the first payload
    pub data_start: u32,
    /// Length of the finished archive
    pub total_size: u32,
}

impl ArchiveLayout<'_> {
    /// Offset of the name/size block
    pub fn name_block_offset(&self) -> usize {
        HEADER_SIZE + (self.entries.len() + 1) * ENTRY_REF_SIZE
    }
}

/// Computes an [`ArchiveLayout`] from project entries
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutPlanner {
    custom_mode: bool,
}

impl LayoutPlanner {
    /// Create a planner, applying the custom-mode aliases when `custom_mode` is set
    pub fn new(custom_mode: bool) -> Self {
        Self { custom_mode }
    }

    /// Plan the archive holding `entries`
    ///
    /// Pointer tables supplied as text are parsed here, so problems in them
    /// land in `diagnostics`.
    pub fn plan<'a>(
        &self,
        entries: &'a [RepackEntry],
        diagnostics: &mut Diagnostics,
    ) -> ArchiveResult<ArchiveLayout<'a>> {
        let mut planned = Vec::with_capacity(entries.len());
        let mut seen = HashSet::with_capacity(entries.len());

        for entry in entries {
            let name = naming::to_archive_name(&entry.name, self.custom_mode);
            if name != entry.name {
                debug!("Mapping custom pointer file {} to {}", entry.name, name);
            }
            if name.contains('\0') {
                return Err(LayoutError::InvalidName(name.to_string()).into());
            }
            if !seen.insert(name) {
                return Err(LayoutError::DuplicateName(name.to_string()).into());
            }

            let (payload, size) = classify(name, &entry.content, diagnostics);
            let binary_size = fits_i32(size, || format!("Size of {name}"))?;
            planned.push(PlannedEntry {
                name: name.to_string(),
                payload,
                binary_size,
                offset: 0,
                info_pointer: 0,
            });
        }

        collate::sort_names(&mut planned, |entry| entry.name.as_str());
        assign_offsets(planned)
    }
}

/// Decide how an entry is stored and how many bytes it occupies
fn classify<'a>(
    name: &str,
    content: &'a EntryContent,
    diagnostics: &mut Diagnostics,
) -> (PlannedPayload<'a>, u64) {
    if let Some(size) = naming::padding_size(name) {
        return (PlannedPayload::Padding, size);
    }

    if naming::is_pointer_table(name) {
        let table = match content {
            EntryContent::PointerTable(table) => Cow::Borrowed(table),
            EntryContent::Bytes(bytes) => Cow::Owned(PointerTable::from_text(
                name,
                &String::from_utf8_lossy(bytes),
                diagnostics,
            )),
            EntryContent::Padding(_) => Cow::Owned(PointerTable::from_text(name, "", diagnostics)),
        };
        let size = table.binary_size() as u64;
        return (PlannedPayload::Pointers(table), size);
    }

    match content {
        EntryContent::Bytes(bytes) => (
            PlannedPayload::Raw(Cow::Borrowed(bytes.as_slice())),
            bytes.len() as u64,
        ),
        EntryContent::PointerTable(table) => {
            let text = table.to_string().into_bytes();
            let size = text.len() as u64;
            (PlannedPayload::Raw(Cow::Owned(text)), size)
        }
        EntryContent::Padding(size) => (PlannedPayload::Padding, u64::from(*size)),
    }
}

fn fits_i32(value: u64, what: impl FnOnce() -> String) -> ArchiveResult<u32> {
    if value > i32::MAX as u64 {
        return Err(LayoutError::SizeOverflow { what: what() }.into());
    }
    Ok(value as u32)
}

fn overflow(what: &str) -> LayoutError {
    LayoutError::SizeOverflow {
        what: what.to_string(),
    }
}

fn assign_offsets(mut entries: Vec<PlannedEntry<'_>>) -> ArchiveResult<ArchiveLayout<'_>> {
    let table_size = (entries.len() as u64 + 1) * ENTRY_REF_SIZE as u64;
    let name_block: u64 = entries.iter().map(|e| record_len(&e.name) as u64).sum();

    let mut info_pointer = HEADER_SIZE as u64 + table_size;
    let data_start = align16(info_pointer + name_block).ok_or_else(|| overflow("Name block"))?;
    let data_start = fits_i32(data_start, || "Name block".to_string())?;

    let mut offsets = HashMap::with_capacity(entries.len());
    let mut offset = u64::from(data_start);

    for entry in &mut entries {
        entry.offset = fits_i32(offset, || format!("Offset of {}", entry.name))?;
        entry.info_pointer = fits_i32(info_pointer, || "Name block".to_string())?;
        offsets.insert(entry.name.clone(), entry.offset);

        info_pointer += record_len(&entry.name) as u64;
        offset = align16(offset + u64::from(entry.binary_size))
            .ok_or_else(|| overflow("Archive size"))?;
    }

    let total_size = fits_i32(offset, || "Archive size".to_string())?;
    debug!(
        "Planned {} entries, payloads from {:#x}, {} bytes total",
        entries.len(),
        data_start,
        total_size
    );

    Ok(ArchiveLayout {
        entries,
        offsets,
        data_start,
        total_size,
    })
}
