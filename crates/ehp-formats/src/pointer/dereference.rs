//! Raw pointer table bytes to [`PointerTable`]

use crate::archive::{EntryIndex, FileDescriptor};
use crate::diagnostics::{Diagnostics, Warning};
use crate::pointer::table::{PointerFormat, PointerTable, PointerTarget};
use crate::pointer::{END_SENTINEL, NULL_POINTER, SLOT_SIZE, version};
use tracing::debug;

/// Decode the pointer table `file` whose payload is `payload`
///
/// Slots are read until the END sentinel (kept as the last slot) or until
/// the declared size is exhausted. Offsets matching no entry in `index`
/// become [`PointerTarget::Unknown`], never an error.
pub fn dereference(
    file: &FileDescriptor,
    payload: &[u8],
    index: &EntryIndex,
    diagnostics: &mut Diagnostics,
) -> PointerTable {
    let format = PointerFormat::for_table_name(&file.name);
    let table_version = detect_version(file, diagnostics);

    let declared = payload.len().min(file.size as usize);
    let mut chunks = payload[..declared].chunks_exact(SLOT_SIZE);
    let mut targets = Vec::with_capacity(declared / SLOT_SIZE);
    let mut ended = false;

    for chunk in &mut chunks {
        let value = i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        match value {
            END_SENTINEL => {
                targets.push(PointerTarget::End);
                ended = true;
                break;
            }
            NULL_POINTER => targets.push(PointerTarget::Null),
            offset => targets.push(
                index
                    .by_offset(offset)
                    .map_or(PointerTarget::Unknown(offset), |target| {
                        PointerTarget::Entry(target.name.clone())
                    }),
            ),
        }
    }

    if !ended && !chunks.remainder().is_empty() {
        diagnostics.record(Warning::TrailingPointerBytes {
            table: file.name.clone(),
            bytes: chunks.remainder().len(),
        });
    }

    debug!(
        "Dereferenced {} slots from {} ({:?})",
        targets.len(),
        file.name,
        format
    );
    PointerTable::from_targets(format, targets).with_version(table_version)
}

fn detect_version(file: &FileDescriptor, diagnostics: &mut Diagnostics) -> Option<u8> {
    if !version::is_versioned_table(&file.name) {
        return None;
    }

    let detected = version::version_for_size(file.size);
    match detected {
        Some(v) => debug!("Detected format version {} for {}", v, file.name),
        None => diagnostics.record(Warning::UnknownPointerFormat {
            table: file.name.clone(),
            size: file.size,
        }),
    }
    detected
}
