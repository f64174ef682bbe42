//! [`PointerTable`] back to raw offset bytes

use crate::diagnostics::{Diagnostics, Warning};
use crate::pointer::table::{PointerFormat, PointerTable, PointerTarget};
use crate::pointer::{NULL_POINTER, SLOT_SIZE};
use std::collections::HashMap;
use tracing::trace;

/// Encode `table` against the final payload offsets of a new archive
///
/// The output is exactly [`PointerTable::binary_size`] bytes. Targets that
/// name no entry in `offsets` are written as NULL with one warning each.
pub fn reference(
    table_name: &str,
    table: &PointerTable,
    offsets: &HashMap<String, u32>,
    diagnostics: &mut Diagnostics,
) -> Vec<u8> {
    let mut out = vec![0u8; table.binary_size()];

    for (position, slot) in table.slots.iter().enumerate() {
        let index = match table.format {
            PointerFormat::Sparse => slot.index,
            PointerFormat::Sequential => position,
        };

        if index >= table.slot_count {
            if table.format == PointerFormat::Sequential {
                break;
            }
            diagnostics.record(Warning::SlotOutOfRange {
                table: table_name.to_string(),
                index,
                slots: table.slot_count,
            });
            continue;
        }

        let value = resolve(table_name, &slot.target, offsets, diagnostics);
        let start = index * SLOT_SIZE;
        out[start..start + SLOT_SIZE].copy_from_slice(&value.to_le_bytes());
    }

    trace!("Referenced {} slots of {}", table.slot_count, table_name);
    out
}

fn resolve(
    table_name: &str,
    target: &PointerTarget,
    offsets: &HashMap<String, u32>,
    diagnostics: &mut Diagnostics,
) -> i32 {
    if let Some(value) = target.fixed_value() {
        return value;
    }

    let found = match target {
        PointerTarget::Entry(name) => offsets
            .get(name)
            .and_then(|&offset| i32::try_from(offset).ok()),
        _ => None,
    };

    found.unwrap_or_else(|| {
        diagnostics.record(Warning::UnresolvedReference {
            table: table_name.to_string(),
            target: target.to_string(),
        });
        NULL_POINTER
    })
}
