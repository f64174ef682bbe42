//! In-memory model of a pointer table

use crate::pointer::{END_SENTINEL, END_TOKEN, NULL_POINTER, NULL_TOKEN, SLOT_SIZE, UNKNOWN_PREFIX};
use std::fmt;

/// How a pointer table is written as text
///
/// Decided once per table (from its archive name when dereferencing, from
/// the text when parsing) and carried through both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerFormat {
    /// Index-tagged lines: `<HEX INDEX> = <target>`
    Sparse,
    /// One target per line, slot index implied by position
    Sequential,
}

impl PointerFormat {
    /// Format used when rendering the table stored under `name`
    ///
    /// `all-ptrs.txt` and `alletc-ptrs.txt` (any name starting with `all`)
    /// are sparse.
    pub fn for_table_name(name: &str) -> Self {
        if name.starts_with("all") {
            Self::Sparse
        } else {
            Self::Sequential
        }
    }

    /// Format of pointer-table text: any `=` marks it as index-tagged
    pub fn detect(text: &str) -> Self {
        if text.contains('=') {
            Self::Sparse
        } else {
            Self::Sequential
        }
    }
}

/// What one slot points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerTarget {
    /// Absent reference (`0`)
    Null,
    /// Early end of the table (`-1`)
    End,
    /// Payload of the named entry
    Entry(String),
    /// Offset that matched no entry when the table was read
    Unknown(i32),
}

impl PointerTarget {
    /// Interpret one target token from the text form
    pub fn from_token(token: &str) -> Self {
        let token = token.trim();
        if token.eq_ignore_ascii_case(END_TOKEN) {
            return Self::End;
        }
        if token.eq_ignore_ascii_case(NULL_TOKEN) {
            return Self::Null;
        }
        if let Some(hex) = token.strip_prefix(UNKNOWN_PREFIX)
            && let Ok(raw) = u32::from_str_radix(hex, 16)
        {
            return Self::Unknown(raw as i32);
        }
        Self::Entry(token.to_string())
    }

    /// Raw slot value for targets that need no name resolution
    pub fn fixed_value(&self) -> Option<i32> {
        match self {
            Self::Null => Some(NULL_POINTER),
            Self::End => Some(END_SENTINEL),
            Self::Entry(_) | Self::Unknown(_) => None,
        }
    }
}

impl fmt::Display for PointerTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str(NULL_TOKEN),
            Self::End => f.write_str(END_TOKEN),
            Self::Entry(name) => f.write_str(name),
            Self::Unknown(raw) => write!(f, "{UNKNOWN_PREFIX}{:X}", *raw as u32),
        }
    }
}

/// A target assigned to a slot index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerSlot {
    /// Zero-based slot index
    pub index: usize,
    /// Target stored in the slot
    pub target: PointerTarget,
}

impl PointerSlot {
    /// Create a new slot assignment
    pub fn new(index: usize, target: PointerTarget) -> Self {
        Self { index, target }
    }
}

/// Pointer table: a fixed number of 4-byte slots and their targets
///
/// `slot_count` is the size of the binary table. `slots` lists the
/// assignments; slots never mentioned stay NULL. Tables read from an archive
/// assign every slot in order. Tables parsed from sparse text may skip some.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerTable {
    /// Text representation
    pub format: PointerFormat,
    /// Format version announced by a `TF<n>` header line
    pub version: Option<u8>,
    /// Number of slots in the binary table
    pub slot_count: usize,
    /// Slot assignments in text order
    pub slots: Vec<PointerSlot>,
}

impl PointerTable {
    /// Create a table assigning `targets` to consecutive slots
    pub fn from_targets(format: PointerFormat, targets: Vec<PointerTarget>) -> Self {
        let slot_count = targets.len();
        let slots = targets
            .into_iter()
            .enumerate()
            .map(|(index, target)| PointerSlot::new(index, target))
            .collect();

        Self {
            format,
            version: None,
            slot_count,
            slots,
        }
    }

    /// Set the version announced in the text header
    #[must_use]
    pub fn with_version(mut self, version: Option<u8>) -> Self {
        self.version = version;
        self
    }

    /// Size of the binary table in bytes
    pub fn binary_size(&self) -> usize {
        self.slot_count * SLOT_SIZE
    }

    /// Names of all entries referenced by the table
    pub fn referenced_names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().filter_map(|slot| match &slot.target {
            PointerTarget::Entry(name) => Some(name.as_str()),
            _ => None,
        })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_name() {
        assert_eq!(
            PointerFormat::for_table_name("all-ptrs.txt"),
            PointerFormat::Sparse
        );
        assert_eq!(
            PointerFormat::for_table_name("alletc-ptrs.txt"),
            PointerFormat::Sparse
        );
        assert_eq!(
            PointerFormat::for_table_name("bg-ptrs.txt"),
            PointerFormat::Sequential
        );
        assert_eq!(
            PointerFormat::for_table_name("_anim-ptrs.txt"),
            PointerFormat::Sequential
        );
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(PointerFormat::detect("0 = a\n1 = b"), PointerFormat::Sparse);
        assert_eq!(PointerFormat::detect("a\nb\nEND"), PointerFormat::Sequential);
    }

    #[test]
    fn test_target_tokens() {
        assert_eq!(PointerTarget::from_token("END"), PointerTarget::End);
        assert_eq!(PointerTarget::from_token("end"), PointerTarget::End);
        assert_eq!(PointerTarget::from_token(" Null "), PointerTarget::Null);
        assert_eq!(
            PointerTarget::from_token("UNKNOWN_OFFSET_0x1A0"),
            PointerTarget::Unknown(0x1A0)
        );
        assert_eq!(
            PointerTarget::from_token("UNKNOWN_OFFSET_0xZZ"),
            PointerTarget::Entry("UNKNOWN_OFFSET_0xZZ".to_string())
        );
        assert_eq!(
            PointerTarget::from_token("model.bin"),
            PointerTarget::Entry("model.bin".to_string())
        );
    }

    #[test]
    fn test_target_display() {
        assert_eq!(PointerTarget::Null.to_string(), "NULL");
        assert_eq!(PointerTarget::End.to_string(), "END");
        assert_eq!(PointerTarget::Unknown(0x1a0).to_string(), "UNKNOWN_OFFSET_0x1A0");
        assert_eq!(PointerTarget::Unknown(-2).to_string(), "UNKNOWN_OFFSET_0xFFFFFFFE");
        assert_eq!(
            PointerTarget::from_token(&PointerTarget::Unknown(-2).to_string()),
            PointerTarget::Unknown(-2)
        );
    }

    #[test]
    fn test_from_targets() {
        let table = PointerTable::from_targets(
            PointerFormat::Sequential,
            vec![
                PointerTarget::Entry("a".to_string()),
                PointerTarget::Null,
                PointerTarget::End,
            ],
        );
        assert_eq!(table.slot_count, 3);
        assert_eq!(table.binary_size(), 12);
        assert_eq!(table.slots[2], PointerSlot::new(2, PointerTarget::End));
        assert_eq!(table.referenced_names().collect::<Vec<_>>(), vec!["a"]);
    }
}
