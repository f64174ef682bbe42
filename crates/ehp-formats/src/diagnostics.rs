//! Non-fatal findings collected during unpack and repack
//!
//! Structural problems abort an operation with an
//! [`ArchiveError`](crate::archive::ArchiveError). Everything else, such as a
//! pointer naming an entry that no longer exists, is recorded here, logged
//! through `tracing`, and handed back to the caller alongside the result.

use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// A content-level anomaly that did not stop the operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// Pointer target is not the name of any entry; written as NULL
    UnresolvedReference {
        /// Pointer table containing the reference
        table: String,
        /// Target token as written in the table
        target: String,
    },

    /// Versioned pointer table has a size with no known version
    UnknownPointerFormat {
        /// Pointer table name
        table: String,
        /// Size of the table in bytes
        size: u32,
    },

    /// Sparse pointer line addresses a slot past the end of the table
    SlotOutOfRange {
        /// Pointer table name
        table: String,
        /// Slot index from the line
        index: usize,
        /// Number of slots in the table
        slots: usize,
    },

    /// Sparse pointer line could not be split into index and target
    MalformedPointerLine {
        /// Pointer table name
        table: String,
        /// Offending line
        line: String,
    },

    /// Entry name was not valid UTF-8 and was decoded lossily
    LossyEntryName {
        /// Decoded name
        name: String,
    },

    /// Header total size disagrees with the buffer length
    SizeMismatch {
        /// Size declared in the header
        declared: i32,
        /// Actual buffer length
        actual: usize,
    },

    /// Pointer table size is not a multiple of the slot width
    TrailingPointerBytes {
        /// Pointer table name
        table: String,
        /// Number of bytes ignored
        bytes: usize,
    },
}

impl Warning {
    /// Informational findings that are expected on some inputs
    pub fn is_notice(&self) -> bool {
        matches!(self, Self::UnknownPointerFormat { .. })
    }

    /// Pointer table the finding belongs to, if any
    pub fn table(&self) -> Option<&str> {
        match self {
            Self::UnresolvedReference { table, .. }
            | Self::UnknownPointerFormat { table, .. }
            | Self::SlotOutOfRange { table, .. }
            | Self::MalformedPointerLine { table, .. }
            | Self::TrailingPointerBytes { table, .. } => Some(table),
            Self::LossyEntryName { .. } | Self::SizeMismatch { .. } => None,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedReference { table, target } => {
                write!(f, "File \"{target}\" referenced in {table} was not found")
            }
            Self::UnknownPointerFormat { table, size } => {
                write!(f, "No known format version for {table} ({size:#X} bytes)")
            }
            Self::SlotOutOfRange {
                table,
                index,
                slots,
            } => write!(
                f,
                "Slot {index:X} in {table} is outside the table ({slots} slots), ignored"
            ),
            Self::MalformedPointerLine { table, line } => {
                write!(f, "Malformed line in {table} ignored: {line:?}")
            }
            Self::LossyEntryName { name } => {
                write!(f, "Entry name is not valid UTF-8, decoded as {name:?}")
            }
            Self::SizeMismatch { declared, actual } => write!(
                f,
                "Header declares {declared} bytes but the archive is {actual} bytes"
            ),
            Self::TrailingPointerBytes { table, bytes } => {
                write!(f, "{bytes} trailing bytes in {table} do not form a pointer")
            }
        }
    }
}

/// Collector for warnings raised during a single operation
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finding and log it
    pub fn record(&mut self, warning: Warning) {
        if warning.is_notice() {
            debug!("{}", warning);
        } else {
            warn!("{}", warning);
        }
        self.warnings.push(warning);
    }

    /// Findings recorded so far
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Number of findings recorded so far
    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    /// Check if nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Consume the collector, returning its findings
    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}
