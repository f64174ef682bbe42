//! Error types for archive operations

use thiserror::Error;

/// Archive operation result type
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Errors raised while parsing or building an EHP archive
///
/// Only structural problems are errors. Content-level anomalies such as
/// dangling pointer targets are reported as
/// [`Warning`](crate::diagnostics::Warning)s instead.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Primary signature at offset 0 does not match
    #[error("Invalid magic: expected {expected:#010x}, got {actual:#010x}")]
    InvalidMagic {
        /// Expected signature value
        expected: u32,
        /// Signature found in the buffer
        actual: u32,
    },

    /// Secondary signature at offset 8 does not match
    #[error("Invalid secondary magic: expected {expected:#010x}, got {actual:#010x}")]
    InvalidSecondaryMagic {
        /// Expected signature value
        expected: u32,
        /// Signature found in the buffer
        actual: u32,
    },

    /// Header declares a negative number of entries
    #[error("Invalid entry count: {0}")]
    InvalidEntryCount(i32),

    /// Entry declares a negative payload size
    #[error("Entry '{name}' has negative size {size}")]
    NegativeSize {
        /// Entry name
        name: String,
        /// Size read from the name/size block
        size: i32,
    },

    /// Entry table holds a negative offset
    #[error("Negative {field} {value} in entry table slot {slot}")]
    NegativeOffset {
        /// Which field of the entry reference was negative
        field: &'static str,
        /// Raw value read
        value: i32,
        /// Zero-based entry table slot
        slot: usize,
    },

    /// A read would run past the end of the buffer
    #[error("Truncated archive: reading {width} bytes at offset {offset:#x} exceeds length {len:#x}")]
    Truncated {
        /// Start of the attempted read
        offset: usize,
        /// Number of bytes requested
        width: usize,
        /// Length of the buffer
        len: usize,
    },

    /// Layout planning failed
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    /// Binary read/write error
    #[error("Binary format error: {0}")]
    BinRead(#[from] binrw::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ArchiveError {
    /// Check if the buffer is not an EHP archive at all
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidMagic { .. }
                | Self::InvalidSecondaryMagic { .. }
                | Self::InvalidEntryCount(_)
                | Self::NegativeSize { .. }
                | Self::NegativeOffset { .. }
        )
    }

    /// Check if a read ran past the end of the buffer
    pub fn is_truncation(&self) -> bool {
        match self {
            Self::Truncated { .. } => true,
            Self::BinRead(binrw::Error::Io(e)) => e.kind() == std::io::ErrorKind::UnexpectedEof,
            _ => false,
        }
    }

    /// Check if the error came from layout planning
    pub fn is_layout_error(&self) -> bool {
        matches!(self, Self::Layout(_))
    }
}

/// Errors raised while computing the layout of a new archive
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// A size or offset does not fit the 32-bit fields of the format
    #[error("{what} exceeds the addressable range of the archive")]
    SizeOverflow {
        /// The quantity that overflowed
        what: String,
    },

    /// Two entries resolve to the same archive name
    #[error("Duplicate entry name: {0}")]
    DuplicateName(String),

    /// Entry name cannot be stored in the name/size block
    #[error("Invalid entry name: {0:?}")]
    InvalidName(String),
}
