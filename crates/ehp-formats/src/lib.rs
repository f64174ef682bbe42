//! Parser and builder for EHP game archives
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format parsing
#![allow(clippy::cast_possible_wrap)] // Offsets are range-checked before narrowing
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
#![allow(clippy::uninlined_format_args)] // Backwards compatibility
#![allow(clippy::doc_markdown)] // Format terms don't need backticks
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::similar_names)] // Domain-specific naming patterns
#![allow(clippy::redundant_closure_for_method_calls)] // Iterator chains
#![allow(clippy::return_self_not_must_use)] // Builder patterns
//! EHP archives bundle the models, textures and scripts of a game into one
//! file. Some entries are pointer tables that reference other entries by
//! their byte offset, so the archive cannot be edited by splicing bytes: every
//! offset has to be recomputed and every pointer re-resolved.
//!
//! This crate provides both directions:
//!
//! - **Unpack**: parse an archive into named entries, rendering pointer
//!   tables as editable text
//! - **Repack**: lay out a set of named entries, resolve pointer-table text
//!   against the new offsets and write a byte-exact archive
//!
//! # Modules
//!
//! - [`archive`]: header, entry table, parser, layout planner, builder and
//!   the [`ArchiveSession`](archive::ArchiveSession) entry point
//! - [`pointer`]: pointer-table model, text form and offset resolution
//! - [`diagnostics`]: non-fatal findings reported alongside results
//!
//! # Example
//!
//! ```rust
//! use ehp_formats::EhpFormat;
//! use ehp_formats::archive::{UnpackedArchive, repack_archive, RepackEntry};
//!
//! let data = repack_archive(&[RepackEntry::bytes("a.bin", vec![1, 2, 3])], false)?.data;
//! UnpackedArchive::verify_round_trip(&data)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]

pub mod archive;
pub mod diagnostics;
pub mod pointer;

use archive::{ArchiveSession, UnpackedArchive};

/// Common trait for formats that parse from and build to bytes
pub trait EhpFormat: Sized {
    /// Parse from bytes
    fn parse(data: &[u8]) -> Result<Self, Box<dyn std::error::Error>>;

    /// Build to bytes
    fn build(&self) -> Result<Vec<u8>, Box<dyn std::error::Error>>;

    /// Verify round-trip correctness
    fn verify_round_trip(data: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
        let parsed = Self::parse(data)?;
        let rebuilt = parsed.build()?;
        if data != rebuilt.as_slice() {
            return Err("Round-trip verification failed".into());
        }
        Ok(())
    }
}

impl EhpFormat for UnpackedArchive {
    fn parse(data: &[u8]) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(ArchiveSession::default().unpack(data)?)
    }

    fn build(&self) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
        let session = ArchiveSession::new(self.custom_mode);
        Ok(session.repack(&self.repack_entries())?.data)
    }
}
