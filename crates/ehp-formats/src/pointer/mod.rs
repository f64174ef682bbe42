//! Pointer tables
//!
//! Entries named `*-ptrs.txt` hold arrays of little-endian `i32` slots that
//! point at the payloads of other entries in the same archive. This module
//! turns those offsets into entry names on unpack ([`dereference`]) and names
//! back into offsets on repack ([`reference`]). In between the table lives as
//! a [`PointerTable`] with a plain text form that collaborators can edit.
//!
//! Slot values:
//! - `-1`: END, the table stops here
//! - `0`: NULL
//! - anything else: payload offset of another entry

mod dereference;
mod reference;
mod table;
mod text;
pub mod version;

pub use dereference::dereference;
pub use reference::reference;
pub use table::{PointerFormat, PointerSlot, PointerTable, PointerTarget};

/// Width of one slot in bytes
pub const SLOT_SIZE: usize = 4;

/// Slot value marking the end of the table
pub const END_SENTINEL: i32 = -1;

/// Slot value of an absent reference
pub const NULL_POINTER: i32 = 0;

/// Text token for [`END_SENTINEL`]
pub const END_TOKEN: &str = "END";

/// Text token for [`NULL_POINTER`]
pub const NULL_TOKEN: &str = "NULL";

/// Prefix of the token written for offsets that match no entry
pub const UNKNOWN_PREFIX: &str = "UNKNOWN_OFFSET_0x";
