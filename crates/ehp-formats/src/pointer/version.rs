//! Format versions of the animation pointer table
//!
//! The table stored as `all-ptrs.txt` has a different slot count in each
//! game release, so its byte size identifies the release. The text form
//! carries the version on a leading `TF<n>` line.

/// Name fragment identifying the versioned pointer table
pub const VERSIONED_TABLE: &str = "all-ptrs.txt";

/// Prefix of the version header line
pub const VERSION_PREFIX: &str = "TF";

/// Known table sizes in bytes and the version each one identifies
const KNOWN_SIZES: [(u32, u8); 6] = [
    (0x5EC, 1),
    (0xA38, 2),
    (0xAD4, 3),
    (0x3B0, 4),
    (0x724, 5),
    (0xAB4, 6),
];

/// Check if the table stored under `name` carries a version header
pub fn is_versioned_table(name: &str) -> bool {
    name.contains(VERSIONED_TABLE)
}

/// Version identified by a table size, if any
pub fn version_for_size(size: u32) -> Option<u8> {
    KNOWN_SIZES
        .iter()
        .find(|(known, _)| *known == size)
        .map(|&(_, version)| version)
}

/// Table size of a known version
pub fn size_for_version(version: u8) -> Option<u32> {
    KNOWN_SIZES
        .iter()
        .find(|(_, known)| *known == version)
        .map(|&(size, _)| size)
}

/// Text header line announcing `version`
pub fn header_line(version: u8) -> String {
    format!("{VERSION_PREFIX}{version}")
}

/// Parse a version header line such as `TF3` (prefix matched case-insensitively)
pub fn parse_header_line(line: &str) -> Option<u8> {
    let line = line.trim();
    let prefix = line.get(..VERSION_PREFIX.len())?;
    if !prefix.eq_ignore_ascii_case(VERSION_PREFIX) {
        return None;
    }
    let digits = &line[VERSION_PREFIX.len()..];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
