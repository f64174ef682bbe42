//! Name conventions that change how an entry is stored
//!
//! - `*-ptrs.txt`: pointer table, kept on disk as an array of offsets and
//!   edited as text
//! - `*#<hex>.txt`: padding, reserves `<hex>` zero bytes without content
//! - in custom mode two pointer tables travel under friendlier aliases

use crate::archive::constants::POINTER_TABLE_SUFFIX;

/// Aliases applied in custom mode as `(alias, archive name)`
pub const CUSTOM_ALIASES: [(&str, &str); 2] = [
    ("_anim-ptrs.txt", "all-ptrs.txt"),
    ("_animetc-ptrs.txt", "alletc-ptrs.txt"),
];

/// Check if an entry name denotes a pointer table
pub fn is_pointer_table(name: &str) -> bool {
    name.ends_with(POINTER_TABLE_SUFFIX)
}

/// Declared size of a padding entry, if the name has the `#<hex>.txt` suffix
///
/// Sizes too large for a `u64` saturate so that layout planning reports
/// them as overflowing instead of silently truncating.
pub fn padding_size(name: &str) -> Option<u64> {
    let len = name.len();
    if len < 4 || !name.is_char_boundary(len - 4) {
        return None;
    }
    let (stem, extension) = name.split_at(len - 4);
    if !extension.eq_ignore_ascii_case(".txt") {
        return None;
    }

    let hash = stem.rfind('#')?;
    let digits = &stem[hash + 1..];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    Some(u64::from_str_radix(digits, 16).unwrap_or(u64::MAX))
}

/// Map a collaborator-facing name to the name stored in the archive
pub fn to_archive_name(name: &str, custom_mode: bool) -> &str {
    if custom_mode {
        for (alias, archive_name) in CUSTOM_ALIASES {
            if name == alias {
                return archive_name;
            }
        }
    }
    name
}

/// Map a name stored in the archive to the collaborator-facing name
pub fn to_display_name(name: &str, custom_mode: bool) -> &str {
    if custom_mode {
        for (alias, archive_name) in CUSTOM_ALIASES {
            if name == archive_name {
                return alias;
            }
        }
    }
    name
}
