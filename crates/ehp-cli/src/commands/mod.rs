pub mod config;
pub mod list;
pub mod pointers;
pub mod repack;
pub mod unpack;

use anyhow::Context;
use std::path::Path;

/// Read a whole archive into memory
pub(crate) fn read_archive(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read archive {}", path.display()))
}
