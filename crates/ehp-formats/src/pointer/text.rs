//! Text form of pointer tables
//!
//! Sparse tables render one `<HEX INDEX> = <target>` line per slot, sequential
//! tables one target per line. A versioned table starts with a `TF<n>` line.
//! Lines are separated by `\n` without a trailing newline.

use crate::diagnostics::{Diagnostics, Warning};
use crate::pointer::table::{PointerFormat, PointerSlot, PointerTable, PointerTarget};
use crate::pointer::version;
use std::fmt;

impl fmt::Display for PointerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = Vec::with_capacity(self.slots.len() + 1);
        if let Some(v) = self.version {
            lines.push(version::header_line(v));
        }

        for slot in &self.slots {
            lines.push(match self.format {
                PointerFormat::Sparse => format!("{:X} = {}", slot.index, slot.target),
                PointerFormat::Sequential => slot.target.to_string(),
            });
        }

        f.write_str(&lines.join("\n"))
    }
}

impl PointerTable {
    /// Parse the text form of the pointer table stored as `table_name`
    ///
    /// Blank lines are ignored and a leading `TF<n>` line sets the version.
    /// Every remaining line occupies one slot of the binary table, so
    /// malformed sparse lines still count towards its size while their
    /// assignments are dropped with a warning.
    pub fn from_text(table_name: &str, text: &str, diagnostics: &mut Diagnostics) -> Self {
        let format = PointerFormat::detect(text);
        let mut lines = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .peekable();

        let version = lines
            .peek()
            .and_then(|line| version::parse_header_line(line));
        if version.is_some() {
            lines.next();
        }

        let lines: Vec<&str> = lines.collect();
        let slot_count = lines.len();

        let slots = match format {
            PointerFormat::Sequential => lines
                .iter()
                .enumerate()
                .map(|(index, line)| PointerSlot::new(index, PointerTarget::from_token(line)))
                .collect(),
            PointerFormat::Sparse => lines
                .iter()
                .filter_map(|line| parse_sparse_line(table_name, line, slot_count, diagnostics))
                .collect(),
        };

        Self {
            format,
            version,
            slot_count,
            slots,
        }
    }
}

fn parse_sparse_line(
    table_name: &str,
    line: &str,
    slot_count: usize,
    diagnostics: &mut Diagnostics,
) -> Option<PointerSlot> {
    let malformed = |diagnostics: &mut Diagnostics| {
        diagnostics.record(Warning::MalformedPointerLine {
            table: table_name.to_string(),
            line: line.to_string(),
        });
    };

    let Some((index, target)) = line.split_once('=') else {
        malformed(diagnostics);
        return None;
    };
    let Ok(index) = usize::from_str_radix(index.trim(), 16) else {
        malformed(diagnostics);
        return None;
    };

    if index >= slot_count {
        diagnostics.record(Warning::SlotOutOfRange {
            table: table_name.to_string(),
            index,
            slots: slot_count,
        });
        return None;
    }

    Some(PointerSlot::new(index, PointerTarget::from_token(target)))
}
