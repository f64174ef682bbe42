//! Output formatting utilities for the CLI
//!
//! This module provides utilities for formatting output in various styles
//! including tables, colored text, and structured displays.

use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table, presets};
use ehp_formats::diagnostics::Warning;
use owo_colors::OwoColorize;

/// Style configuration for output formatting
pub struct OutputStyle {
    /// Whether to use colors in output
    pub use_color: bool,
    /// Whether to use Unicode characters for borders
    pub use_unicode: bool,
}

impl Default for OutputStyle {
    fn default() -> Self {
        Self {
            // Check if NO_COLOR env var is set
            use_color: std::env::var("NO_COLOR").is_err(),
            use_unicode: true,
        }
    }
}

impl OutputStyle {
    /// Create a new output style
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Format a success message
pub fn format_success(text: &str, style: &OutputStyle) -> String {
    if style.use_color {
        text.green().to_string()
    } else {
        text.to_string()
    }
}

/// Format a warning message
pub fn format_warning(text: &str, style: &OutputStyle) -> String {
    if style.use_color {
        text.yellow().to_string()
    } else {
        text.to_string()
    }
}

/// Format an error message
pub fn format_error(text: &str, style: &OutputStyle) -> String {
    if style.use_color {
        text.red().to_string()
    } else {
        text.to_string()
    }
}

/// Format a key-value pair
pub fn format_key_value(key: &str, value: &str, style: &OutputStyle) -> String {
    if style.use_color {
        format!("{}: {}", key.cyan(), value)
    } else {
        format!("{}: {}", key, value)
    }
}

/// Format a file path
pub fn format_path(path: &str, style: &OutputStyle) -> String {
    if style.use_color {
        path.bright_magenta().to_string()
    } else {
        path.to_string()
    }
}

/// Format a count badge (e.g., "(42 files)")
pub fn format_count_badge(count: usize, item_name: &str, style: &OutputStyle) -> String {
    let text = if count == 1 {
        format!("({} {})", count, item_name)
    } else {
        format!("({} {}s)", count, item_name)
    };

    if style.use_color {
        text.dimmed().to_string()
    } else {
        text
    }
}

/// Create a styled table
pub fn create_table(style: &OutputStyle) -> Table {
    let mut table = Table::new();

    if style.use_unicode {
        table
            .load_preset(presets::UTF8_FULL)
            .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    } else {
        table.load_preset(presets::ASCII_FULL);
    }

    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);

    table
}

/// Style a table header cell
pub fn header_cell(text: &str, style: &OutputStyle) -> Cell {
    let cell = Cell::new(text);
    if style.use_color {
        cell.fg(Color::Cyan)
            .add_attribute(Attribute::Bold)
            .set_alignment(CellAlignment::Left)
    } else {
        cell.add_attribute(Attribute::Bold)
            .set_alignment(CellAlignment::Left)
    }
}

/// Style a regular cell
pub fn regular_cell(text: &str) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Left)
}

/// Style a numeric cell (right-aligned)
pub fn numeric_cell(text: &str) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// Style an entry kind cell
pub fn kind_cell(kind: &str, style: &OutputStyle) -> Cell {
    let cell = Cell::new(kind);
    if style.use_color {
        match kind {
            "pointers" => cell.fg(Color::Blue),
            "padding" => cell.fg(Color::Grey),
            _ => cell,
        }
    } else {
        cell
    }
}

/// Print a section header
pub fn print_section_header(title: &str, style: &OutputStyle) {
    if style.use_color {
        println!("\n{}", title.bold().bright_blue());
        println!("{}", "═".repeat(title.chars().count()).bright_blue());
    } else {
        println!("\n{}", title);
        println!("{}", "=".repeat(title.chars().count()));
    }
}

/// Print how many warnings an operation raised
///
/// Each warning is already logged when it is recorded, so only the total is
/// printed here. Notices are not counted.
pub fn print_warnings(warnings: &[Warning], style: &OutputStyle) {
    let count = warnings.iter().filter(|w| !w.is_notice()).count();
    if count > 0 {
        eprintln!(
            "{}",
            format_warning(&format!("⚠ {}", warning_summary(count)), style)
        );
    }
}

/// Summary line for `count` warnings
pub fn warning_summary(count: usize) -> String {
    if count == 1 {
        "1 warning".to_string()
    } else {
        format!("{} warnings", count)
    }
}
