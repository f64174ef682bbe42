use crate::{
    CommandContext, ListArgs,
    output::{
        OutputStyle, create_table, format_count_badge, header_cell, kind_cell, numeric_cell,
        print_section_header, print_warnings, regular_cell,
    },
};
use anyhow::Context;
use ehp_formats::archive::ArchiveSession;
use serde::Serialize;

#[derive(Serialize)]
struct ListedEntry<'a> {
    name: &'a str,
    archive_name: &'a str,
    size: u32,
    offset: u32,
    kind: &'static str,
}

pub fn handle(args: ListArgs, ctx: &CommandContext) -> anyhow::Result<()> {
    let data = super::read_archive(&args.archive)?;
    let unpacked = ArchiveSession::new(ctx.custom_mode(false))
        .unpack(&data)
        .with_context(|| format!("Failed to read {}", args.archive.display()))?;

    if ctx.format.is_json() {
        let entries: Vec<ListedEntry<'_>> = unpacked
            .entries
            .iter()
            .map(|entry| ListedEntry {
                name: &entry.name,
                archive_name: &entry.archive_name,
                size: entry.size,
                offset: entry.data_offset,
                kind: entry.content.kind(),
            })
            .collect();
        println!("{}", ctx.format.to_json(&entries)?);
        return Ok(());
    }

    let style = OutputStyle::new();
    print_section_header(
        &format!(
            "{} {}",
            args.archive.display(),
            format_count_badge(unpacked.entries.len(), "file", &style)
        ),
        &style,
    );

    let mut table = create_table(&style);
    table.set_header(vec![
        header_cell("Name", &style),
        header_cell("Size", &style),
        header_cell("Offset", &style),
        header_cell("Kind", &style),
    ]);
    for entry in &unpacked.entries {
        table.add_row(vec![
            regular_cell(&entry.name),
            numeric_cell(&entry.size.to_string()),
            numeric_cell(&format!("0x{:X}", entry.data_offset)),
            kind_cell(entry.content.kind(), &style),
        ]);
    }
    println!("{}", table);

    print_warnings(&unpacked.warnings, &style);
    Ok(())
}
