use crate::{
    CommandContext, PointersArgs,
    output::{OutputStyle, format_key_value, print_section_header, print_warnings},
};
use anyhow::{Context, bail};
use ehp_formats::archive::{ArchiveSession, EntryContent};
use ehp_formats::pointer::PointerFormat;
use serde_json::json;

pub fn handle(args: PointersArgs, ctx: &CommandContext) -> anyhow::Result<()> {
    let data = super::read_archive(&args.archive)?;
    let unpacked = ArchiveSession::new(ctx.custom_mode(args.custom_mode))
        .unpack(&data)
        .with_context(|| format!("Failed to read {}", args.archive.display()))?;

    let Some(entry) = unpacked
        .entries
        .iter()
        .find(|entry| entry.name == args.entry || entry.archive_name == args.entry)
    else {
        bail!("No entry named '{}' in {}", args.entry, args.archive.display());
    };

    let EntryContent::PointerTable(table) = &entry.content else {
        bail!("Entry '{}' is not a pointer table", entry.name);
    };

    let text = table.to_string();
    let format = match table.format {
        PointerFormat::Sparse => "sparse",
        PointerFormat::Sequential => "sequential",
    };

    if ctx.format.is_json() {
        let lines: Vec<&str> = text.lines().collect();
        let summary = json!({
            "entry": entry.name,
            "format": format,
            "version": table.version,
            "slot_count": table.slot_count,
            "lines": lines,
        });
        println!("{}", ctx.format.to_json(&summary)?);
        return Ok(());
    }

    let style = OutputStyle::new();
    print_section_header(&entry.name, &style);
    println!("{}", format_key_value("Format", format, &style));
    if let Some(version) = table.version {
        println!("{}", format_key_value("Version", &version.to_string(), &style));
    }
    println!(
        "{}",
        format_key_value("Slots", &table.slot_count.to_string(), &style)
    );
    println!();
    println!("{}", text);

    let own: Vec<_> = unpacked
        .warnings
        .iter()
        .filter(|warning| warning.table() == Some(entry.archive_name.as_str()))
        .cloned()
        .collect();
    print_warnings(&own, &style);
    Ok(())
}
