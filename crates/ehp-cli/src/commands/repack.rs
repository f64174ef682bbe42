use crate::{
    CommandContext, RepackArgs,
    output::{
        OutputStyle, create_table, format_count_badge, format_path, format_success,
        header_cell, numeric_cell, print_warnings, regular_cell,
    },
    project::read_project,
};
use anyhow::Context;
use ehp_formats::archive::ArchiveSession;
use serde_json::json;
use std::path::PathBuf;
use tracing::{debug, info};

pub fn handle(args: RepackArgs, ctx: &CommandContext) -> anyhow::Result<()> {
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(&ctx.config.config().output_name));
    let entries = read_project(&args.input, Some(&output))
        .with_context(|| format!("Failed to read project {}", args.input.display()))?;

    let session = ArchiveSession::new(ctx.custom_mode(args.custom_mode));
    let repacked = session
        .repack(&entries)
        .with_context(|| format!("Failed to repack {}", args.input.display()))?;

    std::fs::write(&output, &repacked.data)
        .with_context(|| format!("Failed to write archive {}", output.display()))?;
    info!(
        "Wrote {} ({} bytes, {} entries)",
        output.display(),
        repacked.data.len(),
        repacked.layout.len()
    );

    if ctx.format.is_json() {
        let summary = json!({
            "output": output.display().to_string(),
            "size": repacked.data.len(),
            "layout": repacked.layout,
            "warnings": repacked.warnings,
        });
        println!("{}", ctx.format.to_json(&summary)?);
        return Ok(());
    }

    let style = OutputStyle::new();
    println!(
        "{} {} {}",
        format_success("✓ Wrote", &style),
        format_path(&output.display().to_string(), &style),
        format_count_badge(repacked.layout.len(), "file", &style)
    );

    if tracing::enabled!(tracing::Level::DEBUG) {
        let mut table = create_table(&style);
        table.set_header(vec![
            header_cell("Name", &style),
            header_cell("Offset", &style),
            header_cell("Name Pointer", &style),
            header_cell("Size", &style),
        ]);
        for placement in &repacked.layout {
            table.add_row(vec![
                regular_cell(&placement.name),
                numeric_cell(&format!("0x{:X}", placement.offset)),
                numeric_cell(&format!("0x{:X}", placement.info_pointer)),
                numeric_cell(&placement.size.to_string()),
            ]);
        }
        debug!("Archive layout:\n{}", table);
    }

    print_warnings(&repacked.warnings, &style);
    Ok(())
}
