use crate::{
    CommandContext, UnpackArgs,
    output::{OutputStyle, format_count_badge, format_path, format_success, print_warnings},
    project::write_entries,
};
use anyhow::Context;
use ehp_formats::archive::ArchiveSession;
use serde_json::json;
use tracing::info;

pub fn handle(args: UnpackArgs, ctx: &CommandContext) -> anyhow::Result<()> {
    let data = super::read_archive(&args.archive)?;
    let session = ArchiveSession::new(ctx.custom_mode(args.custom_mode));
    let unpacked = session
        .unpack(&data)
        .with_context(|| format!("Failed to unpack {}", args.archive.display()))?;

    let written = write_entries(&args.output, &unpacked.entries)
        .with_context(|| format!("Failed to write entries to {}", args.output.display()))?;
    info!("Unpacked {} entries to {}", written, args.output.display());

    if ctx.format.is_json() {
        let summary = json!({
            "archive": args.archive.display().to_string(),
            "output": args.output.display().to_string(),
            "entries": written,
            "custom_mode": unpacked.custom_mode,
            "warnings": unpacked.warnings,
        });
        println!("{}", ctx.format.to_json(&summary)?);
        return Ok(());
    }

    let style = OutputStyle::new();
    println!(
        "{} {} {}",
        format_success("✓ Unpacked into", &style),
        format_path(&args.output.display().to_string(), &style),
        format_count_badge(written, "file", &style)
    );
    print_warnings(&unpacked.warnings, &style);
    Ok(())
}
