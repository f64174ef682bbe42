use crate::{
    CommandContext, ConfigCommands,
    output::{
        OutputStyle, create_table, format_path, format_success, format_warning, header_cell,
        print_section_header, regular_cell,
    },
};
use anyhow::bail;
use serde_json::json;

pub fn handle(cmd: ConfigCommands, ctx: &mut CommandContext) -> anyhow::Result<()> {
    match cmd {
        ConfigCommands::Show => show_config(ctx),
        ConfigCommands::Path => show_path(ctx),
        ConfigCommands::Get { key } => get_config(&key, ctx),
        ConfigCommands::Set { key, value } => set_config(&key, &value, ctx),
        ConfigCommands::Reset { yes } => reset_config(yes, ctx),
    }
}

fn show_config(ctx: &CommandContext) -> anyhow::Result<()> {
    let config = ctx.config.get_all();

    if ctx.format.is_json() {
        println!("{}", ctx.format.to_json(&config)?);
        return Ok(());
    }

    let style = OutputStyle::new();
    print_section_header("Current Configuration", &style);

    let mut table = create_table(&style);
    table.set_header(vec![
        header_cell("Key", &style),
        header_cell("Value", &style),
    ]);
    for (key, value) in &config {
        table.add_row(vec![regular_cell(key), regular_cell(value)]);
    }
    println!("{}", table);
    Ok(())
}

fn show_path(ctx: &CommandContext) -> anyhow::Result<()> {
    let path = ctx.config.path().display().to_string();
    if ctx.format.is_json() {
        let result = json!({
            "path": path,
            "exists": ctx.config.path().exists(),
        });
        println!("{}", ctx.format.to_json(&result)?);
    } else {
        println!("{}", format_path(&path, &OutputStyle::new()));
    }
    Ok(())
}

fn get_config(key: &str, ctx: &CommandContext) -> anyhow::Result<()> {
    let value = ctx.config.get(key)?;

    if ctx.format.is_json() {
        let result = json!({
            "key": key,
            "value": value,
        });
        println!("{}", ctx.format.to_json(&result)?);
    } else {
        println!("{}", value);
    }
    Ok(())
}

fn set_config(key: &str, value: &str, ctx: &mut CommandContext) -> anyhow::Result<()> {
    ctx.config.set(key, value)?;

    if ctx.format.is_json() {
        let result = json!({
            "success": true,
            "key": key,
            "value": value,
        });
        println!("{}", ctx.format.to_json(&result)?);
    } else {
        let style = OutputStyle::new();
        println!(
            "{}",
            format_success(&format!("✓ Set {} = {}", key, value), &style)
        );
    }
    Ok(())
}

fn reset_config(yes: bool, ctx: &mut CommandContext) -> anyhow::Result<()> {
    if !yes {
        let style = OutputStyle::new();
        eprintln!(
            "{}",
            format_warning(
                "This will reset all configuration to defaults. Use --yes to confirm.",
                &style
            )
        );
        bail!("Reset not confirmed");
    }

    ctx.config.reset()?;

    if ctx.format.is_json() {
        let result = json!({
            "success": true,
            "message": "Configuration reset to defaults",
        });
        println!("{}", ctx.format.to_json(&result)?);
    } else {
        let style = OutputStyle::new();
        println!(
            "{}",
            format_success("✓ Configuration reset to defaults", &style)
        );
    }
    Ok(())
}
