//! tiebapad - a terminal rich-text post composer.
//!
//! # Usage
//!
//! ```bash
//! tiebapad draft.html --output draft.html
//! tiebapad --value '<b>hi</b>' --json
//! tiebapad --check draft.html
//! echo '<i>x</i>' | tiebapad - --check
//! ```

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use tiebapad::app::{App, ExitReport};
use tiebapad::config::{
    ConfigFlags, ThemeMode, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};
use tiebapad::markup;
use tiebapad::perf;
use tiebapad::ui::style::set_theme;

const DEFAULT_PLACEHOLDER: &str = "请输入内容...";

/// A terminal rich-text editor for forum posts
#[derive(Parser, Debug)]
#[command(name = "tiebapad", version, about, long_about = None)]
struct Cli {
    /// HTML file with the initial content ("-" reads stdin)
    #[arg(value_name = "FILE", conflicts_with = "value")]
    file: Option<PathBuf>,

    /// Initial content given inline
    #[arg(long, value_name = "MARKUP")]
    value: Option<String>,

    /// Hint shown while the editor is empty
    #[arg(long, value_name = "TEXT")]
    placeholder: Option<String>,

    /// Write the final content (and Ctrl+S snapshots) to a file
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Emit a JSON object with markup and character count
    #[arg(long)]
    json: bool,

    /// Run the initial content through the allow-list before editing
    #[arg(long)]
    sanitize: bool,

    /// Print the character count and sanitized markup, then exit
    #[arg(long)]
    check: bool,

    /// Color palette for the editor
    #[arg(long, value_enum, default_value = "auto")]
    theme: ThemeMode,

    /// Enable startup performance logging
    #[arg(long)]
    perf: bool,

    /// Write detailed event debug log to a file
    #[arg(long, value_name = "PATH")]
    render_debug_log: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn read_initial_value(cli: &Cli) -> Result<(String, String)> {
    if let Some(value) = &cli.value {
        return Ok((value.clone(), "untitled".to_string()));
    }
    match &cli.file {
        Some(path) if path.as_os_str() == "-" => {
            let mut value = String::new();
            std::io::stdin()
                .read_to_string(&mut value)
                .context("Failed to read stdin")?;
            Ok((value, "stdin".to_string()))
        }
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("File not found: {}", path.display());
            }
            let value = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let label = path
                .file_name()
                .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
            Ok((value, label))
        }
        None => Ok((String::new(), "untitled".to_string())),
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    perf::set_enabled(effective.perf);
    let render_debug_log_path = effective
        .render_debug_log
        .clone()
        .or_else(|| std::env::var_os("TIEBAPAD_RENDER_DEBUG_LOG").map(PathBuf::from));
    if let Err(err) = perf::set_debug_log_path(render_debug_log_path.as_deref()) {
        tracing::warn!(
            "Failed to initialize render debug log {}: {}",
            render_debug_log_path
                .as_ref()
                .map_or_else(|| "<unset>".to_string(), |p| p.display().to_string()),
            err
        );
    }

    set_theme(effective.theme.unwrap_or(ThemeMode::Auto));

    let (value, label) = read_initial_value(&cli)?;

    if cli.check {
        let report = ExitReport::new(markup::sanitize(&value), 0);
        if effective.json {
            return report.write_to(true, cli.output.as_deref());
        }
        println!("{}", report.characters);
        return report.write_to(false, cli.output.as_deref());
    }

    let value = if effective.sanitize {
        markup::sanitize(&value)
    } else {
        value
    };
    let placeholder = effective
        .placeholder
        .clone()
        .unwrap_or_else(|| DEFAULT_PLACEHOLDER.to_string());

    let mut app = App::new(value)
        .with_placeholder(placeholder)
        .with_source_label(label)
        .with_output(cli.output.clone(), effective.json)
        .with_config_paths(
            Some(global_path.clone()),
            if local_path.exists() {
                Some(local_path.clone())
            } else {
                None
            },
        );

    let report = app.run().context("Application error")?;
    if let Some(report) = report
        && cli.output.is_none()
    {
        report.write_to(effective.json, None)?;
    }
    Ok(())
}
