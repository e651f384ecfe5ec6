//! gocd-params CLI - reports pipeline parameters no task refers to.
//!
//! Features:
//! - Template-aware stage resolution
//! - `#{name}` reference scanning across every task of the pipeline
//! - Plain text or JSON output
//! - Optional gocd-params.toml for an ignore list and output format

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use gocd_params_core::{
    init_structured_logging, load_config, load_config_file, log_error, log_event, log_info,
    log_warn, pipeline_key, print_json, print_plain, Inspection, ParamInspector, ParamsConfig,
};

#[derive(Parser, Debug)]
#[command(
    name = "gocd-params",
    author,
    version,
    about = "Inspect GoCD pipeline parameters and report the unused ones"
)]
pub struct Cli {
    /// Input location of cruise-config.xml
    #[arg(short = 'i', long = "input")]
    input: PathBuf,

    /// Pipeline group name
    #[arg(short = 'g', long = "pipeline_group")]
    pipeline_group: String,

    /// Pipeline name for which this inspection needs to be performed
    #[arg(short = 'p', long = "pipeline_name")]
    pipeline_name: String,

    /// Output results in JSON format
    #[arg(long)]
    json: bool,

    /// Parameter names never reported as unused
    #[arg(long, num_args = 1..)]
    ignore: Vec<String>,

    /// Settings file (defaults to ./gocd-params.toml when present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

/// Loads the explicit settings file, or the default one if it exists.
fn resolve_config(explicit: Option<&Path>) -> Result<ParamsConfig> {
    match explicit {
        Some(path) => Ok(load_config_file(path)?),
        None => Ok(load_config(Path::new("."))?.unwrap_or_default()),
    }
}

fn main() -> Result<()> {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] gocd-params internal error: {}", info);
    }));

    // JSON to stderr, respects RUST_LOG
    init_structured_logging();

    let cli = Cli::parse();
    let config = resolve_config(cli.config.as_deref()).inspect_err(|e| {
        log_event("ERROR", &e.to_string());
    })?;

    let inspector = ParamInspector::new(&cli.pipeline_group, &cli.pipeline_name)
        .ignore_params(config.ignored().iter().cloned())
        .ignore_params(cli.ignore.iter().cloned());

    log_info(&format!(
        "inspecting {} in {}",
        inspector.key(),
        cli.input.display()
    ));

    let inspection = match inspector.inspect_file(&cli.input) {
        Ok(inspection) => inspection,
        Err(e) => {
            log_error(&e.to_string());
            return Err(e).with_context(|| {
                format!(
                    "Failed to inspect pipeline {} in {}",
                    pipeline_key(&cli.pipeline_group, &cli.pipeline_name),
                    cli.input.display()
                )
            });
        }
    };

    if let Inspection::NotFound { key, .. } = &inspection {
        log_warn(&format!("pipeline {} not found", key));
    }

    if cli.json || config.wants_json() {
        print_json(&inspection);
    } else {
        print_plain(&inspection);
    }

    Ok(())
}
