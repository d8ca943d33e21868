//! Plumbing shared across CLI commands

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use opgen_common::{ServiceDescription, Settings};
use opgen_core::{GroupLowering, LoweredOperation, LoweringContext, LoweringError};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Inputs every command reads.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    #[arg(value_name = "DESCRIPTION", help = "JSON service description to lower")]
    pub description: PathBuf,

    #[arg(
        long,
        short = 's',
        value_name = "SETTINGS",
        help = "TOML settings file. Defaults to Azure conventions"
    )]
    pub settings: Option<PathBuf>,
}

/// All lowered operations of one method group.
#[derive(Debug, Serialize)]
pub struct LoweredGroup {
    pub group: String,
    pub operations: Vec<LoweredOperation>,
}

pub fn run_cli<F>(f: F) -> i32
where
    F: FnOnce() -> Result<(), String>,
{
    match f() {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "opgen=info".into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

pub fn load_settings(path: Option<&Path>) -> Result<Settings, String> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "Loading settings.");
            Settings::load(path).map_err(|err| err.to_string())
        }
        None => Ok(Settings::default()),
    }
}

pub fn load_description(path: &Path) -> Result<ServiceDescription, String> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read description {}: {err}", path.display()))?;
    serde_json::from_str(&contents)
        .map_err(|err| format!("Failed to parse description {}: {err}", path.display()))
}

pub fn load_inputs(input: &InputArgs) -> Result<(LoweringContext, ServiceDescription), String> {
    let settings = load_settings(input.settings.as_deref())?;
    let service = load_description(&input.description)?;
    Ok((LoweringContext::new(settings), service))
}

pub fn lower_service(
    ctx: &LoweringContext,
    service: &ServiceDescription,
    parallel: bool,
) -> Result<Vec<LoweredGroup>, String> {
    service
        .groups
        .iter()
        .map(|group| {
            let failed = |err: LoweringError| format!("Failed to lower group '{}': {err}", group.name);
            let lowering = GroupLowering::new(ctx, group).map_err(failed)?;
            let operations = if parallel {
                lowering.lower_all_parallel()
            } else {
                lowering.lower_all()
            }
            .map_err(failed)?;
            Ok(LoweredGroup {
                group: group.name.clone(),
                operations,
            })
        })
        .collect()
}
