//! CLI smoke entry point.
//!
//! # Responsibility
//! - Open the configured catalog store through `perfume_core`.
//! - Print a deterministic summary for quick local sanity checks.

use log::error;
use perfume_core::{
    config_from_env, init_logging_from_config, load_config, CoreConfig, CoreContext, Repository,
};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("perfume_cli: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config: CoreConfig = match std::env::args().nth(1) {
        Some(path) => load_config(path)?,
        None => config_from_env(),
    };
    init_logging_from_config(&config)?;

    let ctx = CoreContext::from_config(&config)?;
    let uow = ctx.unit_of_work();

    println!("perfume_core ping={}", perfume_core::ping());
    println!("perfume_core version={}", perfume_core::core_version());
    println!("database={}", config.database_path.display());
    println!("manufacturers={}", uow.manufacturers().count(|_| true)?);
    println!("perfumes={}", uow.perfumes().count(|_| true)?);
    Ok(())
}
