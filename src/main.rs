use std::process::ExitCode;

use clap::Parser;
use log::error;

use depslock::{
    cli::args::{CliArgs, Command},
    config::DepsLockConfig,
    DepsLock, LockMode,
};

fn run() -> anyhow::Result<()> {
    let cli_args: CliArgs = CliArgs::parse();
    let config = DepsLockConfig::load()?;

    let mut builder = DepsLock::builder();
    if let Some(root) = cli_args.root {
        builder = builder.root(root);
    }
    if let Some(report_file) = cli_args
        .report_location
        .map(Into::into)
        .or(config.report_file)
    {
        builder = builder.report_file_name(report_file);
    }
    if let Some(lock_file) = cli_args
        .lockfile_location
        .map(Into::into)
        .or(config.lock_file)
    {
        builder = builder.lock_file_name(lock_file);
    }
    let depslock = builder.try_build()?;

    match cli_args.cmd {
        Command::Lock { locked, recreate } => {
            let lock_mode = if locked {
                LockMode::Locked
            } else if recreate {
                LockMode::Recreate
            } else {
                LockMode::Update
            };
            depslock.lock(lock_mode)?;
        }
        Command::Clean => depslock.clean()?,
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        error!("{}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
