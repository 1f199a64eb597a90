use clap::{Parser, Subcommand};

/// Deterministic lock files for resolved dependency graphs.
#[derive(Debug, Parser)]
#[clap(version)]
pub struct CliArgs {
    #[clap(subcommand)]
    pub cmd: Command,
    /// Project root directory, defaults to the current directory
    #[clap(long)]
    pub root: Option<String>,
    /// Resolution report written by the build, overrides DEPSLOCK_REPORT_FILE
    #[clap(short, long)]
    pub report_location: Option<String>,
    /// Lock file to create, update or verify, overrides DEPSLOCK_LOCK_FILE
    #[clap(short, long)]
    pub lockfile_location: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    ///Creates or updates the lock file from the resolution report
    Lock {
        /// Fail instead of writing when the lock file is missing or out of date
        #[clap(long, conflicts_with = "recreate")]
        locked: bool,
        /// Write the lock file even when it is up to date
        #[clap(long)]
        recreate: bool,
    },
    ///Deletes the lock file
    Clean,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_cli() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn parse_lock_flags() {
        let args = CliArgs::parse_from(["depslock", "-l", "gradle.lock", "lock", "--locked"]);
        assert_eq!(args.lockfile_location.as_deref(), Some("gradle.lock"));
        assert!(matches!(
            args.cmd,
            Command::Lock {
                locked: true,
                recreate: false
            }
        ));
    }

    #[test]
    fn reject_conflicting_modes() {
        assert!(CliArgs::try_parse_from(["depslock", "lock", "--locked", "--recreate"]).is_err());
    }

    #[test]
    fn help_names_environment_overrides() {
        let help = CliArgs::command().render_help().to_string();
        assert!(help.contains("DEPSLOCK_REPORT_FILE"));
        assert!(help.contains("DEPSLOCK_LOCK_FILE"));
    }
}
