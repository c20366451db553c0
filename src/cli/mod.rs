pub mod commands;

use std::ffi::OsString;

use clap::{CommandFactory, Parser};

use crate::core::error::{LaunchError, Result};
use crate::core::model::Invocation;

/// pidbox: run a command in its own pid and mount namespace.
///
/// Needs the setuid bit to work; the command runs as the invoking user
/// (`getuid()`), as pid 1, with a private /proc.
#[derive(Parser, Debug)]
#[command(
    name = "pidbox",
    override_usage = "pidbox <command> [args...]",
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Cli {
    /// The command and its arguments, passed through unchanged.
    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_parser = clap::value_parser!(OsString)
    )]
    pub cmd: Vec<OsString>,
}

/// Parse raw process arguments (including `argv[0]`) into an invocation.
///
/// A missing command, a leading `--help`/`-h`, or anything clap rejects is an
/// invalid invocation; no namespace work happens for any of them.
pub fn parse<I, T>(args: I) -> Result<Invocation>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::try_parse_from(args).map_err(|e| LaunchError::InvalidInvocation {
        reason: e.kind().to_string(),
    })?;

    match cli.cmd.first().and_then(|first| first.to_str()) {
        Some("--help" | "-h") => Err(LaunchError::InvalidInvocation {
            reason: "help requested".into(),
        }),
        _ => Invocation::new(cli.cmd),
    }
}

/// Help text shown on an invalid invocation.
pub fn usage() -> String {
    Cli::command().render_long_help().to_string()
}
