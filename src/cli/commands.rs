use tracing::{debug, error};

use crate::cli;
use crate::core::error::{LaunchError, Result};
use crate::core::launcher;
use crate::core::model::FAILURE_EXIT;
use crate::platform::linux::LinuxHost;

/// Parse the process arguments, launch, and return the exit status for
/// `main` to terminate with.
pub fn dispatch<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    match run(args) {
        Ok(code) => code,
        Err(e @ LaunchError::InvalidInvocation { .. }) => {
            debug!("{e}");
            eprintln!("{}", cli::usage());
            FAILURE_EXIT
        }
        Err(e) => {
            error!("{e}");
            FAILURE_EXIT
        }
    }
}

fn run<I, T>(args: I) -> Result<i32>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let invocation = cli::parse(args)?;
    launcher::launch(&LinuxHost, &invocation)
}
