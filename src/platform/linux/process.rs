use std::convert::Infallible;

use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{execvp, Pid};

use crate::core::model::Invocation;

/// Replace the current process image, searching `PATH` for the program.
pub fn exec(invocation: &Invocation) -> nix::Result<Infallible> {
    execvp(invocation.program(), invocation.argv())
}

/// Wait for a child process to terminate and return how it ended.
///
/// Stops and continues are skipped; only exit or death by signal returns.
pub fn wait_for_child(pid: Pid) -> nix::Result<WaitStatus> {
    loop {
        match waitpid(pid, None) {
            Ok(status @ (WaitStatus::Exited(..) | WaitStatus::Signaled(..))) => return Ok(status),
            Ok(_) => continue,
            Err(Errno::EINTR) => continue,
            Err(e) => return Err(e),
        }
    }
}
