use std::collections::TryReserveError;

use nix::errno::Errno;
use nix::unistd::Pid;
use thiserror::Error;

use super::privilege::Role;

/// Every way a launch can fail. All of them are fatal for the context that
/// hits them.
#[derive(Error, Debug)]
pub enum LaunchError {
    /// No command, a help request, or an argument exec cannot carry.
    #[error("invalid invocation: {reason}")]
    InvalidInvocation { reason: String },

    /// The context is not running with an effective uid of root.
    #[error("{role} is not run as root (needs the setuid bit)")]
    InsufficientPrivilege { role: Role },

    #[error("failed to allocate {size}-byte stack for the isolated entry: {source}")]
    AllocationFailure {
        size: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("clone into new pid and mount namespace failed: {0}")]
    NamespaceCreation(#[source] Errno),

    /// The namespace primitive handed us a child that is not pid 1.
    #[error("isolated entry is not pid 1 (observed pid {pid})")]
    NamespaceInvariant { pid: Pid },

    #[error("failed to {action}: {source}")]
    Mount {
        action: &'static str,
        #[source]
        source: Errno,
    },

    #[error("setuid: {role} unable to drop user privileges: {source}")]
    PrivilegeDrop {
        role: Role,
        #[source]
        source: Errno,
    },

    #[error("failed to execvp {program}: {source}")]
    Exec {
        program: String,
        #[source]
        source: Errno,
    },

    #[error("waitpid on isolated entry {pid} failed: {source}")]
    WaitFailure {
        pid: Pid,
        #[source]
        source: Errno,
    },
}

pub type Result<T> = std::result::Result<T, LaunchError>;
