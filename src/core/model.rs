use std::ffi::{CStr, CString, OsString};
use std::os::unix::ffi::OsStringExt;

use nix::mount::MsFlags;
use nix::sys::wait::WaitStatus;

use super::error::{LaunchError, Result};

/// Exit status for every fatal failure inside pidbox itself.
pub const FAILURE_EXIT: i32 = 1;

/// The command to run inside the namespace, ready to hand to `execvp`.
///
/// Built once in the launcher before cloning. The isolated entry reads its
/// own copy of it after the clone, so it never needs to allocate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// `argv[0]` for the target, also the name searched along `PATH`.
    argv: Vec<CString>,
}

impl Invocation {
    /// Convert raw command-line words into an exec-ready argument vector.
    pub fn new(cmd: Vec<OsString>) -> Result<Self> {
        if cmd.is_empty() {
            return Err(LaunchError::InvalidInvocation {
                reason: "no command given".into(),
            });
        }

        let argv = cmd
            .into_iter()
            .map(|word| {
                CString::new(word.into_vec()).map_err(|e| LaunchError::InvalidInvocation {
                    reason: format!(
                        "argument {:?} contains a NUL byte",
                        String::from_utf8_lossy(&e.into_vec())
                    ),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { argv })
    }

    /// The command name, searched along `PATH` by `execvp`.
    pub fn program(&self) -> &CStr {
        &self.argv[0]
    }

    /// Full argument vector, including the program as `argv[0]`.
    pub fn argv(&self) -> &[CString] {
        &self.argv
    }

    /// Lossy, human-readable program name for diagnostics.
    pub fn display_program(&self) -> String {
        self.program().to_string_lossy().into_owned()
    }
}

/// One `mount(2)` call with fixed, literal arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MountSpec {
    pub source: Option<&'static str>,
    pub target: &'static str,
    pub fstype: Option<&'static str>,
    pub flags: MsFlags,
    /// What the call does, used in diagnostics.
    pub action: &'static str,
}

/// Make the whole mount tree private so nothing propagates to or from the
/// host.
pub const PRIVATE_ROOT: MountSpec = MountSpec {
    source: None,
    target: "/",
    fstype: None,
    flags: MsFlags::MS_REC.union(MsFlags::MS_PRIVATE),
    action: "make / private recursively",
};

pub const PRIVATE_PROC: MountSpec = MountSpec {
    source: None,
    target: "/proc",
    fstype: None,
    flags: MsFlags::MS_REC.union(MsFlags::MS_PRIVATE),
    action: "make /proc private recursively",
};

/// A fresh procfs reflecting the new pid namespace.
pub const FRESH_PROC: MountSpec = MountSpec {
    source: Some("proc"),
    target: "/proc",
    fstype: Some("proc"),
    flags: MsFlags::MS_NOSUID
        .union(MsFlags::MS_NOEXEC)
        .union(MsFlags::MS_NODEV),
    action: "mount proc on /proc",
};

/// The isolated entry's mount sequence, in the only safe order: propagation
/// must be private before the new procfs goes on top.
pub const PROC_SETUP: [MountSpec; 3] = [PRIVATE_ROOT, PRIVATE_PROC, FRESH_PROC];

/// Map the isolated entry's terminal wait status to the launcher's own exit
/// status. Death by signal follows the shell's `128 + signo` convention.
pub fn exit_code(status: WaitStatus) -> i32 {
    match status {
        WaitStatus::Exited(_, code) => code,
        WaitStatus::Signaled(_, sig, _) => 128 + sig as i32,
        _ => FAILURE_EXIT,
    }
}
