use nix::sched::{clone, CloneFlags};
use nix::unistd::Pid;

use crate::core::host::Entry;

/// Namespaces the isolated entry gets: its own pid space and mount table.
pub fn isolated_clone_flags() -> CloneFlags {
    CloneFlags::CLONE_NEWPID | CloneFlags::CLONE_NEWNS
}

/// Run `entry` on `stack` in a new child process that is pid 1 of fresh pid
/// and mount namespaces. The parent is notified with `SIGCHLD` on exit so the
/// child can be reaped with a plain `waitpid`.
pub fn clone_isolated<'a>(stack: &'a mut [u8], entry: Entry<'a>) -> nix::Result<Pid> {
    // SAFETY: without CLONE_VM the child gets a private copy of the address
    // space, so the closure's borrows stay valid in it. The launcher is
    // single-threaded at this point.
    unsafe { clone(entry, stack, isolated_clone_flags(), Some(libc::SIGCHLD)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_pid_and_mount_namespaces() {
        let flags = isolated_clone_flags();
        assert!(flags.contains(CloneFlags::CLONE_NEWPID));
        assert!(flags.contains(CloneFlags::CLONE_NEWNS));
        assert!(!flags.intersects(
            CloneFlags::CLONE_NEWUSER
                | CloneFlags::CLONE_NEWNET
                | CloneFlags::CLONE_NEWUTS
                | CloneFlags::CLONE_NEWIPC
                | CloneFlags::CLONE_NEWCGROUP
                | CloneFlags::CLONE_VM
        ));
    }
}
