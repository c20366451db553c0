pub mod mounts;
pub mod namespaces;
pub mod process;

use std::convert::Infallible;

use nix::sys::wait::WaitStatus;
use nix::unistd::{self, Pid, Uid};

use crate::core::host::{Entry, Host};
use crate::core::model::{Invocation, MountSpec};

/// The real kernel, via `nix`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinuxHost;

impl Host for LinuxHost {
    fn pid(&self) -> Pid {
        unistd::getpid()
    }

    fn real_uid(&self) -> Uid {
        unistd::getuid()
    }

    fn effective_uid(&self) -> Uid {
        unistd::geteuid()
    }

    fn set_uid(&self, uid: Uid) -> nix::Result<()> {
        unistd::setuid(uid)
    }

    fn mount(&self, spec: &MountSpec) -> nix::Result<()> {
        mounts::apply(spec)
    }

    fn exec(&self, invocation: &Invocation) -> nix::Result<Infallible> {
        process::exec(invocation)
    }

    fn spawn_isolated<'a>(&self, stack: &'a mut [u8], entry: Entry<'a>) -> nix::Result<Pid> {
        namespaces::clone_isolated(stack, entry)
    }

    fn wait(&self, child: Pid) -> nix::Result<WaitStatus> {
        process::wait_for_child(child)
    }
}
