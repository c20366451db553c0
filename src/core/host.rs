use std::convert::Infallible;

use nix::sys::wait::WaitStatus;
use nix::unistd::{Pid, Uid};

use super::model::{Invocation, MountSpec};

/// Code run by the isolated entry; its return value becomes the child's exit
/// status.
pub type Entry<'a> = Box<dyn FnMut() -> isize + 'a>;

/// The operating-system primitives the launch sequence is built from.
///
/// Every query reads the calling context's own state: after the clone the
/// launcher and the isolated entry each see their own pid and credentials.
pub trait Host {
    fn pid(&self) -> Pid;
    fn real_uid(&self) -> Uid;
    fn effective_uid(&self) -> Uid;
    fn set_uid(&self, uid: Uid) -> nix::Result<()>;
    fn mount(&self, spec: &MountSpec) -> nix::Result<()>;

    /// Replace the process image. Only returns on failure.
    fn exec(&self, invocation: &Invocation) -> nix::Result<Infallible>;

    /// Start `entry` on `stack` as pid 1 of a new pid and mount namespace.
    fn spawn_isolated<'a>(&self, stack: &'a mut [u8], entry: Entry<'a>) -> nix::Result<Pid>;

    /// Block until `child` terminates and return its terminal status.
    fn wait(&self, child: Pid) -> nix::Result<WaitStatus>;
}
