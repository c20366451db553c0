use std::fmt;

use nix::unistd::Uid;
use tracing::{debug, warn};

use super::error::{LaunchError, Result};
use super::host::Host;

/// Which of the two execution contexts is acting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The original process, which waits and relays the exit status.
    Launcher,
    /// The cloned child running as pid 1 in the new namespaces.
    IsolatedEntry,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Launcher => write!(f, "launcher"),
            Self::IsolatedEntry => write!(f, "isolated entry"),
        }
    }
}

/// Proof that the current context runs with an effective uid of root.
///
/// Obtained once per context from that context's own credentials. It is
/// neither `Clone` nor `Copy`: `drop_privileges` consumes it, and nothing
/// turns a [`Dropped`] back into an `Elevated`.
#[derive(Debug)]
pub struct Elevated {
    role: Role,
    real: Uid,
}

/// Outcome of a privilege drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Dropped {
    /// Real, effective and saved uids are now the invoking user's.
    Narrowed { uid: Uid },
    /// Invoked directly by root: there was nothing to drop to.
    Retained,
}

impl Elevated {
    /// Read the context's credentials and require an effective uid of root.
    pub fn acquire<H: Host>(host: &H, role: Role) -> Result<Self> {
        if !host.effective_uid().is_root() {
            return Err(LaunchError::InsufficientPrivilege { role });
        }
        Ok(Self {
            role,
            real: host.real_uid(),
        })
    }

    /// Permanently switch this context to the invoking user's uid.
    ///
    /// With an effective uid of root, `setuid` replaces the real, effective
    /// and saved uids together, so the change cannot be reverted.
    pub fn drop_privileges<H: Host>(self, host: &H) -> Result<Dropped> {
        if self.real.is_root() {
            warn!("{} not dropping privileges, running as root", self.role);
            return Ok(Dropped::Retained);
        }

        host.set_uid(self.real)
            .map_err(|source| LaunchError::PrivilegeDrop {
                role: self.role,
                source,
            })?;
        debug!(uid = %self.real, "{} dropped privileges", self.role);
        Ok(Dropped::Narrowed { uid: self.real })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::host::fake::FakeHost;
    use crate::core::model::PROC_SETUP;
    use nix::errno::Errno;

    #[test]
    fn acquire_requires_effective_root() {
        let host = FakeHost::setuid_from(1000);
        host.set_effective(1000);
        let err = Elevated::acquire(&host, Role::Launcher).unwrap_err();
        assert!(matches!(
            err,
            LaunchError::InsufficientPrivilege {
                role: Role::Launcher
            }
        ));
    }

    #[test]
    fn drop_switches_to_real_uid() {
        let host = FakeHost::setuid_from(1000);
        let elevated = Elevated::acquire(&host, Role::Launcher).unwrap();
        let dropped = elevated.drop_privileges(&host).unwrap();
        assert_eq!(
            dropped,
            Dropped::Narrowed {
                uid: Uid::from_raw(1000)
            }
        );
        assert_eq!(host.effective_uid(), Uid::from_raw(1000));
        assert_eq!(host.calls(), vec!["setuid 1000"]);
    }

    #[test]
    fn drop_as_real_root_is_a_no_op() {
        let host = FakeHost::root();
        let elevated = Elevated::acquire(&host, Role::IsolatedEntry).unwrap();
        assert_eq!(elevated.drop_privileges(&host).unwrap(), Dropped::Retained);
        assert!(host.calls().is_empty());
        assert!(host.effective_uid().is_root());
    }

    #[test]
    fn drop_failure_is_reported() {
        let host = FakeHost::setuid_from(1000);
        host.fail_setuid(Errno::EAGAIN);
        let elevated = Elevated::acquire(&host, Role::IsolatedEntry).unwrap();
        let err = elevated.drop_privileges(&host).unwrap_err();
        assert!(matches!(
            err,
            LaunchError::PrivilegeDrop {
                role: Role::IsolatedEntry,
                source: Errno::EAGAIN
            }
        ));
    }

    #[test]
    fn mount_after_drop_is_refused() {
        let host = FakeHost::setuid_from(1000);
        host.mount(&PROC_SETUP[2]).unwrap();

        let elevated = Elevated::acquire(&host, Role::IsolatedEntry).unwrap();
        let _ = elevated.drop_privileges(&host).unwrap();

        assert_eq!(host.mount(&PROC_SETUP[2]), Err(Errno::EPERM));
        assert!(Elevated::acquire(&host, Role::IsolatedEntry).is_err());
    }
}
