use std::convert::Infallible;

use tracing::{debug, error};

use super::error::{LaunchError, Result};
use super::host::Host;
use super::model::{exit_code, Invocation, FAILURE_EXIT, PROC_SETUP};
use super::privilege::{Elevated, Role};

/// Size of the isolated entry's stack.
pub const STACK_SIZE: usize = 40 * 1024;

/// Run `invocation` as pid 1 of new pid and mount namespaces and return the
/// exit status to relay.
///
/// The stack stays owned by the launcher until the isolated entry has been
/// reaped.
pub fn launch<H: Host>(host: &H, invocation: &Invocation) -> Result<i32> {
    let elevated = Elevated::acquire(host, Role::Launcher)?;
    let mut stack = allocate_stack(STACK_SIZE)?;

    let entry = Box::new(|| isolated_entry(host, invocation));
    let child = host
        .spawn_isolated(&mut stack, entry)
        .map_err(LaunchError::NamespaceCreation)?;

    debug!(pid = %child, "waiting for isolated entry");
    let _ = elevated.drop_privileges(host)?;

    let status = host
        .wait(child)
        .map_err(|source| LaunchError::WaitFailure { pid: child, source })?;
    let code = exit_code(status);
    debug!(pid = %child, code, "isolated entry terminated");
    Ok(code)
}

/// Allocate the isolated entry's stack without aborting on OOM.
fn allocate_stack(size: usize) -> Result<Vec<u8>> {
    let mut stack = Vec::new();
    stack
        .try_reserve_exact(size)
        .map_err(|source| LaunchError::AllocationFailure { size, source })?;
    stack.resize(size, 0);
    Ok(stack)
}

/// Body of the cloned child. Nothing here can propagate back to the
/// launcher, so failures are logged and become exit status 1.
fn isolated_entry<H: Host>(host: &H, invocation: &Invocation) -> isize {
    match prepare_and_exec(host, invocation) {
        Ok(never) => match never {},
        Err(e) => {
            error!("{e}");
            FAILURE_EXIT as isize
        }
    }
}

fn prepare_and_exec<H: Host>(host: &H, invocation: &Invocation) -> Result<Infallible> {
    let pid = host.pid();
    if pid.as_raw() != 1 {
        return Err(LaunchError::NamespaceInvariant { pid });
    }

    let elevated = Elevated::acquire(host, Role::IsolatedEntry)?;
    remount_proc(host)?;
    let _ = elevated.drop_privileges(host)?;

    debug!("launching {}", invocation.display_program());
    host.exec(invocation)
        .map_err(|source| LaunchError::Exec {
            program: invocation.display_program(),
            source,
        })
}

/// Isolate mount propagation, then mount a procfs for the new pid namespace.
/// The first failure stops the sequence.
fn remount_proc<H: Host>(host: &H) -> Result<()> {
    debug!("remounting /proc");
    for spec in &PROC_SETUP {
        host.mount(spec).map_err(|source| LaunchError::Mount {
            action: spec.action,
            source,
        })?;
    }
    Ok(())
}
