use nix::mount::mount;

use crate::core::model::MountSpec;

/// Perform a single mount.
pub fn apply(spec: &MountSpec) -> nix::Result<()> {
    mount(
        spec.source,
        spec.target,
        spec.fstype,
        spec.flags,
        None::<&str>,
    )
}
