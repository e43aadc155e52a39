//! Privilege check for updates to control refs.

use super::Decision;
use crate::collaborators::PermissionCheck;
use crate::model::{Actor, Project};

/// The only line reported when a control ref update is denied.
pub const CONTROL_REF_DENIED: &str = "Only project administrators can update control refs.";

/// Allow the update only if `actor` administrates `project`.
///
/// Without an authenticated actor there is nobody to grant the privilege to, so the update is denied.
pub fn check(permissions: &dyn PermissionCheck, actor: Option<&Actor>, project: &Project) -> Decision {
    match actor {
        Some(actor) if permissions.is_project_admin(actor, project) => Decision::Allow,
        _ => Decision::deny([CONTROL_REF_DENIED]),
    }
}
