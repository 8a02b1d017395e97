//! Matched module to permission record.

use backoffice_core::models::module::ModuleRecord;
use backoffice_core::models::permission::PermissionRecord;
use tracing::debug;

/// Permission entry of `module`, or [`PermissionRecord::FALLBACK`]
/// (visible, not actionable) when there is no module or it carries no
/// entry for the current role.
pub fn extract(module: Option<&ModuleRecord>) -> PermissionRecord {
    match module {
        Some(ModuleRecord {
            permissions: Some(p),
            ..
        }) => *p,
        Some(record) => {
            debug!(module_id = record.id, "module has no permission entry, using fallback");
            PermissionRecord::FALLBACK
        }
        None => PermissionRecord::FALLBACK,
    }
}
