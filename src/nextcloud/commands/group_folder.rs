use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::Storage;

/// Create a group folder, attach `groups` and, when given, set their
/// permissions. The first failing call aborts the workflow.
pub fn create<S: Storage>(
    storage: &S,
    mount_point: &str,
    groups: &[String],
    permissions: Option<u32>,
) -> Result<CmdResult> {
    let folder = storage.create_group_folder(mount_point)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Group folder {} created (id {})",
        mount_point, folder.id
    )));

    for group in groups {
        storage.add_group_to_group_folder(group, folder.id)?;
        result.add_message(CmdMessage::success(format!("Group {group} added")));

        if let Some(permissions) = permissions {
            storage.set_group_permissions_for_group_folder(permissions, group, folder.id)?;
            result.add_message(CmdMessage::info(format!(
                "Permissions for {group} set to {permissions}"
            )));
        }
    }

    Ok(result.with_share(folder))
}
