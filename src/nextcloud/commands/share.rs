use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::Storage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareKind {
    /// Public link where visitors can only upload.
    FileDrop,
    /// Public link where visitors can only read.
    ReadOnly,
}

impl ShareKind {
    fn label(&self) -> &'static str {
        match self {
            ShareKind::FileDrop => "File drop",
            ShareKind::ReadOnly => "Read-only",
        }
    }
}

pub fn create<S: Storage>(storage: &S, path: &str, kind: ShareKind) -> Result<CmdResult> {
    let share = match kind {
        ShareKind::FileDrop => storage.create_file_drop_share(path)?,
        ShareKind::ReadOnly => storage.create_read_only_share(path)?,
    };

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "{} share created for {} (id {})",
        kind.label(),
        path,
        share.id
    )));
    Ok(result.with_share(share))
}

pub fn list<S: Storage>(storage: &S, path: &str) -> Result<CmdResult> {
    let share = storage.get_share(path)?;
    let mut result = CmdResult::default();
    if share.elements.is_empty() {
        result.add_message(CmdMessage::info(format!("No shares for {path}")));
    }
    Ok(result.with_share(share))
}

pub fn delete<S: Storage>(storage: &S, id: u64) -> Result<CmdResult> {
    storage.delete_share(id)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Share {id} deleted")));
    Ok(result)
}
