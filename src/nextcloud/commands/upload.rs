use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::{join_remote, normalize_path, Storage};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// What to do when one file of a batch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadStrategy {
    /// Report the failure and carry on with the next file.
    #[default]
    BestEffort,
    /// Abort the batch with the first error.
    FailFast,
}

/// Upload local `sources` (relative to `root`) to the remote, optionally
/// below `target`.
///
/// The target directory is created once, before the first upload. That
/// attempt never fails the batch: an existing directory is the common case.
pub fn run<S: Storage>(
    storage: &S,
    root: &Path,
    sources: &[PathBuf],
    target: Option<&str>,
    strategy: UploadStrategy,
) -> Result<CmdResult> {
    let target = target.map(normalize_path).filter(|t| !t.is_empty());
    let mut result = CmdResult::default();
    let mut target_ready = false;

    for source in sources {
        let display = source.display().to_string();
        result.add_message(CmdMessage::info(format!("Uploading {display}")));

        let content = match fs::read(root.join(source)) {
            Ok(content) => content,
            Err(e) => match strategy {
                UploadStrategy::FailFast => return Err(e.into()),
                UploadStrategy::BestEffort => {
                    result.add_message(CmdMessage::error(format!("Can't upload {display}: {e}")));
                    continue;
                }
            },
        };

        let remote = remote_name(source);
        let dest = match &target {
            Some(dir) => {
                if !target_ready {
                    prepare_target(storage, dir, &mut result);
                    target_ready = true;
                }
                join_remote(dir, &remote)
            }
            None => normalize_path(&remote),
        };

        match storage.upload(&content, &dest) {
            Ok(()) => {
                result.add_message(CmdMessage::success(format!("Uploaded {display} to {dest}")));
                result.uploaded.push(source.clone());
            }
            Err(e) => match strategy {
                UploadStrategy::FailFast => return Err(e),
                UploadStrategy::BestEffort => {
                    result.add_message(CmdMessage::error(format!("Upload failed {display}: {e}")));
                }
            },
        }
    }

    Ok(result)
}

/// Upload every file matching a glob pattern into `dest`, stopping at the
/// first failure.
pub fn run_pattern<S: Storage>(storage: &S, pattern: &str, dest: &str) -> Result<CmdResult> {
    let uploaded = storage.upload_dir(pattern, dest)?;
    let mut result = CmdResult::default();
    let dest = normalize_path(dest);
    let shown = if dest.is_empty() { "/" } else { dest.as_str() };
    result.add_message(CmdMessage::success(format!(
        "Uploaded {} file(s) to {}",
        uploaded.len(),
        shown
    )));
    Ok(result.with_uploaded(uploaded))
}

fn prepare_target<S: Storage>(storage: &S, dir: &str, result: &mut CmdResult) {
    match storage.mkdir(dir) {
        Ok(()) => result.add_message(CmdMessage::info(format!("New directory created {dir}"))),
        Err(e) => info!("mkdir {} skipped: {}", dir, e),
    }
}

// Local separators become `/` on the remote side.
fn remote_name(source: &Path) -> String {
    source
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
