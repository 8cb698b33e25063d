//! # API Facade
//!
//! A thin facade over the command layer and the single entry point for UI
//! clients. It dispatches to `commands/*.rs`, turns loose inputs (strings,
//! optional flags) into the types the commands expect, and returns
//! `Result<CmdResult>`. It never prints and never exits.
//!
//! `CloudApi<S: Storage>` is generic over the backend:
//! - Production: `CloudApi<NextcloudClient>`
//! - Testing: `CloudApi<InMemoryStorage>`
//!
//! Tests here check dispatch only; behaviour is tested in the command and
//! store modules.

use crate::commands::{self, share::ShareKind, upload::UploadStrategy, CmdResult};
use crate::error::Result;
use crate::store::Storage;
use std::path::{Path, PathBuf};

pub struct CloudApi<S: Storage> {
    storage: S,
    workdir: PathBuf,
}

impl<S: Storage> CloudApi<S> {
    /// `workdir` is the directory relative upload sources are read from.
    pub fn new(storage: S, workdir: PathBuf) -> Self {
        Self { storage, workdir }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn upload(
        &self,
        sources: &[PathBuf],
        target: Option<&str>,
        strategy: UploadStrategy,
    ) -> Result<CmdResult> {
        commands::upload::run(&self.storage, &self.workdir, sources, target, strategy)
    }

    pub fn upload_pattern(&self, pattern: &str, dest: &str) -> Result<CmdResult> {
        commands::upload::run_pattern(&self.storage, pattern, dest)
    }

    pub fn mkdir(&self, path: &str) -> Result<CmdResult> {
        commands::files::mkdir(&self.storage, path)
    }

    pub fn delete(&self, path: &str) -> Result<CmdResult> {
        commands::files::delete(&self.storage, path)
    }

    pub fn download(&self, path: &str, output: Option<&Path>) -> Result<CmdResult> {
        commands::files::download(&self.storage, path, output)
    }

    pub fn exists(&self, path: &str) -> Result<CmdResult> {
        commands::files::exists(&self.storage, path)
    }

    pub fn create_share(&self, path: &str, kind: ShareKind) -> Result<CmdResult> {
        commands::share::create(&self.storage, path, kind)
    }

    pub fn list_shares(&self, path: &str) -> Result<CmdResult> {
        commands::share::list(&self.storage, path)
    }

    pub fn delete_share(&self, id: u64) -> Result<CmdResult> {
        commands::share::delete(&self.storage, id)
    }

    pub fn create_group_folder(
        &self,
        mount_point: &str,
        groups: &[String],
        permissions: Option<u32>,
    ) -> Result<CmdResult> {
        commands::group_folder::create(&self.storage, mount_point, groups, permissions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStorage;
    use std::fs;
    use tempfile::TempDir;

    fn api() -> CloudApi<InMemoryStorage> {
        CloudApi::new(InMemoryStorage::new(), PathBuf::from("."))
    }

    #[test]
    fn upload_reads_from_workdir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("test.txt"), "Hello World!\n").unwrap();
        let api = CloudApi::new(InMemoryStorage::new(), dir.path().to_path_buf());

        let result = api
            .upload(&[PathBuf::from("test.txt")], Some("Test"), UploadStrategy::BestEffort)
            .unwrap();

        assert_eq!(result.uploaded.len(), 1);
        assert!(api.storage().exists("Test/test.txt"));
    }

    #[test]
    fn file_commands_dispatch() {
        let api = api();
        api.mkdir("Test").unwrap();
        assert_eq!(api.exists("Test").unwrap().exists, Some(true));
        api.delete("Test").unwrap();
        assert_eq!(api.exists("Test").unwrap().exists, Some(false));
    }

    #[test]
    fn download_dispatches() {
        let api = api();
        api.storage().upload(b"abc", "a.txt").unwrap();
        assert_eq!(api.download("a.txt", None).unwrap().data, Some(b"abc".to_vec()));
    }

    #[test]
    fn share_commands_dispatch() {
        let api = api();
        api.mkdir("ShareTest").unwrap();

        let created = api.create_share("ShareTest", ShareKind::ReadOnly).unwrap();
        let id = created.share.unwrap().id;
        assert_eq!(api.list_shares("ShareTest").unwrap().share.unwrap().elements.len(), 1);

        api.delete_share(id).unwrap();
        assert!(api.list_shares("ShareTest").unwrap().share.unwrap().elements.is_empty());
    }

    #[test]
    fn group_folder_dispatches() {
        let api = api();
        let result = api
            .create_group_folder("GroupFolder", &["admin".to_string()], Some(1))
            .unwrap();
        assert!(result.share.is_some());
    }
}
