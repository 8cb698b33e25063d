//! # Storage Layer
//!
//! The [`Storage`] trait is the capability set every caller depends on: WebDAV
//! file operations plus the OCS share and group-folder calls, behind one
//! abstraction.
//!
//! ## Implementations
//!
//! - [`client::NextcloudClient`]: talks to a real server. File operations go to
//!   `remote.php/webdav`, shares to the OCS v2 share API, group folders to the
//!   `groupfolders` app. HTTP itself sits behind [`transport::Transport`].
//! - [`memory::InMemoryStorage`]: no server at all. Mimics the observable
//!   behaviour of Nextcloud closely enough for tests and dry runs.
//!
//! ## Paths
//!
//! Remote paths are relative to the user's WebDAV root and use `/` as the
//! separator. They are cleaned like a filesystem join: empty and `.` segments
//! disappear and `..` removes the previous segment.
//!
//! ## Composite operations
//!
//! `upload_dir`, `create_file_drop_share` and `create_read_only_share` are
//! provided methods built on the primitives, so every backend shares the same
//! semantics (fail-fast uploads, create-then-narrow shares).

use crate::error::{CloudError, Result};
use crate::model::{permissions, share_type, ShareResult};
use std::fs;
use std::path::PathBuf;

pub mod client;
pub mod memory;
pub mod transport;

/// Abstract interface for remote file storage and sharing.
pub trait Storage {
    /// Create a directory (MKCOL).
    fn mkdir(&self, path: &str) -> Result<()>;

    /// Delete a file or directory.
    fn delete(&self, path: &str) -> Result<()>;

    /// Upload raw bytes to `dest`, replacing any existing file.
    fn upload(&self, src: &[u8], dest: &str) -> Result<()>;

    /// Download the raw content of a file.
    fn download(&self, path: &str) -> Result<Vec<u8>>;

    /// Whether the path exists. Any error counts as "no".
    fn exists(&self, path: &str) -> bool;

    fn create_group_folder(&self, mount_point: &str) -> Result<ShareResult>;

    fn add_group_to_group_folder(&self, group: &str, folder_id: u64) -> Result<ShareResult>;

    fn set_group_permissions_for_group_folder(
        &self,
        permissions: u32,
        group: &str,
        folder_id: u64,
    ) -> Result<ShareResult>;

    fn create_share(
        &self,
        path: &str,
        share_type: u32,
        public_upload: bool,
        permissions: u32,
    ) -> Result<ShareResult>;

    /// List the shares of a path. `elements` is empty when there are none.
    fn get_share(&self, path: &str) -> Result<ShareResult>;

    fn delete_share(&self, id: u64) -> Result<ShareResult>;

    /// Change the permissions of an existing share.
    fn update_share_permissions(&self, id: u64, permissions: u32) -> Result<ShareResult>;

    /// Upload every local file matching the glob `pattern` into `dest`,
    /// keeping base names. Stops at the first read or upload failure.
    fn upload_dir(&self, pattern: &str, dest: &str) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in glob::glob(pattern)? {
            files.push(entry.map_err(|e| CloudError::Io(e.into_error()))?);
        }

        for file in &files {
            let data = fs::read(file)?;
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            self.upload(&data, &join_remote(dest, &name))?;
        }

        Ok(files)
    }

    /// Create a public upload-only link share.
    fn create_file_drop_share(&self, path: &str) -> Result<ShareResult> {
        let created = self.create_share(path, share_type::PUBLIC_LINK, true, permissions::CREATE)?;
        self.update_share_permissions(created.id, permissions::CREATE)
    }

    /// Create a public read-only link share.
    fn create_read_only_share(&self, path: &str) -> Result<ShareResult> {
        let created = self.create_share(path, share_type::PUBLIC_LINK, true, permissions::CREATE)?;
        self.update_share_permissions(created.id, permissions::READ)
    }
}

/// Split a remote path into clean segments.
pub fn path_segments(path: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments
}

/// Canonical form of a remote path: clean segments joined by `/`, no
/// leading or trailing slash. The WebDAV root is the empty string.
pub fn normalize_path(path: &str) -> String {
    path_segments(path).join("/")
}

/// Join a remote directory and a name.
pub fn join_remote(dir: &str, name: &str) -> String {
    normalize_path(&format!("{dir}/{name}"))
}

#[cfg(test)]
mod tests {
    use super::memory::InMemoryStorage;
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn normalizes_paths_like_a_join() {
        assert_eq!(normalize_path("/Test//Folder/"), "Test/Folder");
        assert_eq!(normalize_path("./a/./b"), "a/b");
        assert_eq!(normalize_path("a/b/../c"), "a/c");
        assert_eq!(normalize_path("../../a"), "a");
        assert_eq!(normalize_path("/"), "");
    }

    #[test]
    fn joins_remote_paths() {
        assert_eq!(join_remote("Test/Folder/", "test.txt"), "Test/Folder/test.txt");
        assert_eq!(join_remote("", "test.txt"), "test.txt");
    }

    fn fixture_dir(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    #[test]
    fn upload_dir_uploads_every_match() {
        let dir = fixture_dir(&[("a.txt", "A"), ("b.txt", "B"), ("c.md", "C")]);
        let storage = InMemoryStorage::new();
        storage.mkdir("Test").unwrap();

        let pattern = format!("{}/*.txt", dir.path().display());
        let files = storage.upload_dir(&pattern, "Test/").unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(storage.download("Test/a.txt").unwrap(), b"A");
        assert_eq!(storage.download("Test/b.txt").unwrap(), b"B");
        assert!(!storage.exists("Test/c.md"));
    }

    #[test]
    fn upload_dir_with_no_matches_is_empty() {
        let dir = fixture_dir(&[]);
        let storage = InMemoryStorage::new();
        let pattern = format!("{}/*", dir.path().display());
        assert!(storage.upload_dir(&pattern, "").unwrap().is_empty());
    }

    #[test]
    fn upload_dir_stops_at_first_unreadable_match() {
        // Matches sort as a.txt, b.txt (a directory), c.txt.
        let dir = fixture_dir(&[("a.txt", "A"), ("c.txt", "C")]);
        fs::create_dir(dir.path().join("b.txt")).unwrap();
        let storage = InMemoryStorage::new();

        let pattern = format!("{}/*.txt", dir.path().display());
        let err = storage.upload_dir(&pattern, "").unwrap_err();

        assert!(matches!(err, CloudError::Io(_)));
        assert!(storage.exists("a.txt"));
        assert!(!storage.exists("c.txt"));
    }

    #[test]
    fn upload_dir_stops_at_first_upload_failure() {
        let dir = fixture_dir(&[("a.txt", "A"), ("b.txt", "B")]);
        let storage = InMemoryStorage::new();

        let pattern = format!("{}/*.txt", dir.path().display());
        let err = storage.upload_dir(&pattern, "Missing").unwrap_err();

        assert!(err.exception().is_some());
        assert!(!storage.exists("Missing/a.txt"));
    }

    #[test]
    fn upload_dir_rejects_bad_pattern() {
        let storage = InMemoryStorage::new();
        assert!(matches!(
            storage.upload_dir("[", ""),
            Err(CloudError::Pattern(_))
        ));
    }

    #[test]
    fn file_drop_share_narrows_to_create() {
        let storage = InMemoryStorage::new();
        storage.mkdir("ShareTest").unwrap();

        let result = storage.create_file_drop_share("ShareTest").unwrap();
        assert_eq!(result.status_code, 200);
        assert!(!result.url.is_empty());
        assert_eq!(
            storage.share_permissions(result.id),
            Some(permissions::CREATE)
        );
    }

    #[test]
    fn read_only_share_narrows_to_read() {
        let storage = InMemoryStorage::new();
        storage.mkdir("ShareTest").unwrap();

        let result = storage.create_read_only_share("ShareTest").unwrap();
        assert_eq!(storage.share_permissions(result.id), Some(permissions::READ));
    }

    #[test]
    fn composite_share_fails_when_create_fails() {
        let storage = InMemoryStorage::new();
        let err = storage.create_file_drop_share("Missing").unwrap_err();
        assert_eq!(err.api_code(), Some(404));
    }
}
