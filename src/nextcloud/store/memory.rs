use super::{normalize_path, Storage};
use crate::error::{CloudError, Result};
use crate::model::{share_type, ShareElement, ShareResult, APPS_SUCCESS, SHARE_SUCCESS};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

const LINK_BASE: &str = "https://memory.invalid/s";

const NOT_FOUND: &str = "Sabre\\DAV\\Exception\\NotFound";
const METHOD_NOT_ALLOWED: &str = "Sabre\\DAV\\Exception\\MethodNotAllowed";
const CONFLICT: &str = "Sabre\\DAV\\Exception\\Conflict";
const FORBIDDEN: &str = "Sabre\\DAV\\Exception\\Forbidden";
const NOT_IMPLEMENTED: &str = "Sabre\\DAV\\Exception\\NotImplemented";

#[derive(Debug, Clone)]
struct Share {
    path: String,
    share_type: u32,
    permissions: u32,
}

impl Share {
    fn url(&self, id: u64) -> String {
        if self.share_type == share_type::PUBLIC_LINK {
            format!("{LINK_BASE}/{id:010}")
        } else {
            String::new()
        }
    }
}

#[derive(Debug, Clone, Default)]
struct GroupFolder {
    groups: BTreeMap<String, u32>,
}

#[derive(Debug, Default)]
struct State {
    files: BTreeMap<String, Vec<u8>>,
    // Directories other than the root, which always exists.
    dirs: BTreeSet<String>,
    shares: BTreeMap<u64, Share>,
    group_folders: BTreeMap<u64, GroupFolder>,
    last_id: u64,
}

impl State {
    fn is_dir(&self, path: &str) -> bool {
        path.is_empty() || self.dirs.contains(path)
    }

    fn exists(&self, path: &str) -> bool {
        self.is_dir(path) || self.files.contains_key(path)
    }

    fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }
}

/// Server-less [`Storage`] keeping files, shares and group folders in memory.
///
/// Failures are reported the way Nextcloud reports them: WebDAV problems as
/// `Remote` errors carrying Sabre exception names, share and group-folder
/// problems as `Api` errors carrying the OCS status code.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    state: RefCell<State>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current permissions of a share, if it exists.
    pub fn share_permissions(&self, id: u64) -> Option<u32> {
        self.state.borrow().shares.get(&id).map(|s| s.permissions)
    }

    /// Groups attached to a group folder with their permissions.
    pub fn group_folder_groups(&self, folder_id: u64) -> Option<BTreeMap<String, u32>> {
        self.state
            .borrow()
            .group_folders
            .get(&folder_id)
            .map(|f| f.groups.clone())
    }
}

fn parent_of(path: &str) -> &str {
    path.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("")
}

fn is_within(path: &str, dir: &str) -> bool {
    path == dir
        || path
            .strip_prefix(dir)
            .is_some_and(|rest| rest.starts_with('/'))
}

fn remote(exception: &str, message: impl Into<String>) -> CloudError {
    CloudError::Remote {
        exception: exception.to_string(),
        message: message.into(),
    }
}

fn api_error(operation: &str, code: u64, message: &str) -> CloudError {
    CloudError::Api {
        operation: operation.to_string(),
        code,
        message: message.to_string(),
    }
}

fn success(code: u64, id: u64, url: String) -> ShareResult {
    ShareResult {
        status: "ok".to_string(),
        status_code: code,
        message: "OK".to_string(),
        id,
        url,
        elements: Vec::new(),
    }
}

impl Storage for InMemoryStorage {
    fn mkdir(&self, path: &str) -> Result<()> {
        let path = normalize_path(path);
        let mut state = self.state.borrow_mut();

        if state.exists(&path) {
            return Err(remote(
                METHOD_NOT_ALLOWED,
                "The resource you tried to create already exists",
            ));
        }
        if !state.is_dir(parent_of(&path)) {
            return Err(remote(CONFLICT, "Parent node does not exist"));
        }
        state.dirs.insert(path);
        Ok(())
    }

    fn delete(&self, path: &str) -> Result<()> {
        let path = normalize_path(path);
        let mut state = self.state.borrow_mut();

        if path.is_empty() {
            return Err(remote(FORBIDDEN, "Cannot delete the root folder"));
        }
        if state.files.remove(&path).is_none() {
            if !state.dirs.remove(&path) {
                return Err(remote(
                    NOT_FOUND,
                    format!("File with name {path} could not be located"),
                ));
            }
            state.dirs.retain(|d| !is_within(d, &path));
            state.files.retain(|f, _| !is_within(f, &path));
        }
        state.shares.retain(|_, s| !is_within(&s.path, &path));
        Ok(())
    }

    fn upload(&self, src: &[u8], dest: &str) -> Result<()> {
        let dest = normalize_path(dest);
        let mut state = self.state.borrow_mut();

        if state.is_dir(&dest) {
            return Err(remote(CONFLICT, format!("{dest} is a collection")));
        }
        let parent = parent_of(&dest);
        if !state.is_dir(parent) {
            return Err(remote(
                NOT_FOUND,
                format!("File with name {parent} could not be located"),
            ));
        }
        state.files.insert(dest, src.to_vec());
        Ok(())
    }

    fn download(&self, path: &str) -> Result<Vec<u8>> {
        let path = normalize_path(path);
        let state = self.state.borrow();

        if let Some(content) = state.files.get(&path) {
            return Ok(content.clone());
        }
        if state.is_dir(&path) {
            return Err(remote(
                NOT_IMPLEMENTED,
                "GET is only implemented on File objects",
            ));
        }
        Err(remote(
            NOT_FOUND,
            format!("File with name {path} could not be located"),
        ))
    }

    fn exists(&self, path: &str) -> bool {
        self.state.borrow().exists(&normalize_path(path))
    }

    fn create_group_folder(&self, mount_point: &str) -> Result<ShareResult> {
        if mount_point.trim().is_empty() {
            return Err(api_error("create group folder", 400, "Mount point is empty"));
        }
        let mut state = self.state.borrow_mut();
        let id = state.next_id();
        state.group_folders.insert(id, GroupFolder::default());
        Ok(success(APPS_SUCCESS, id, String::new()))
    }

    fn add_group_to_group_folder(&self, group: &str, folder_id: u64) -> Result<ShareResult> {
        let mut state = self.state.borrow_mut();
        let folder = state
            .group_folders
            .get_mut(&folder_id)
            .ok_or_else(|| api_error("add group to group folder", 404, "Folder not found"))?;
        folder
            .groups
            .entry(group.to_string())
            .or_insert(crate::model::permissions::ALL);
        Ok(success(APPS_SUCCESS, 0, String::new()))
    }

    fn set_group_permissions_for_group_folder(
        &self,
        permissions: u32,
        group: &str,
        folder_id: u64,
    ) -> Result<ShareResult> {
        let operation = "set group folder permissions";
        let mut state = self.state.borrow_mut();
        let folder = state
            .group_folders
            .get_mut(&folder_id)
            .ok_or_else(|| api_error(operation, 404, "Folder not found"))?;
        let current = folder
            .groups
            .get_mut(group)
            .ok_or_else(|| api_error(operation, 404, "Group not attached to folder"))?;
        *current = permissions;
        Ok(success(APPS_SUCCESS, 0, String::new()))
    }

    fn create_share(
        &self,
        path: &str,
        share_type: u32,
        _public_upload: bool,
        permissions: u32,
    ) -> Result<ShareResult> {
        let path = normalize_path(path);
        let mut state = self.state.borrow_mut();

        if path.is_empty() {
            return Err(api_error(
                "create share",
                403,
                "You cannot share your root folder",
            ));
        }
        if !state.exists(&path) {
            return Err(api_error(
                "create share",
                404,
                "Wrong path, file/folder does not exist",
            ));
        }

        let id = state.next_id();
        let share = Share {
            path,
            share_type,
            permissions,
        };
        let url = share.url(id);
        state.shares.insert(id, share);
        Ok(success(SHARE_SUCCESS, id, url))
    }

    fn get_share(&self, path: &str) -> Result<ShareResult> {
        let path = normalize_path(path);
        let state = self.state.borrow();

        if !state.exists(&path) {
            return Err(api_error(
                "get share",
                404,
                "Wrong path, file/folder does not exist",
            ));
        }

        let mut result = success(SHARE_SUCCESS, 0, String::new());
        result.elements = state
            .shares
            .iter()
            .filter(|(_, s)| s.path == path)
            .map(|(id, s)| ShareElement {
                id: *id,
                url: s.url(*id),
            })
            .collect();
        Ok(result)
    }

    fn delete_share(&self, id: u64) -> Result<ShareResult> {
        let mut state = self.state.borrow_mut();
        if state.shares.remove(&id).is_none() {
            return Err(api_error(
                "delete share",
                404,
                "Wrong share ID, share does not exist",
            ));
        }
        Ok(success(SHARE_SUCCESS, 0, String::new()))
    }

    fn update_share_permissions(&self, id: u64, permissions: u32) -> Result<ShareResult> {
        let mut state = self.state.borrow_mut();
        let share = state.shares.get_mut(&id).ok_or_else(|| {
            api_error("update share", 404, "Wrong share ID, share does not exist")
        })?;
        share.permissions = permissions;
        let url = share.url(id);
        Ok(success(SHARE_SUCCESS, id, url))
    }
}
