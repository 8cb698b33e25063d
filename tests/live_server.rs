//! Lifecycle tests against a real Nextcloud instance.
//!
//! Ignored by default. Run with:
//!
//! ```text
//! NEXTCLOUD_TEST_URL=http://localhost:18080 NEXTCLOUD_TEST_USERNAME=admin \
//! NEXTCLOUD_TEST_PASSWORD=password cargo test --test live_server -- --ignored --test-threads=1
//! ```
//!
//! The group-folder test also needs the groupfolders app and an `admin` group.

use nextcloud::model::permissions;
use nextcloud::store::client::NextcloudClient;
use nextcloud::store::Storage;
use std::fs;
use tempfile::TempDir;

const HELLO: &[u8] = b"Hello World!\n";

fn client() -> NextcloudClient {
    let var = |name: &str| std::env::var(name).unwrap_or_else(|_| panic!("{name} is not set"));
    NextcloudClient::new(
        &var("NEXTCLOUD_TEST_URL"),
        &var("NEXTCLOUD_TEST_USERNAME"),
        &var("NEXTCLOUD_TEST_PASSWORD"),
    )
    .unwrap()
}

/// Removes a remote directory when dropped, even if the test panicked.
struct Cleanup<'a> {
    client: &'a NextcloudClient,
    path: &'static str,
}

impl Drop for Cleanup<'_> {
    fn drop(&mut self) {
        let _ = self.client.delete(self.path);
    }
}

fn fresh_dir<'a>(client: &'a NextcloudClient, path: &'static str) -> Cleanup<'a> {
    let _ = client.delete(path);
    client.mkdir(path).unwrap();
    Cleanup { client, path }
}

#[test]
#[ignore]
fn mkdir_and_delete() {
    let client = client();
    let guard = fresh_dir(&client, "Test");
    assert!(client.exists("Test"));

    client.delete("Test").unwrap();
    assert!(!client.exists("Test"));
    drop(guard);
}

#[test]
#[ignore]
fn upload_then_download() {
    let client = client();
    let _guard = fresh_dir(&client, "Test");

    client.upload(HELLO, "Test/test.txt").unwrap();
    assert_eq!(client.download("Test/test.txt").unwrap(), HELLO);

    client.upload(b"", "Test/empty.txt").unwrap();
    assert!(client.download("Test/empty.txt").unwrap().is_empty());
}

#[test]
#[ignore]
fn upload_dir_uploads_matches() {
    let client = client();
    let _guard = fresh_dir(&client, "Test");
    client.mkdir("Test/Folder").unwrap();

    let local = TempDir::new().unwrap();
    fs::write(local.path().join("test.txt"), HELLO).unwrap();
    let pattern = format!("{}/*", local.path().display());

    let files = client.upload_dir(&pattern, "Test/Folder/").unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(client.download("Test/Folder/test.txt").unwrap(), HELLO);
}

#[test]
#[ignore]
fn mkdir_twice_reports_remote_exception() {
    let client = client();
    let _guard = fresh_dir(&client, "Test");
    let err = client.mkdir("Test").unwrap_err();
    assert!(err.exception().is_some());
}

#[test]
#[ignore]
fn file_drop_share_lifecycle() {
    let client = client();
    let _guard = fresh_dir(&client, "ShareTest");

    let created = client.create_file_drop_share("ShareTest").unwrap();
    assert_eq!(created.status_code, 200);
    assert!(!created.url.is_empty());

    let listed = client.get_share("ShareTest").unwrap();
    assert!(!listed.elements.is_empty());

    for element in &listed.elements {
        client.delete_share(element.id).unwrap();
    }
    assert!(client.get_share("ShareTest").unwrap().elements.is_empty());
}

#[test]
#[ignore]
fn read_only_share_lifecycle() {
    let client = client();
    let _guard = fresh_dir(&client, "ShareTest");

    let created = client.create_read_only_share("ShareTest").unwrap();
    assert_eq!(created.status_code, 200);
    assert!(!created.url.is_empty());

    let listed = client.get_share("ShareTest").unwrap();
    let element = &listed.elements[0];
    client.delete_share(element.id).unwrap();
}

#[test]
#[ignore]
fn group_folder_workflow() {
    let client = client();
    let folder = client.create_group_folder("GroupFolder").unwrap();
    assert_eq!(folder.status_code, 100);

    let added = client.add_group_to_group_folder("admin", folder.id).unwrap();
    assert_eq!(added.status_code, 100);

    let updated = client
        .set_group_permissions_for_group_folder(permissions::ALL, "admin", folder.id)
        .unwrap();
    assert_eq!(updated.status_code, 100);
}
