use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::Storage;
use std::fs;
use std::path::Path;

pub fn mkdir<S: Storage>(storage: &S, path: &str) -> Result<CmdResult> {
    storage.mkdir(path)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Directory created: {path}")));
    Ok(result)
}

pub fn delete<S: Storage>(storage: &S, path: &str) -> Result<CmdResult> {
    storage.delete(path)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Deleted: {path}")));
    Ok(result)
}

/// Download `path`. With `output` the bytes go to that local file,
/// otherwise they are returned in the result.
pub fn download<S: Storage>(storage: &S, path: &str, output: Option<&Path>) -> Result<CmdResult> {
    let data = storage.download(path)?;
    let mut result = CmdResult::default();

    match output {
        Some(file) => {
            fs::write(file, &data)?;
            result.add_message(CmdMessage::success(format!(
                "Downloaded {} ({} bytes) to {}",
                path,
                data.len(),
                file.display()
            )));
            Ok(result)
        }
        None => Ok(result.with_data(data)),
    }
}

pub fn exists<S: Storage>(storage: &S, path: &str) -> Result<CmdResult> {
    let found = storage.exists(path);
    let mut result = CmdResult::default();
    let message = if found {
        CmdMessage::success(format!("{path} exists"))
    } else {
        CmdMessage::warning(format!("{path} does not exist"))
    };
    result.add_message(message);
    Ok(result.with_exists(found))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::store::memory::InMemoryStorage;
    use tempfile::TempDir;

    #[test]
    fn mkdir_and_delete() {
        let storage = InMemoryStorage::new();
        mkdir(&storage, "Test").unwrap();
        assert!(storage.exists("Test"));

        delete(&storage, "Test").unwrap();
        assert!(!storage.exists("Test"));
    }

    #[test]
    fn mkdir_propagates_remote_error() {
        let storage = InMemoryStorage::new();
        mkdir(&storage, "Test").unwrap();
        assert!(mkdir(&storage, "Test").unwrap_err().exception().is_some());
    }

    #[test]
    fn download_returns_bytes() {
        let storage = InMemoryStorage::new();
        storage.upload(b"Hello World!\n", "test.txt").unwrap();

        let result = download(&storage, "test.txt", None).unwrap();
        assert_eq!(result.data.as_deref(), Some(&b"Hello World!\n"[..]));
    }

    #[test]
    fn download_writes_output_file() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("copy.txt");
        let storage = InMemoryStorage::new();
        storage.upload(b"content", "test.txt").unwrap();

        let result = download(&storage, "test.txt", Some(&output)).unwrap();

        assert!(result.data.is_none());
        assert_eq!(fs::read(&output).unwrap(), b"content");
    }

    #[test]
    fn exists_reports_both_ways() {
        let storage = InMemoryStorage::new();
        storage.mkdir("Test").unwrap();

        let found = exists(&storage, "Test").unwrap();
        assert_eq!(found.exists, Some(true));

        let missing = exists(&storage, "Nope").unwrap();
        assert_eq!(missing.exists, Some(false));
        assert_eq!(missing.messages[0].level, MessageLevel::Warning);
    }
}
