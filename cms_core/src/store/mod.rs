//! Filesystem-backed document store.
//!
//! One directory, one file per document, filename as identity. There is no
//! index or cache between requests; every operation goes straight to disk.

pub mod document;

pub use document::DocumentKind;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::{AppError, Result};

#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    /// The directory must already exist; startup code creates it.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Names of all regular files in the store, sorted.
    pub async fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut entries = fs::read_dir(&self.root).await?;

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }

        names.sort();
        Ok(names)
    }

    pub async fn read(&self, name: &str) -> Result<String> {
        let path = self.resolve(name)?;
        fs::read_to_string(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => AppError::NotFound(name.to_string()),
            _ => AppError::Io(e),
        })
    }

    /// Creates the file if absent, otherwise replaces its whole content.
    /// Writes are not atomic; concurrent writers to the same name race and
    /// the last write wins.
    pub async fn write(&self, name: &str, content: &str) -> Result<()> {
        let path = self.resolve(name)?;
        fs::write(&path, content).await?;
        Ok(())
    }

    pub async fn delete(&self, name: &str) -> Result<()> {
        let path = self.resolve(name)?;
        fs::remove_file(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => AppError::NotFound(name.to_string()),
            _ => AppError::Io(e),
        })
    }

    pub async fn exists(&self, name: &str) -> bool {
        match self.resolve(name) {
            Ok(path) => fs::try_exists(&path).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Joins `name` onto the root, refusing anything that could step outside
    /// the store directory. Routing never hands us a raw `/`, but
    /// percent-encoded separators survive path-parameter decoding.
    fn resolve(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains('/')
            || name.contains('\\')
            || name.contains('\0')
        {
            return Err(AppError::NotFound(name.to_string()));
        }

        Ok(self.root.join(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (DocumentStore, TempDir) {
        let temp = TempDir::new().unwrap();
        (DocumentStore::new(temp.path()), temp)
    }

    #[tokio::test]
    async fn write_then_read_round_trips() {
        let (store, _temp) = store();

        store.write("about.txt", "about file!").await.unwrap();
        assert_eq!(store.read("about.txt").await.unwrap(), "about file!");

        store.write("about.txt", "replaced").await.unwrap();
        assert_eq!(store.read("about.txt").await.unwrap(), "replaced");
    }

    #[tokio::test]
    async fn read_of_missing_file_is_not_found() {
        let (store, _temp) = store();

        let err = store.read("ghost.txt").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn list_is_sorted_and_skips_directories() {
        let (store, temp) = store();

        store.write("changes.md", "").await.unwrap();
        store.write("about.txt", "").await.unwrap();
        std::fs::create_dir(temp.path().join("subdir")).unwrap();

        let names = store.list().await.unwrap();
        assert_eq!(names, vec!["about.txt".to_string(), "changes.md".to_string()]);
    }

    #[tokio::test]
    async fn list_of_empty_store_is_empty() {
        let (store, _temp) = store();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_removes_the_file_once() {
        let (store, _temp) = store();

        store.write("gone.txt", "bye").await.unwrap();
        store.delete("gone.txt").await.unwrap();
        assert!(!store.exists("gone.txt").await);

        let err = store.delete("gone.txt").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn traversal_names_never_resolve() {
        let (store, _temp) = store();

        assert!(store.read("../outside.txt").await.unwrap_err().is_not_found());
        assert!(store.read("..").await.unwrap_err().is_not_found());
        assert!(store.write("a/b.txt", "x").await.unwrap_err().is_not_found());
        assert!(!store.exists("..\\up.txt").await);
    }
}
