//! Card storage.
//!
//! Paths handed to a `Storage` are card-absolute (`/notes/todo.txt`). The
//! filesystem implementation mounts a host directory as the card root and
//! refuses anything that would climb out of it.

use std::fs;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("{0}: path leaves the card root")]
    OutsideRoot(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EntryKind {
    File,
    Dir,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
}

impl DirEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

pub trait Storage {
    fn read_lines(&self, path: &str) -> Result<Vec<String>, StorageError>;
    fn write_lines(&mut self, path: &str, lines: &[String]) -> Result<(), StorageError>;
    fn append_lines(&mut self, path: &str, lines: &[String]) -> Result<(), StorageError>;
    /// Entries of a directory sorted by name.
    fn list_dir(&self, path: &str) -> Result<Vec<DirEntry>, StorageError>;
    fn create_file(&mut self, path: &str) -> Result<(), StorageError>;
    fn make_dir(&mut self, path: &str) -> Result<(), StorageError>;
    fn rename(&mut self, from: &str, to: &str) -> Result<(), StorageError>;
    fn remove_file(&mut self, path: &str) -> Result<(), StorageError>;
    fn remove_dir(&mut self, path: &str) -> Result<(), StorageError>;
}

/// Join a card directory and an entry name.
pub fn join(dir: &str, name: &str) -> String {
    let dir = dir.trim_end_matches('/');
    format!("{dir}/{name}")
}

/// The card directory containing `path`.
pub fn parent(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(i) => trimmed[..i].to_string(),
    }
}

/// Host directory mounted as the card root.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let mut out = self.root.clone();
        for part in Path::new(path.trim_start_matches('/')).components() {
            match part {
                Component::Normal(p) => out.push(p),
                Component::CurDir => {}
                _ => return Err(StorageError::OutsideRoot(path.to_string())),
            }
        }
        Ok(out)
    }

    fn io<T>(path: &str, result: io::Result<T>) -> Result<T, StorageError> {
        result.map_err(|source| {
            warn!(path, error = %source, "storage operation failed");
            StorageError::Io {
                path: path.to_string(),
                source,
            }
        })
    }
}

impl Storage for FsStorage {
    fn read_lines(&self, path: &str) -> Result<Vec<String>, StorageError> {
        let host = self.resolve(path)?;
        let file = Self::io(path, fs::File::open(host))?;
        Self::io(path, BufReader::new(file).lines().collect())
    }

    fn write_lines(&mut self, path: &str, lines: &[String]) -> Result<(), StorageError> {
        let host = self.resolve(path)?;
        let mut file = Self::io(path, fs::File::create(host))?;
        for line in lines {
            Self::io(path, writeln!(file, "{line}"))?;
        }
        Ok(())
    }

    fn append_lines(&mut self, path: &str, lines: &[String]) -> Result<(), StorageError> {
        let host = self.resolve(path)?;
        let mut file = Self::io(
            path,
            fs::OpenOptions::new().create(true).append(true).open(host),
        )?;
        for line in lines {
            Self::io(path, writeln!(file, "{line}"))?;
        }
        Ok(())
    }

    fn list_dir(&self, path: &str) -> Result<Vec<DirEntry>, StorageError> {
        let host = self.resolve(path)?;
        let mut entries = Vec::new();
        for entry in Self::io(path, fs::read_dir(host))? {
            let entry = Self::io(path, entry)?;
            let kind = if Self::io(path, entry.file_type())?.is_dir() {
                EntryKind::Dir
            } else {
                EntryKind::File
            };
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                kind,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn create_file(&mut self, path: &str) -> Result<(), StorageError> {
        let host = self.resolve(path)?;
        Self::io(
            path,
            fs::OpenOptions::new().create(true).append(true).open(host),
        )
        .map(|_| ())
    }

    fn make_dir(&mut self, path: &str) -> Result<(), StorageError> {
        let host = self.resolve(path)?;
        Self::io(path, fs::create_dir(host))
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<(), StorageError> {
        let (src, dst) = (self.resolve(from)?, self.resolve(to)?);
        Self::io(from, fs::rename(src, dst))
    }

    fn remove_file(&mut self, path: &str) -> Result<(), StorageError> {
        let host = self.resolve(path)?;
        Self::io(path, fs::remove_file(host))
    }

    fn remove_dir(&mut self, path: &str) -> Result<(), StorageError> {
        let host = self.resolve(path)?;
        Self::io(path, fs::remove_dir(host))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_paths_join_and_split() {
        assert_eq!(join("/", "a"), "/a");
        assert_eq!(join("/a", "b"), "/a/b");
        assert_eq!(parent("/a/b"), "/a");
        assert_eq!(parent("/a"), "/");
        assert_eq!(parent("/"), "/");
    }

    #[test]
    fn roundtrips_lines_and_lists_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let mut fs = FsStorage::new(dir.path());
        fs.make_dir("/zdir").unwrap();
        fs.write_lines("/b.txt", &["one".into(), "two".into()]).unwrap();
        fs.append_lines("/b.txt", &["three".into()]).unwrap();
        fs.create_file("/a.txt").unwrap();
        assert_eq!(fs.read_lines("/b.txt").unwrap(), vec!["one", "two", "three"]);
        let names: Vec<_> = fs
            .list_dir("/")
            .unwrap()
            .into_iter()
            .map(|e| (e.name, e.kind))
            .collect();
        assert_eq!(
            names,
            vec![
                ("a.txt".to_string(), EntryKind::File),
                ("b.txt".to_string(), EntryKind::File),
                ("zdir".to_string(), EntryKind::Dir),
            ]
        );
    }

    #[test]
    fn refuses_paths_outside_root() {
        let dir = tempfile::tempdir().unwrap();
        let fs = FsStorage::new(dir.path());
        assert!(matches!(
            fs.read_lines("/../etc/passwd"),
            Err(StorageError::OutsideRoot(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let fs = FsStorage::new(dir.path());
        let err = fs.read_lines("/nope").unwrap_err();
        assert!(err.to_string().starts_with("/nope:"));
    }
}
