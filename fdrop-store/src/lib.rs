// -*- coding: utf-8 -*-
//
// Simple file drop
//
// Copyright (C) 2011-2024 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![forbid(unsafe_code)]

mod listing;

pub use crate::listing::{format_size, list_files, FileRecord, Icon};

use anyhow::{self as ah, Context as _};
use fdrop_ident::SafeName;
use std::{
    fmt,
    fs::{self, DirBuilder, File, OpenOptions},
    io::{self, Write as _},
    os::unix::fs::DirBuilderExt as _,
    path::{Path, PathBuf},
};

/// Permissions of a newly created upload directory.
const DIR_MODE: u32 = 0o755;

#[derive(Debug)]
pub enum StoreError {
    /// The entry does not exist (or vanished).
    NotFound,
    /// The entry exists, but is not writable.
    NotWritable,
    /// All collision candidates are taken.
    Exhausted(u32),
    /// Creating or writing a new file failed.
    Write(ah::Error),
    /// Removing an existing file failed.
    Unlink(ah::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "File not found"),
            Self::NotWritable => write!(f, "File not writable"),
            Self::Exhausted(n) => write!(f, "No free file name after {n} attempts"),
            Self::Write(e) => write!(f, "Write failed: {e:#}"),
            Self::Unlink(e) => write!(f, "Unlink failed: {e:#}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Create the directory [path] and its parents, if missing.
pub fn ensure_directory(path: &Path) -> ah::Result<()> {
    DirBuilder::new()
        .recursive(true)
        .mode(DIR_MODE)
        .create(path)
        .with_context(|| format!("Create upload directory {path:?}"))
}

fn write_payload(file: &mut File, data: &[u8]) -> ah::Result<u64> {
    file.write_all(data).context("Write upload file")?;
    file.flush().context("Flush upload file")?;
    Ok(file.metadata().context("Get upload file metadata")?.len())
}

/// A file that has been written by [UploadDir::store].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stored {
    pub name: SafeName,
    pub size: u64,
}

/// The flat directory holding all uploads.
#[derive(Clone, Debug)]
pub struct UploadDir {
    path: PathBuf,
}

impl UploadDir {
    /// Open the upload directory at [path].
    /// It is created, if it does not exist yet.
    pub fn open(path: &Path) -> ah::Result<Self> {
        ensure_directory(path)?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Store [data] as a new file.
    ///
    /// The first free name out of the collision candidates of [name]
    /// is claimed with an exclusive create. A name that is taken in
    /// the meantime by a concurrent writer is skipped.
    pub fn store(
        &self,
        name: &SafeName,
        data: &[u8],
        max_attempts: u32,
    ) -> Result<Stored, StoreError> {
        self.store_with(name, max_attempts, |file| write_payload(file, data))
    }

    fn store_with(
        &self,
        name: &SafeName,
        max_attempts: u32,
        mut write: impl FnMut(&mut File) -> ah::Result<u64>,
    ) -> Result<Stored, StoreError> {
        for candidate in name.candidates(max_attempts) {
            let path = candidate.to_fs_path(&self.path);
            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => file,
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(StoreError::Write(
                        ah::Error::new(e).context(format!("Create {path:?}")),
                    ));
                }
            };
            match write(&mut file) {
                Ok(size) => {
                    return Ok(Stored {
                        name: candidate,
                        size,
                    });
                }
                Err(e) => {
                    drop(file);
                    // Do not leave a truncated upload behind.
                    let _ = fs::remove_file(&path);
                    return Err(StoreError::Write(e));
                }
            }
        }
        Err(StoreError::Exhausted(max_attempts))
    }

    /// Remove the file [name].
    pub fn remove(&self, name: &SafeName) -> Result<(), StoreError> {
        let path = name.to_fs_path(&self.path);

        let meta = match fs::symlink_metadata(&path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(StoreError::NotFound),
            Err(e) => {
                return Err(StoreError::Unlink(
                    ah::Error::new(e).context(format!("Stat {path:?}")),
                ));
            }
        };
        let ftype = meta.file_type();
        if !ftype.is_file() && !ftype.is_symlink() {
            return Err(StoreError::NotFound); // Not an upload.
        }
        if meta.permissions().readonly() {
            return Err(StoreError::NotWritable);
        }

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            // Removed by someone else since the check.
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StoreError::NotFound),
            Err(e) => Err(StoreError::Unlink(
                ah::Error::new(e).context(format!("Unlink {path:?}")),
            )),
        }
    }

    /// Get all regular files in the upload directory.
    pub fn list(&self) -> Vec<FileRecord> {
        list_files(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fdrop_ident::UntrustedName;
    use std::{collections::BTreeSet, os::unix::fs::PermissionsExt as _};
    use tempfile::TempDir;

    fn upload_name(s: &str) -> SafeName {
        s.parse::<UntrustedName>().unwrap().into_upload_name(0)
    }

    fn existing_name(s: &str) -> SafeName {
        s.parse::<UntrustedName>()
            .unwrap()
            .into_existing_name()
            .unwrap()
    }

    fn dir_entries(dir: &Path) -> BTreeSet<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect()
    }

    #[test]
    fn test_open_creates_dir() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a").join("uploads");
        assert!(!path.exists());
        let dir = UploadDir::open(&path).unwrap();
        assert!(path.is_dir());
        assert_eq!(dir.path(), path);

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        // The umask may only remove bits.
        assert_eq!(mode & !DIR_MODE, 0);

        // Idempotent.
        UploadDir::open(&path).unwrap();
    }

    #[test]
    fn test_store_collisions() {
        let tmp = TempDir::new().unwrap();
        let dir = UploadDir::open(tmp.path()).unwrap();
        let name = upload_name("report.pdf");

        let a = dir.store(&name, b"0123456789", 10).unwrap();
        let b = dir.store(&name, b"abc", 10).unwrap();
        let c = dir.store(&name, b"", 10).unwrap();
        assert_eq!(a.name.as_str(), "report.pdf");
        assert_eq!(a.size, 10);
        assert_eq!(b.name.as_str(), "report(1).pdf");
        assert_eq!(b.size, 3);
        assert_eq!(c.name.as_str(), "report(2).pdf");
        assert_eq!(c.size, 0);

        // The first upload is untouched.
        assert_eq!(fs::read(tmp.path().join("report.pdf")).unwrap(), b"0123456789");
    }

    #[test]
    fn test_store_binary() {
        let tmp = TempDir::new().unwrap();
        let dir = UploadDir::open(tmp.path()).unwrap();
        let data: Vec<u8> = (0..=255).collect();
        let s = dir.store(&upload_name("blob.bin"), &data, 1).unwrap();
        assert_eq!(s.size, 256);
        assert_eq!(fs::read(tmp.path().join("blob.bin")).unwrap(), data);
    }

    #[test]
    fn test_store_exhausted() {
        let tmp = TempDir::new().unwrap();
        let dir = UploadDir::open(tmp.path()).unwrap();
        let name = upload_name("x.txt");
        dir.store(&name, b"1", 2).unwrap();
        dir.store(&name, b"2", 2).unwrap();
        assert!(matches!(
            dir.store(&name, b"3", 2),
            Err(StoreError::Exhausted(2))
        ));
        assert_eq!(dir_entries(tmp.path()).len(), 2);
    }

    #[test]
    fn test_store_write_failure() {
        let tmp = TempDir::new().unwrap();
        let dir = UploadDir::open(tmp.path()).unwrap();
        fs::write(tmp.path().join("report.pdf"), b"old").unwrap();

        let res = dir.store_with(&upload_name("report.pdf"), 5, |file| {
            file.write_all(b"partial")?;
            Err(ah::format_err!("No space left on device"))
        });
        match res {
            Err(StoreError::Write(e)) => assert!(format!("{e:#}").contains("No space left")),
            other => panic!("Unexpected store result: {other:?}"),
        }
        // The partial report(1).pdf is gone, the existing file is untouched.
        assert_eq!(
            dir_entries(tmp.path()),
            BTreeSet::from(["report.pdf".to_string()])
        );
        assert_eq!(fs::read(tmp.path().join("report.pdf")).unwrap(), b"old");
    }

    #[test]
    fn test_store_skips_directories() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("data")).unwrap();
        let dir = UploadDir::open(tmp.path()).unwrap();
        let s = dir.store(&upload_name("data"), b"x", 5).unwrap();
        assert_eq!(s.name.as_str(), "data(1)");
    }

    #[test]
    fn test_remove() {
        let tmp = TempDir::new().unwrap();
        let dir = UploadDir::open(tmp.path()).unwrap();
        fs::write(tmp.path().join("report.pdf"), b"x").unwrap();

        dir.remove(&existing_name("report.pdf")).unwrap();
        assert!(dir_entries(tmp.path()).is_empty());
    }

    #[test]
    fn test_remove_not_found() {
        let tmp = TempDir::new().unwrap();
        let dir = UploadDir::open(tmp.path()).unwrap();
        fs::write(tmp.path().join("keep.txt"), b"x").unwrap();
        fs::create_dir(tmp.path().join("subdir")).unwrap();
        let before = dir_entries(tmp.path());

        assert!(matches!(
            dir.remove(&existing_name("missing.txt")),
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            dir.remove(&existing_name("subdir")),
            Err(StoreError::NotFound)
        ));
        assert_eq!(dir_entries(tmp.path()), before);
    }

    #[test]
    fn test_remove_traversal() {
        let tmp = TempDir::new().unwrap();
        let outside = tmp.path().join("secret.txt");
        fs::write(&outside, b"x").unwrap();
        let dir = UploadDir::open(&tmp.path().join("uploads")).unwrap();

        assert!(matches!(
            dir.remove(&existing_name("../secret.txt")),
            Err(StoreError::NotFound)
        ));
        assert!(outside.exists());
    }

    #[test]
    fn test_remove_readonly() {
        let tmp = TempDir::new().unwrap();
        let dir = UploadDir::open(tmp.path()).unwrap();
        let path = tmp.path().join("locked.txt");
        fs::write(&path, b"x").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o444)).unwrap();

        assert!(matches!(
            dir.remove(&existing_name("locked.txt")),
            Err(StoreError::NotWritable)
        ));
        assert!(path.exists());
    }
}

// vim: ts=4 sw=4 expandtab
