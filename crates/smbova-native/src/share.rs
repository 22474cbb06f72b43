// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Share filesystem abstraction.
//
// `ShareFs` is the seam to an SMB client: every operation receives the
// credentials of the current session (or `None` for anonymous access).
// `LocalShare` serves `smb://host/share/path` from `<root>/host/share/path`,
// which covers locally mounted shares and tests.

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use smbova_core::error::{Result, SambaError};
use smbova_core::types::{EntryKind, epoch_millis};

use crate::smb_path::SmbPath;

/// Username/password pair of an authenticated session.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Both parts must be non-empty; anything else means anonymous.
    pub fn from_parts(username: &str, password: &str) -> Option<Self> {
        if username.is_empty() || password.is_empty() {
            None
        } else {
            Some(Self {
                username: username.to_owned(),
                password: password.to_owned(),
            })
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Metadata of one share object.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteEntry {
    pub path: SmbPath,
    pub kind: EntryKind,
    pub size: u64,
    /// Milliseconds since the epoch.
    pub modified: i64,
}

/// Access to SMB shares.
pub trait ShareFs: Send + Sync + 'static {
    /// Metadata for `path`, or `None` when it does not exist.
    fn stat(&self, path: &SmbPath, creds: Option<&Credentials>) -> Result<Option<RemoteEntry>>;

    /// Children of a directory, server or share.
    fn list(&self, dir: &SmbPath, creds: Option<&Credentials>) -> Result<Vec<RemoteEntry>>;

    /// Open a file for reading, returning the reader and the file length.
    fn open_read(
        &self,
        path: &SmbPath,
        creds: Option<&Credentials>,
    ) -> Result<(Box<dyn Read + Send>, u64)>;

    /// Open a file for writing, creating or truncating it.
    fn open_write(&self, path: &SmbPath, creds: Option<&Credentials>)
    -> Result<Box<dyn Write + Send>>;

    /// Create an empty file; fails if it already exists.
    fn create_file(&self, path: &SmbPath, creds: Option<&Credentials>) -> Result<()>;

    fn mkdir(&self, path: &SmbPath, creds: Option<&Credentials>) -> Result<()>;

    /// Delete a file, or a directory with everything below it.
    fn delete(&self, path: &SmbPath, creds: Option<&Credentials>) -> Result<()>;
}

/// `ShareFs` backed by a local directory tree.
#[derive(Debug, Clone)]
pub struct LocalShare {
    root: PathBuf,
    accounts: HashMap<String, String>,
}

impl LocalShare {
    /// Serve `root` to anyone, anonymous sessions included.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            accounts: HashMap::new(),
        }
    }

    /// Require credentials matching one of the registered accounts.
    pub fn with_account(mut self, username: &str, password: &str) -> Self {
        self.accounts
            .insert(username.to_owned(), password.to_owned());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn check_access(&self, path: &SmbPath, creds: Option<&Credentials>) -> Result<()> {
        if self.accounts.is_empty() {
            return Ok(());
        }
        match creds {
            Some(c) if self.accounts.get(&c.username) == Some(&c.password) => Ok(()),
            Some(c) => {
                debug!(user = %c.username, path = %path, "rejected credentials");
                Err(SambaError::AccessDenied(path.to_string()))
            }
            None => Err(SambaError::AccessDenied(path.to_string())),
        }
    }

    fn local_path(&self, path: &SmbPath) -> PathBuf {
        let mut local = self.root.clone();
        if let Some(host) = path.host() {
            local.push(host);
        }
        for segment in path.segments() {
            local.push(segment);
        }
        local
    }

    /// Kind of a directory at the given depth below the root.
    fn directory_kind(path: &SmbPath) -> EntryKind {
        match (path.host(), path.segments().len()) {
            (None, _) => EntryKind::Workgroup,
            (Some(_), 0) => EntryKind::Server,
            (Some(_), 1) => EntryKind::Share,
            _ => EntryKind::Directory,
        }
    }

    fn entry_for(path: SmbPath, meta: &fs::Metadata) -> RemoteEntry {
        let kind = if meta.is_dir() {
            Self::directory_kind(&path)
        } else {
            EntryKind::File
        };
        RemoteEntry {
            path,
            kind,
            size: if meta.is_dir() { 0 } else { meta.len() },
            modified: meta.modified().map(epoch_millis).unwrap_or_default(),
        }
    }

    fn not_found(path: &SmbPath, e: std::io::Error) -> SambaError {
        if e.kind() == ErrorKind::NotFound {
            SambaError::NotFound(path.to_string())
        } else {
            SambaError::Io(e)
        }
    }
}

impl ShareFs for LocalShare {
    fn stat(&self, path: &SmbPath, creds: Option<&Credentials>) -> Result<Option<RemoteEntry>> {
        self.check_access(path, creds)?;
        match fs::metadata(self.local_path(path)) {
            Ok(meta) => Ok(Some(Self::entry_for(path.clone(), &meta))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self, dir: &SmbPath, creds: Option<&Credentials>) -> Result<Vec<RemoteEntry>> {
        self.check_access(dir, creds)?;
        let local = self.local_path(dir);
        let mut entries = Vec::new();
        for item in fs::read_dir(&local).map_err(|e| Self::not_found(dir, e))? {
            let item = item?;
            let meta = item.metadata()?;
            let mut name = item.file_name().to_string_lossy().into_owned();
            if meta.is_dir() {
                name.push('/');
            }
            entries.push(Self::entry_for(dir.child(&name), &meta));
        }
        debug!(dir = %dir, count = entries.len(), "listed local share directory");
        Ok(entries)
    }

    fn open_read(
        &self,
        path: &SmbPath,
        creds: Option<&Credentials>,
    ) -> Result<(Box<dyn Read + Send>, u64)> {
        self.check_access(path, creds)?;
        let file = fs::File::open(self.local_path(path)).map_err(|e| Self::not_found(path, e))?;
        let len = file.metadata()?.len();
        Ok((Box::new(file), len))
    }

    fn open_write(
        &self,
        path: &SmbPath,
        creds: Option<&Credentials>,
    ) -> Result<Box<dyn Write + Send>> {
        self.check_access(path, creds)?;
        let file = fs::File::create(self.local_path(path)).map_err(|e| Self::not_found(path, e))?;
        Ok(Box::new(file))
    }

    fn create_file(&self, path: &SmbPath, creds: Option<&Credentials>) -> Result<()> {
        self.check_access(path, creds)?;
        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.local_path(path))
            .map_err(|e| Self::not_found(path, e))?;
        Ok(())
    }

    fn mkdir(&self, path: &SmbPath, creds: Option<&Credentials>) -> Result<()> {
        self.check_access(path, creds)?;
        fs::create_dir(self.local_path(path)).map_err(|e| Self::not_found(path, e))
    }

    fn delete(&self, path: &SmbPath, creds: Option<&Credentials>) -> Result<()> {
        self.check_access(path, creds)?;
        let local = self.local_path(path);
        let meta = fs::metadata(&local).map_err(|e| Self::not_found(path, e))?;
        if meta.is_dir() {
            fs::remove_dir_all(&local)?;
        } else {
            fs::remove_file(&local)?;
        }
        Ok(())
    }
}
