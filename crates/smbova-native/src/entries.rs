// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Directory listings as the script side sees them.
//
// Only directories, files and shares are listed; hidden administrative shares
// (`C$/`, `ADMIN$/`) are skipped. Shares sort first, then directories, then
// files, each group by name.

use std::cmp::Ordering;

use smbova_core::error::Result;
use smbova_core::types::{
    Entry, EntryKind, MediaGroup, display_name, extension_of, now_millis,
};
use tracing::debug;

use crate::share::{Credentials, RemoteEntry, ShareFs};
use crate::smb_path::SmbPath;

/// Convert share metadata into a script-facing entry.
pub fn to_entry(remote: &RemoteEntry) -> Entry {
    let name = remote.path.name();
    Entry {
        name: display_name(name).to_owned(),
        ext: Some(if remote.path.is_directory() {
            String::new()
        } else {
            extension_of(name)
        }),
        kind: remote.kind,
        path: remote.path.to_string(),
        size: remote.size,
        last_modified: remote.modified,
    }
}

/// Entry for an object that was just created or written; timestamped now.
pub fn fresh_entry(path: &SmbPath, kind: EntryKind, size: u64, with_ext: bool) -> Entry {
    Entry {
        name: display_name(path.name()).to_owned(),
        ext: with_ext.then(|| path.extension()),
        kind,
        path: path.to_string(),
        size,
        last_modified: now_millis(),
    }
}

fn is_hidden_share(remote: &RemoteEntry) -> bool {
    remote.path.name().ends_with("$/")
}

/// Share type code descending, then case-insensitive name.
pub fn compare_entries(a: &Entry, b: &Entry) -> Ordering {
    b.kind
        .code()
        .cmp(&a.kind.code())
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}

/// List a directory. `None` when `dir` does not exist or is not a container.
pub fn list_entries(
    fs: &dyn ShareFs,
    dir: &SmbPath,
    creds: Option<&Credentials>,
) -> Result<Option<Vec<Entry>>> {
    match fs.stat(dir, creds)? {
        Some(meta) if meta.kind != EntryKind::File => {}
        _ => {
            debug!(dir = %dir, "not a listable directory");
            return Ok(None);
        }
    }
    let mut entries: Vec<Entry> = fs
        .list(dir, creds)?
        .iter()
        .filter(|e| e.kind.is_listed() && !is_hidden_share(e))
        .map(to_entry)
        .collect();
    entries.sort_by(compare_entries);
    Ok(Some(entries))
}

/// Image files directly inside `dir`, sorted by name.
pub fn list_images(
    fs: &dyn ShareFs,
    dir: &SmbPath,
    creds: Option<&Credentials>,
) -> Result<Vec<SmbPath>> {
    match fs.stat(dir, creds)? {
        Some(meta) if meta.kind != EntryKind::File => {}
        _ => return Ok(Vec::new()),
    }
    let mut images: Vec<SmbPath> = fs
        .list(dir, creds)?
        .into_iter()
        .filter(|e| e.kind == EntryKind::File)
        .map(|e| e.path)
        .filter(|p| MediaGroup::from_name(p.name()) == MediaGroup::Image)
        .collect();
    images.sort_by(|a, b| {
        a.name()
            .to_lowercase()
            .cmp(&b.name().to_lowercase())
            .then_with(|| a.name().cmp(b.name()))
    });
    Ok(images)
}
