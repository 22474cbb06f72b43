// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Streamed uploads and downloads with progress reporting.
//
// Data moves in `buffer_size` chunks; after each chunk the completed fraction
// is published so the script side can draw a progress bar.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use url::Url;

use smbova_core::error::{Result, SambaError};
use smbova_core::types::{Entry, EntryKind, MediaGroup, Progress};
use smbova_core::PluginConfig;

use crate::entries::fresh_entry;
use crate::share::{Credentials, ShareFs};
use crate::smb_path::SmbPath;

/// Copy `reader` into `writer`, reporting the completed fraction of `total`
/// after every chunk. Returns the number of bytes copied.
pub fn copy_with_progress(
    reader: &mut dyn Read,
    writer: &mut dyn Write,
    total: u64,
    buffer_size: usize,
    mut on_progress: impl FnMut(f32),
) -> Result<u64> {
    let mut buf = vec![0u8; buffer_size.max(1)];
    let mut copied = 0u64;
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        writer.write_all(&buf[..n])?;
        copied += n as u64;
        let fraction = if total == 0 {
            1.0
        } else {
            (copied as f64 / total as f64).min(1.0) as f32
        };
        on_progress(fraction);
    }
    writer.flush()?;
    Ok(copied)
}

/// Resolve a script-side local path: plain paths or `file://` URLs.
pub fn resolve_local_path(local: &str) -> Result<PathBuf> {
    if local.starts_with("file:") {
        let url = Url::parse(local).map_err(|e| SambaError::MalformedUrl(format!("{local}: {e}")))?;
        url.to_file_path()
            .map_err(|_| SambaError::MalformedUrl(local.to_owned()))
    } else {
        Ok(PathBuf::from(local))
    }
}

/// Upload a local file into the share directory `smb_dir`, keeping its file
/// name. Returns the entry of the uploaded file.
pub fn upload(
    fs_share: &dyn ShareFs,
    creds: Option<&Credentials>,
    local_path: &str,
    smb_dir: &str,
    buffer_size: usize,
    mut on_progress: impl FnMut(Progress),
) -> Result<Entry> {
    let local = resolve_local_path(local_path)?;
    let file_name = local
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| SambaError::NotFound(local_path.to_owned()))?;
    let target = SmbPath::parse(&format!("{smb_dir}{file_name}"))?;

    let mut source = fs::File::open(&local).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => SambaError::NotFound(local.display().to_string()),
        _ => SambaError::Io(e),
    })?;
    let total = source.metadata()?.len();
    info!(from = %local.display(), to = %target, total, "uploading");

    let mut sink = fs_share.open_write(&target, creds)?;
    let path = target.to_string();
    copy_with_progress(&mut source, &mut sink, total, buffer_size, |fraction| {
        on_progress(Progress {
            path: path.clone(),
            fraction,
        })
    })?;
    drop(sink);

    let size = fs_share
        .stat(&target, creds)?
        .map(|meta| meta.size)
        .unwrap_or(total);
    Ok(fresh_entry(&target, EntryKind::File, size, true))
}

/// Local destination of a download: the media-group directory plus the last
/// path segment of the share URL.
pub fn download_target(config: &PluginConfig, source: &SmbPath) -> PathBuf {
    let name = source.name().trim_end_matches('/');
    let group = MediaGroup::from_extension(&source.extension());
    config.download_dir(group).join(name)
}

/// Download a share file; returns the local path written.
pub fn download(
    fs_share: &dyn ShareFs,
    creds: Option<&Credentials>,
    config: &PluginConfig,
    smb_path: &str,
    mut on_progress: impl FnMut(Progress),
) -> Result<PathBuf> {
    let source = SmbPath::parse(smb_path)?;
    let local = download_target(config, &source);
    if let Some(parent) = local.parent() {
        fs::create_dir_all(parent)?;
    }

    let (mut reader, total) = fs_share.open_read(&source, creds)?;
    info!(from = %source, to = %local.display(), total, "downloading");
    let mut sink = fs::File::create(&local)?;
    let copied = copy_with_progress(
        &mut reader,
        &mut sink,
        total,
        config.buffer_size,
        |fraction| {
            on_progress(Progress {
                path: smb_path.to_owned(),
                fraction,
            })
        },
    )?;
    debug!(copied, "download complete");
    Ok(local)
}

/// MIME type guessed from a path's extension.
pub fn mime_type(path: impl AsRef<Path>) -> Option<String> {
    mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::share::LocalShare;

    #[test]
    fn progress_reaches_one() {
        let data = vec![7u8; 10];
        let mut out = Vec::new();
        let mut seen = Vec::new();
        let copied =
            copy_with_progress(&mut data.as_slice(), &mut out, 10, 4, |f| seen.push(f))
                .expect("copy");
        assert_eq!(copied, 10);
        assert_eq!(out, data);
        assert_eq!(seen, vec![0.4, 0.8, 1.0]);
    }

    #[test]
    fn empty_source_reports_nothing() {
        let mut seen = Vec::new();
        copy_with_progress(&mut (&[] as &[u8]), &mut Vec::new(), 0, 8, |f| seen.push(f))
            .expect("copy");
        assert!(seen.is_empty());
    }

    #[test]
    fn file_urls_resolve_to_paths() {
        let path = resolve_local_path("file:///tmp/My%20Photo.jpg").expect("resolve");
        assert_eq!(path, PathBuf::from("/tmp/My Photo.jpg"));
        assert_eq!(
            resolve_local_path("/sdcard/a.txt").expect("resolve"),
            PathBuf::from("/sdcard/a.txt")
        );
    }

    #[test]
    fn upload_keeps_local_file_name() {
        let share_root = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(share_root.path().join("nas/up")).expect("mkdir");
        let local_dir = tempfile::tempdir().expect("tempdir");
        let local = local_dir.path().join("Photo.JPG");
        std::fs::write(&local, vec![1u8; 20_000]).expect("write");

        let share = LocalShare::new(share_root.path());
        let mut progress = Vec::new();
        let entry = upload(
            &share,
            None,
            local.to_str().expect("utf-8 path"),
            "smb://nas/up/",
            8192,
            |p| progress.push(p),
        )
        .expect("upload");

        assert_eq!(entry.path, "smb://nas/up/Photo.JPG");
        assert_eq!(entry.ext.as_deref(), Some("jpg"));
        assert_eq!(entry.size, 20_000);
        assert_eq!(progress.len(), 3);
        assert_eq!(progress.last().map(|p| p.fraction), Some(1.0));
        assert!(share_root.path().join("nas/up/Photo.JPG").exists());
    }

    #[test]
    fn download_lands_in_media_group_directory() {
        let share_root = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(share_root.path().join("nas/music")).expect("mkdir");
        std::fs::write(share_root.path().join("nas/music/song.mp3"), b"id3").expect("write");
        let local = tempfile::tempdir().expect("tempdir");
        let config = PluginConfig {
            music_dir: local.path().join("Music"),
            downloads_dir: local.path().join("Download"),
            ..Default::default()
        };

        let share = LocalShare::new(share_root.path());
        let path = download(&share, None, &config, "smb://nas/music/song.mp3", |_| {})
            .expect("download");
        assert_eq!(path, local.path().join("Music").join("song.mp3"));
        assert_eq!(std::fs::read(&path).expect("read"), b"id3");
    }

    #[test]
    fn missing_download_is_not_found() {
        let share_root = tempfile::tempdir().expect("tempdir");
        let local = tempfile::tempdir().expect("tempdir");
        let config = PluginConfig {
            downloads_dir: local.path().to_path_buf(),
            ..Default::default()
        };
        let err = download(
            &LocalShare::new(share_root.path()),
            None,
            &config,
            "smb://nas/none.bin",
            |_| {},
        )
        .unwrap_err();
        assert!(matches!(err, SambaError::NotFound(_)));
    }

    #[test]
    fn mime_types_follow_extension() {
        assert_eq!(mime_type("smb://nas/a.pdf").as_deref(), Some("application/pdf"));
        assert_eq!(mime_type("smb://nas/a.JPG").as_deref(), Some("image/jpeg"));
        assert_eq!(mime_type("smb://nas/noext"), None);
    }
}
