// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform viewer abstraction.
//
// Opening images, media and arbitrary files, and moving the app to the
// background, are platform UI actions. The host prepares everything the
// viewer needs (a gallery positioned on the requested image, a seekable media
// source with optional subtitles) and hands it to a `Launcher`.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use smbova_core::error::{Result, SambaError};

use crate::share::{Credentials, ShareFs};
use crate::smb_path::SmbPath;

/// Platform UI actions requested by the SambaPlugin.
pub trait Launcher: Send + Sync + 'static {
    /// Move the host app to the background (home screen).
    fn send_to_background(&self) -> Result<()>;

    /// Open `url` in the platform viewer registered for `mime_type`.
    fn view_file(&self, url: &str, mime_type: Option<&str>) -> Result<()>;

    fn show_gallery(&self, gallery: Gallery) -> Result<()>;

    fn play_media(&self, media: MediaSource) -> Result<()>;

    /// A download finished; platforms with a media index pick it up here.
    fn media_scanned(&self, _local_path: &Path, _mime_type: Option<&str>) -> Result<()> {
        Ok(())
    }
}

/// Images of one share directory, positioned on the one the user opened.
#[derive(Clone)]
pub struct Gallery {
    share: Arc<dyn ShareFs>,
    creds: Option<Credentials>,
    images: Vec<SmbPath>,
    current: usize,
}

impl Gallery {
    /// Position on `opened`, or on the first image when it is not part of
    /// the list.
    pub fn new(
        share: Arc<dyn ShareFs>,
        creds: Option<Credentials>,
        images: Vec<SmbPath>,
        opened: &str,
    ) -> Self {
        let current = images
            .iter()
            .position(|p| p.as_str() == opened)
            .unwrap_or(0);
        Self {
            share,
            creds,
            images,
            current,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Cache key (the share URL) of image `index`.
    pub fn key(&self, index: usize) -> Option<&str> {
        self.images.get(index).map(SmbPath::as_str)
    }

    /// Fetch the bytes of image `index`.
    pub fn load(&self, index: usize) -> Result<Vec<u8>> {
        let path = self
            .images
            .get(index)
            .ok_or_else(|| SambaError::NotFound(format!("gallery image {index}")))?;
        let (mut reader, _) = self.share.open_read(path, self.creds.as_ref())?;
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

impl std::fmt::Debug for Gallery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gallery")
            .field("images", &self.images)
            .field("current", &self.current)
            .finish()
    }
}

/// A streamable audio/video file on a share.
#[derive(Clone)]
pub struct MediaSource {
    share: Arc<dyn ShareFs>,
    creds: Option<Credentials>,
    path: SmbPath,
    length: u64,
    subtitle: Option<PathBuf>,
}

impl MediaSource {
    pub fn new(
        share: Arc<dyn ShareFs>,
        creds: Option<Credentials>,
        path: SmbPath,
        length: u64,
        subtitle: Option<PathBuf>,
    ) -> Self {
        Self {
            share,
            creds,
            path,
            length,
            subtitle,
        }
    }

    pub fn path(&self) -> &SmbPath {
        &self.path
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    /// Local copy of the matching `.srt` file, if one was found.
    pub fn subtitle(&self) -> Option<&Path> {
        self.subtitle.as_deref()
    }

    /// Open a fresh stream from the start of the file.
    pub fn open(&self) -> Result<Box<dyn Read + Send>> {
        let (reader, _) = self.share.open_read(&self.path, self.creds.as_ref())?;
        Ok(reader)
    }
}

impl std::fmt::Debug for MediaSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaSource")
            .field("path", &self.path)
            .field("length", &self.length)
            .field("subtitle", &self.subtitle)
            .finish()
    }
}

/// Launcher for hosts without a UI (desktop daemon, CI).
///
/// Backgrounding and media indexing are no-ops; viewers are unavailable.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessLauncher;

impl Launcher for HeadlessLauncher {
    fn send_to_background(&self) -> Result<()> {
        tracing::debug!("send_to_background on headless launcher");
        Ok(())
    }

    fn view_file(&self, url: &str, _mime_type: Option<&str>) -> Result<()> {
        tracing::warn!(url, "Launcher::view_file called on headless launcher");
        Err(SambaError::PlatformUnavailable)
    }

    fn show_gallery(&self, gallery: Gallery) -> Result<()> {
        tracing::warn!(images = gallery.len(), "Launcher::show_gallery called on headless launcher");
        Err(SambaError::PlatformUnavailable)
    }

    fn play_media(&self, media: MediaSource) -> Result<()> {
        tracing::warn!(path = %media.path(), "Launcher::play_media called on headless launcher");
        Err(SambaError::PlatformUnavailable)
    }
}
