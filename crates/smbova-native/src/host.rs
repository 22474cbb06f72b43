// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Native SambaPlugin host.
//
// `SambaHost` is the receiving end of the bridge. Every request runs on the
// tokio blocking pool, so `exec` returns immediately and concurrent calls
// finish in whatever order their I/O completes. The session credentials set
// by `auth` are shared by all later calls.

use std::io::Read;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tracing::{debug, info, info_span, warn};

use smbova_bridge::{Completion, Request, Transport};
use smbova_core::PluginConfig;
use smbova_core::error::{Result, SambaError};
use smbova_core::types::{CallId, EntryKind, Payload, Progress};

use crate::entries::{fresh_entry, list_entries, list_images};
use crate::launcher::{Gallery, Launcher, MediaSource};
use crate::share::{Credentials, ShareFs};
use crate::smb_path::SmbPath;
use crate::{transfer, wol};

/// Progress events buffered per subscriber before the oldest are dropped.
const PROGRESS_CAPACITY: usize = 256;

/// File name of the subtitle copy handed to the media player.
const SUBTITLE_FILE: &str = "temp.srt";

/// Executes SambaPlugin requests against a share filesystem.
#[derive(Clone)]
pub struct SambaHost {
    inner: Arc<HostInner>,
    runtime: Handle,
}

struct HostInner {
    share: Arc<dyn ShareFs>,
    launcher: Arc<dyn Launcher>,
    config: PluginConfig,
    credentials: RwLock<Option<Credentials>>,
    progress: broadcast::Sender<Progress>,
}

impl SambaHost {
    pub fn new(
        share: Arc<dyn ShareFs>,
        launcher: Arc<dyn Launcher>,
        config: PluginConfig,
        runtime: Handle,
    ) -> Self {
        let (progress, _) = broadcast::channel(PROGRESS_CAPACITY);
        Self {
            inner: Arc::new(HostInner {
                share,
                launcher,
                config,
                credentials: RwLock::new(None),
                progress,
            }),
            runtime,
        }
    }

    pub fn config(&self) -> &PluginConfig {
        &self.inner.config
    }

    /// Transfer progress of uploads and downloads.
    pub fn subscribe_progress(&self) -> broadcast::Receiver<Progress> {
        self.inner.progress.subscribe()
    }

    /// Whether a non-anonymous session is active.
    pub fn is_authenticated(&self) -> bool {
        self.inner.credentials().is_some()
    }

    /// Run one request to completion.
    pub async fn call(&self, request: Request) -> Result<Payload> {
        let inner = Arc::clone(&self.inner);
        let span = info_span!("call", id = %CallId::new(), action = request.method());
        self.runtime
            .spawn_blocking(move || {
                let _entered = span.enter();
                inner.dispatch(request)
            })
            .await
            .map_err(|e| SambaError::Bridge(format!("native task failed: {e}")))?
    }
}

impl std::fmt::Debug for SambaHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SambaHost")
            .field("config", &self.inner.config)
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl Transport for SambaHost {
    fn exec(&self, request: Request, completion: Completion) {
        let inner = Arc::clone(&self.inner);
        let span = info_span!("call", id = %CallId::new(), action = request.method());
        self.runtime.spawn_blocking(move || {
            let _entered = span.enter();
            let result = inner.dispatch(request);
            if let Err(e) = &result {
                warn!(error = %e, "call failed");
            }
            completion.complete(result);
        });
    }
}

impl HostInner {
    fn credentials(&self) -> Option<Credentials> {
        self.credentials
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn publish(&self, progress: Progress) {
        // No subscribers is fine.
        let _ = self.progress.send(progress);
    }

    fn dispatch(&self, request: Request) -> Result<Payload> {
        let creds = self.credentials();
        let creds = creds.as_ref();
        match request {
            Request::RunBackground => {
                self.launcher.send_to_background()?;
                Ok(Payload::Empty)
            }
            Request::Auth { username, password } => {
                let session = Credentials::from_parts(&username, &password);
                info!(user = %username, anonymous = session.is_none(), "session credentials set");
                *self
                    .credentials
                    .write()
                    .unwrap_or_else(PoisonError::into_inner) = session;
                Ok(Payload::Empty)
            }
            Request::ListEntries { path } => {
                let dir = SmbPath::parse(&path)?;
                let listing = match list_entries(self.share.as_ref(), &dir, creds)? {
                    Some(entries) => serde_json::to_value(entries)?,
                    None => Value::Null,
                };
                Ok(Payload::Json(listing))
            }
            Request::ReadAsText { path } => {
                let bytes = self.read_all(&SmbPath::parse(&path)?, creds)?;
                Ok(String::from_utf8_lossy(&bytes).into_owned().into())
            }
            Request::ReadAsByteArray { path } => {
                let bytes = self.read_all(&SmbPath::parse(&path)?, creds)?;
                Ok(Payload::Bytes(bytes))
            }
            Request::OpenImage { path } => {
                let image = SmbPath::parse(&path)?;
                let images = list_images(self.share.as_ref(), &image.parent(), creds)?;
                let gallery = Gallery::new(
                    Arc::clone(&self.share),
                    creds.cloned(),
                    images,
                    image.as_str(),
                );
                debug!(images = gallery.len(), current = gallery.current_index(), "opening gallery");
                self.launcher.show_gallery(gallery)?;
                Ok(Payload::Empty)
            }
            Request::OpenMedia { path } => {
                let media = SmbPath::parse(&path)?;
                let meta = self
                    .share
                    .stat(&media, creds)?
                    .filter(|m| m.kind == EntryKind::File)
                    .ok_or_else(|| SambaError::NotFound(path.clone()))?;
                let subtitle = self.fetch_subtitle(&media, creds);
                let source = MediaSource::new(
                    Arc::clone(&self.share),
                    creds.cloned(),
                    media,
                    meta.size,
                    subtitle,
                );
                self.launcher.play_media(source)?;
                Ok(Payload::Empty)
            }
            Request::OpenFile { path } => {
                // Local paths, `file://` and `smb://` URLs all go to the viewer as given.
                let mime = transfer::mime_type(&path);
                self.launcher.view_file(&path, mime.as_deref())?;
                Ok(Payload::Json(mime.map_or(Value::Null, Value::String)))
            }
            Request::Upload {
                local_path,
                smb_path,
            } => {
                let entry = transfer::upload(
                    self.share.as_ref(),
                    creds,
                    &local_path,
                    &smb_path,
                    self.config.buffer_size,
                    |p| self.publish(p),
                )?;
                Ok(Payload::Json(serde_json::to_value(entry)?))
            }
            Request::Download { smb_path } => {
                let local = transfer::download(
                    self.share.as_ref(),
                    creds,
                    &self.config,
                    &smb_path,
                    |p| self.publish(p),
                )?;
                let mime = transfer::mime_type(&local);
                self.launcher.media_scanned(&local, mime.as_deref())?;
                Ok(local.display().to_string().into())
            }
            Request::CreateFile { path } => {
                let file = SmbPath::parse(&path)?;
                self.share.create_file(&file, creds)?;
                let entry = fresh_entry(&file, EntryKind::File, 0, true);
                Ok(Payload::Json(serde_json::to_value(entry)?))
            }
            Request::CreateDirectory { path } => {
                let dir = SmbPath::parse(&path)?;
                self.share.mkdir(&dir, creds)?;
                let entry = fresh_entry(&dir, EntryKind::Directory, 0, false);
                Ok(Payload::Json(serde_json::to_value(entry)?))
            }
            Request::Delete { path } => {
                self.share.delete(&SmbPath::parse(&path)?, creds)?;
                Ok(Payload::Empty)
            }
            Request::WakeOnLan { mac, port } => {
                let port = if port == 0 { self.config.wol_port } else { port };
                wol::broadcast(self.config.broadcast_address, &mac, port)?;
                Ok(Payload::Empty)
            }
        }
    }

    fn read_all(&self, path: &SmbPath, creds: Option<&Credentials>) -> Result<Vec<u8>> {
        let (mut reader, _) = self.share.open_read(path, creds)?;
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    /// Copy `<dir>/<stem>.srt` next to `media` into the cache directory.
    fn fetch_subtitle(&self, media: &SmbPath, creds: Option<&Credentials>) -> Option<PathBuf> {
        let name = media.name();
        let stem = name.rsplit_once('.').map_or(name, |(stem, _)| stem);
        let srt = media.parent().child(&format!("{stem}.srt"));
        match self.copy_subtitle(&srt, creds) {
            Ok(local) => Some(local),
            Err(e) => {
                debug!(subtitle = %srt, error = %e, "no subtitle");
                None
            }
        }
    }

    fn copy_subtitle(&self, srt: &SmbPath, creds: Option<&Credentials>) -> Result<PathBuf> {
        let bytes = self.read_all(srt, creds)?;
        let text = String::from_utf8_lossy(&bytes);
        std::fs::create_dir_all(&self.config.cache_dir)?;
        let local = self.config.cache_dir.join(SUBTITLE_FILE);
        std::fs::write(&local, text.as_bytes())?;
        Ok(local)
    }
}
