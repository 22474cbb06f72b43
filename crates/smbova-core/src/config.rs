// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Plugin configuration.

use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::types::MediaGroup;

/// File name used when the configuration is persisted in a directory.
pub const CONFIG_FILE: &str = "smbova.json";

/// Persistent plugin settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Download destination for image files.
    pub pictures_dir: PathBuf,
    /// Download destination for audio files.
    pub music_dir: PathBuf,
    /// Download destination for video files.
    pub movies_dir: PathBuf,
    /// Download destination for everything else.
    pub downloads_dir: PathBuf,
    /// Scratch space (subtitle copies).
    pub cache_dir: PathBuf,
    /// Chunk size for streamed transfers, in bytes.
    pub buffer_size: usize,
    /// Port used when a Wake-on-LAN request passes 0.
    pub wol_port: u16,
    /// Destination address for magic packets.
    pub broadcast_address: Ipv4Addr,
}

impl Default for PluginConfig {
    fn default() -> Self {
        let fallback = fallback_dir();
        let downloads = dirs::download_dir().unwrap_or_else(|| fallback.join("Download"));
        Self {
            pictures_dir: dirs::picture_dir().unwrap_or_else(|| downloads.clone()),
            music_dir: dirs::audio_dir().unwrap_or_else(|| downloads.clone()),
            movies_dir: dirs::video_dir().unwrap_or_else(|| downloads.clone()),
            downloads_dir: downloads,
            cache_dir: dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("smbova"),
            buffer_size: 8192,
            wol_port: 9,
            broadcast_address: Ipv4Addr::BROADCAST,
        }
    }
}

impl PluginConfig {
    /// Local directory a download of the given media group lands in.
    pub fn download_dir(&self, group: MediaGroup) -> &Path {
        match group {
            MediaGroup::Image => &self.pictures_dir,
            MediaGroup::Audio => &self.music_dir,
            MediaGroup::Video => &self.movies_dir,
            MediaGroup::Other => &self.downloads_dir,
        }
    }
}

/// Per-user location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(fallback_dir)
        .join("smbova")
        .join(CONFIG_FILE)
}

/// Load a persisted configuration, falling back to defaults when the file is
/// missing or malformed.
pub fn load_config(path: &Path) -> PluginConfig {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no config file, using defaults");
            return PluginConfig::default();
        }
    };
    match serde_json::from_str(&data) {
        Ok(config) => config,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "malformed config, using defaults");
            PluginConfig::default()
        }
    }
}

/// Persist the configuration as pretty JSON.
pub fn save_config(path: &Path, config: &PluginConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)?;
    Ok(())
}

fn fallback_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(std::env::temp_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_transfer_and_wol_constants() {
        let config = PluginConfig::default();
        assert_eq!(config.buffer_size, 8192);
        assert_eq!(config.wol_port, 9);
        assert_eq!(config.broadcast_address, Ipv4Addr::new(255, 255, 255, 255));
    }

    #[test]
    fn download_dir_follows_media_group() {
        let config = PluginConfig {
            pictures_dir: "/p".into(),
            music_dir: "/m".into(),
            movies_dir: "/v".into(),
            downloads_dir: "/d".into(),
            ..Default::default()
        };
        assert_eq!(config.download_dir(MediaGroup::Image), Path::new("/p"));
        assert_eq!(config.download_dir(MediaGroup::Audio), Path::new("/m"));
        assert_eq!(config.download_dir(MediaGroup::Video), Path::new("/v"));
        assert_eq!(config.download_dir(MediaGroup::Other), Path::new("/d"));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join(CONFIG_FILE);
        let config = PluginConfig {
            buffer_size: 4096,
            wol_port: 7,
            ..Default::default()
        };
        save_config(&path, &config).expect("save");
        assert_eq!(load_config(&path), config);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "{ not json").expect("write");
        assert_eq!(load_config(&path), PluginConfig::default());
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{ "wol_port": 40000 }"#).expect("write");
        let config = load_config(&path);
        assert_eq!(config.wol_port, 40000);
        assert_eq!(config.buffer_size, 8192);
    }
}
