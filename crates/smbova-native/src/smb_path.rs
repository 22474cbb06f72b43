// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `smb://host/share/path` URLs.
//
// The raw string is kept verbatim so that paths handed back to the script
// side are exactly what it sent. A trailing `/` marks a directory, server or
// share.

use smbova_core::error::{Result, SambaError};
use smbova_core::types::extension_of;

const SCHEME: &str = "smb://";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SmbPath {
    raw: String,
}

impl SmbPath {
    pub fn parse(raw: &str) -> Result<Self> {
        let has_scheme = raw
            .get(..SCHEME.len())
            .is_some_and(|s| s.eq_ignore_ascii_case(SCHEME));
        if !has_scheme {
            return Err(SambaError::MalformedUrl(raw.to_owned()));
        }
        let path = Self {
            raw: raw.to_owned(),
        };
        let dotted = |s: &str| s == "." || s == "..";
        if path.host().is_some_and(dotted) || path.segments().into_iter().any(dotted) {
            return Err(SambaError::MalformedUrl(raw.to_owned()));
        }
        Ok(path)
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    fn rest(&self) -> &str {
        &self.raw[SCHEME.len()..]
    }

    /// Server name, if the URL names one.
    pub fn host(&self) -> Option<&str> {
        self.rest().split('/').next().filter(|h| !h.is_empty())
    }

    /// Share, directory and file segments below the host.
    pub fn segments(&self) -> Vec<&str> {
        self.rest()
            .split('/')
            .skip(1)
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn is_directory(&self) -> bool {
        self.raw.ends_with('/')
    }

    /// Last component, keeping the trailing `/` of directories.
    pub fn name(&self) -> &str {
        let trimmed = self.raw.strip_suffix('/').unwrap_or(&self.raw);
        match trimmed.rfind('/') {
            Some(index) if index + 1 >= SCHEME.len() => &self.raw[index + 1..],
            _ => &self.raw,
        }
    }

    /// Lower-cased extension of the last component.
    pub fn extension(&self) -> String {
        if self.is_directory() {
            String::new()
        } else {
            extension_of(self.name())
        }
    }

    /// Enclosing directory, ending in `/`. The root `smb://` is its own
    /// parent.
    pub fn parent(&self) -> SmbPath {
        let trimmed = self.raw.strip_suffix('/').unwrap_or(&self.raw);
        let end = match trimmed.rfind('/') {
            Some(index) if index + 1 >= SCHEME.len() => index + 1,
            _ => SCHEME.len(),
        };
        Self {
            raw: self.raw[..end].to_owned(),
        }
    }

    /// Join a child name onto a directory URL.
    pub fn child(&self, name: &str) -> SmbPath {
        let mut raw = self.raw.clone();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        raw.push_str(name);
        Self { raw }
    }
}

impl std::fmt::Display for SmbPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}
