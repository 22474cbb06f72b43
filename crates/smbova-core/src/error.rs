// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Smbova.

use thiserror::Error;

/// Top-level error type for all Smbova operations.
///
/// The display text is what reaches a caller's failure continuation, so the
/// messages stay short and user-facing.
#[derive(Debug, Error)]
pub enum SambaError {
    // -- Bridge / dispatch --
    #[error("Undefined method:{0}")]
    UndefinedMethod(String),

    #[error("unknown service: {0}")]
    UnknownService(String),

    #[error("bad argument {index} for {action}: {reason}")]
    BadArgument {
        action: String,
        index: usize,
        reason: String,
    },

    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,

    // -- Share access --
    #[error("malformed SMB URL: {0}")]
    MalformedUrl(String),

    #[error("no such file or directory: {0}")]
    NotFound(String),

    #[error("access denied: {0}")]
    AccessDenied(String),

    // -- Wake-on-LAN --
    #[error("Invalid MAC address.")]
    InvalidMac,

    #[error("Wake-on-LAN failed: {0}")]
    WakeOnLan(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SambaError>;
