// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Smbova Native: the receiving side of the SambaPlugin bridge. `SambaHost`
// implements the bridge `Transport` and executes every request against a
// `ShareFs` (the seam to an SMB client) and a `Launcher` (the seam to
// platform viewers).

pub mod entries;
pub mod host;
pub mod launcher;
pub mod share;
pub mod smb_path;
pub mod transfer;
pub mod wol;

pub use host::SambaHost;
pub use launcher::{Gallery, HeadlessLauncher, Launcher, MediaSource};
pub use share::{Credentials, LocalShare, RemoteEntry, ShareFs};
pub use smb_path::SmbPath;
