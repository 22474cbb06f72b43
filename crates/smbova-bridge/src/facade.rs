// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The SambaPlugin façade: one method per native capability, each forwarding
// exactly one request to the injected transport.

use smbova_core::types::Payload;

use crate::completion::Completion;
use crate::request::Request;
use crate::traits::Transport;

/// Script-facing entry points of the SambaPlugin.
///
/// No method validates, transforms, queues or deduplicates anything; ordering
/// between calls (e.g. `auth` before `list_entries`) is the caller's concern.
#[derive(Debug, Clone)]
pub struct SambaPlugin<T> {
    transport: T,
}

impl<T: Transport> SambaPlugin<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn forward<S, E>(&self, request: Request, on_success: S, on_error: E)
    where
        S: FnOnce(Payload) + Send + 'static,
        E: FnOnce(Payload) + Send + 'static,
    {
        tracing::trace!(action = request.method(), "forwarding to SambaPlugin");
        self.transport
            .exec(request, Completion::new(on_success, on_error));
    }

    /// Move the host app to the background.
    pub fn run_background<S, E>(&self, on_success: S, on_error: E)
    where
        S: FnOnce(Payload) + Send + 'static,
        E: FnOnce(Payload) + Send + 'static,
    {
        self.forward(Request::RunBackground, on_success, on_error)
    }

    pub fn auth<S, E>(
        &self,
        username: impl Into<String>,
        password: impl Into<String>,
        on_success: S,
        on_error: E,
    ) where
        S: FnOnce(Payload) + Send + 'static,
        E: FnOnce(Payload) + Send + 'static,
    {
        let request = Request::Auth {
            username: username.into(),
            password: password.into(),
        };
        self.forward(request, on_success, on_error)
    }

    pub fn list_entries<S, E>(&self, path: impl Into<String>, on_success: S, on_error: E)
    where
        S: FnOnce(Payload) + Send + 'static,
        E: FnOnce(Payload) + Send + 'static,
    {
        let request = Request::ListEntries { path: path.into() };
        self.forward(request, on_success, on_error)
    }

    pub fn read_as_text<S, E>(&self, path: impl Into<String>, on_success: S, on_error: E)
    where
        S: FnOnce(Payload) + Send + 'static,
        E: FnOnce(Payload) + Send + 'static,
    {
        let request = Request::ReadAsText { path: path.into() };
        self.forward(request, on_success, on_error)
    }

    pub fn read_as_byte_array<S, E>(&self, path: impl Into<String>, on_success: S, on_error: E)
    where
        S: FnOnce(Payload) + Send + 'static,
        E: FnOnce(Payload) + Send + 'static,
    {
        let request = Request::ReadAsByteArray { path: path.into() };
        self.forward(request, on_success, on_error)
    }

    pub fn open_image<S, E>(&self, path: impl Into<String>, on_success: S, on_error: E)
    where
        S: FnOnce(Payload) + Send + 'static,
        E: FnOnce(Payload) + Send + 'static,
    {
        let request = Request::OpenImage { path: path.into() };
        self.forward(request, on_success, on_error)
    }

    pub fn open_media<S, E>(&self, path: impl Into<String>, on_success: S, on_error: E)
    where
        S: FnOnce(Payload) + Send + 'static,
        E: FnOnce(Payload) + Send + 'static,
    {
        let request = Request::OpenMedia { path: path.into() };
        self.forward(request, on_success, on_error)
    }

    pub fn open_file<S, E>(&self, path: impl Into<String>, on_success: S, on_error: E)
    where
        S: FnOnce(Payload) + Send + 'static,
        E: FnOnce(Payload) + Send + 'static,
    {
        let request = Request::OpenFile { path: path.into() };
        self.forward(request, on_success, on_error)
    }

    pub fn upload<S, E>(
        &self,
        local_path: impl Into<String>,
        smb_path: impl Into<String>,
        on_success: S,
        on_error: E,
    ) where
        S: FnOnce(Payload) + Send + 'static,
        E: FnOnce(Payload) + Send + 'static,
    {
        let request = Request::Upload {
            local_path: local_path.into(),
            smb_path: smb_path.into(),
        };
        self.forward(request, on_success, on_error)
    }

    pub fn download<S, E>(&self, smb_path: impl Into<String>, on_success: S, on_error: E)
    where
        S: FnOnce(Payload) + Send + 'static,
        E: FnOnce(Payload) + Send + 'static,
    {
        let request = Request::Download {
            smb_path: smb_path.into(),
        };
        self.forward(request, on_success, on_error)
    }

    pub fn create_file<S, E>(&self, path: impl Into<String>, on_success: S, on_error: E)
    where
        S: FnOnce(Payload) + Send + 'static,
        E: FnOnce(Payload) + Send + 'static,
    {
        let request = Request::CreateFile { path: path.into() };
        self.forward(request, on_success, on_error)
    }

    pub fn create_directory<S, E>(&self, path: impl Into<String>, on_success: S, on_error: E)
    where
        S: FnOnce(Payload) + Send + 'static,
        E: FnOnce(Payload) + Send + 'static,
    {
        let request = Request::CreateDirectory { path: path.into() };
        self.forward(request, on_success, on_error)
    }

    pub fn delete<S, E>(&self, path: impl Into<String>, on_success: S, on_error: E)
    where
        S: FnOnce(Payload) + Send + 'static,
        E: FnOnce(Payload) + Send + 'static,
    {
        let request = Request::Delete { path: path.into() };
        self.forward(request, on_success, on_error)
    }

    /// Broadcast a magic packet; the MAC and port go through untouched.
    pub fn wake_on_lan<S, E>(&self, mac: impl Into<String>, port: u16, on_success: S, on_error: E)
    where
        S: FnOnce(Payload) + Send + 'static,
        E: FnOnce(Payload) + Send + 'static,
    {
        let request = Request::WakeOnLan {
            mac: mac.into(),
            port,
        };
        self.forward(request, on_success, on_error)
    }
}
