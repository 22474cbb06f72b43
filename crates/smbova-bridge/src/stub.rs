// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub transport for builds where no native SambaPlugin is linked.
//
// Every call fails with `PlatformUnavailable`. The failure is delivered from
// a separate thread so the façade call has returned before it fires.

use smbova_core::error::SambaError;

use crate::completion::Completion;
use crate::request::Request;
use crate::traits::Transport;

/// No-op transport returned where the native plugin is absent.
#[derive(Debug, Default, Clone, Copy)]
pub struct StubTransport;

impl Transport for StubTransport {
    fn exec(&self, request: Request, completion: Completion) {
        tracing::warn!(action = request.method(), "SambaPlugin called on stub transport");
        std::thread::spawn(move || completion.fail(SambaError::PlatformUnavailable.to_string()));
    }
}
