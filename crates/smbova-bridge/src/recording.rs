// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Recording transport: a test double that captures every forwarded call and
// lets the test settle each one later, in any order.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use smbova_core::types::Payload;

use crate::completion::Completion;
use crate::request::{Invocation, Request};
use crate::traits::Transport;

struct RecordedCall {
    request: Request,
    completion: Option<Completion>,
}

/// Transport that records calls instead of executing them.
///
/// Clones share the same log, so a test can keep one handle while the façade
/// owns another.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn calls(&self) -> MutexGuard<'_, Vec<RecordedCall>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of calls forwarded so far.
    pub fn len(&self) -> usize {
        self.calls().len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls().is_empty()
    }

    /// Typed requests in forwarding order.
    pub fn requests(&self) -> Vec<Request> {
        self.calls().iter().map(|c| c.request.clone()).collect()
    }

    /// Wire invocations in forwarding order.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.calls().iter().map(|c| c.request.invocation()).collect()
    }

    /// Whether call `index` is still waiting for a result.
    pub fn is_pending(&self, index: usize) -> bool {
        self.calls()
            .get(index)
            .is_some_and(|c| c.completion.is_some())
    }

    /// Fire the success continuation of call `index`. Returns `false` when
    /// the call does not exist or was already settled.
    pub fn resolve(&self, index: usize, payload: impl Into<Payload>) -> bool {
        match self.take(index) {
            Some(completion) => {
                completion.succeed(payload);
                true
            }
            None => false,
        }
    }

    /// Fire the failure continuation of call `index`.
    pub fn reject(&self, index: usize, payload: impl Into<Payload>) -> bool {
        match self.take(index) {
            Some(completion) => {
                completion.fail(payload);
                true
            }
            None => false,
        }
    }

    // The lock is released before a continuation runs, so continuations may
    // issue further calls through the same transport.
    fn take(&self, index: usize) -> Option<Completion> {
        self.calls().get_mut(index).and_then(|c| c.completion.take())
    }
}

impl Transport for RecordingTransport {
    fn exec(&self, request: Request, completion: Completion) {
        self.calls().push(RecordedCall {
            request,
            completion: Some(completion),
        });
    }
}

impl std::fmt::Debug for RecordingTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingTransport")
            .field("calls", &self.len())
            .finish()
    }
}
