// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Success/failure continuation pair for one forwarded call.

use smbova_core::error::Result;
use smbova_core::types::Payload;
use tracing::warn;

/// Boxed continuation receiving a result or error payload.
pub type Continuation = Box<dyn FnOnce(Payload) + Send + 'static>;

/// The two continuations of a call.
///
/// `succeed` and `fail` consume the completion, so at most one continuation
/// ever runs and it runs at most once. A completion dropped unfired runs
/// nothing.
pub struct Completion {
    on_success: Option<Continuation>,
    on_error: Option<Continuation>,
}

impl Completion {
    pub fn new<S, E>(on_success: S, on_error: E) -> Self
    where
        S: FnOnce(Payload) + Send + 'static,
        E: FnOnce(Payload) + Send + 'static,
    {
        Self {
            on_success: Some(Box::new(on_success)),
            on_error: Some(Box::new(on_error)),
        }
    }

    pub fn succeed(mut self, payload: impl Into<Payload>) {
        self.on_error = None;
        if let Some(on_success) = self.on_success.take() {
            on_success(payload.into());
        }
    }

    pub fn fail(mut self, payload: impl Into<Payload>) {
        self.on_success = None;
        if let Some(on_error) = self.on_error.take() {
            on_error(payload.into());
        }
    }

    /// Settle from a native result; errors are delivered as their message.
    pub fn complete(self, result: Result<Payload>) {
        match result {
            Ok(payload) => self.succeed(payload),
            Err(e) => self.fail(e.to_string()),
        }
    }
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion")
            .field("pending", &self.on_success.is_some())
            .finish()
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if self.on_success.is_some() {
            warn!("completion dropped without firing either continuation");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<(&'static str, Payload)>>>;

    fn logged() -> (Log, Completion) {
        let log: Log = Arc::default();
        let ok = Arc::clone(&log);
        let err = Arc::clone(&log);
        let completion = Completion::new(
            move |p| ok.lock().unwrap().push(("ok", p)),
            move |p| err.lock().unwrap().push(("err", p)),
        );
        (log, completion)
    }

    #[test]
    fn succeed_fires_only_success() {
        let (log, completion) = logged();
        completion.succeed(true);
        assert_eq!(*log.lock().unwrap(), vec![("ok", Payload::from(true))]);
    }

    #[test]
    fn failed_result_delivers_message() {
        let (log, completion) = logged();
        completion.complete(Err(smbova_core::SambaError::InvalidMac));
        assert_eq!(
            *log.lock().unwrap(),
            vec![("err", Payload::from("Invalid MAC address."))]
        );
    }

    #[test]
    fn dropped_completion_fires_nothing() {
        let (log, completion) = logged();
        drop(completion);
        assert!(log.lock().unwrap().is_empty());
    }
}
