// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Transport abstraction between the façade and whatever executes calls.

use std::sync::Arc;

use crate::completion::Completion;
use crate::request::Request;

/// Carries requests to the native service.
///
/// `exec` must return without waiting for the call to finish; the result is
/// delivered later through the completion. Implementations give no ordering
/// guarantee between calls.
pub trait Transport: Send + Sync {
    fn exec(&self, request: Request, completion: Completion);
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn exec(&self, request: Request, completion: Completion) {
        (**self).exec(request, completion)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn exec(&self, request: Request, completion: Completion) {
        (**self).exec(request, completion)
    }
}
