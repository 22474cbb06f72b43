// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Smbova: SambaPlugin bridge.
//!
//! Script-facing code talks to the native plugin through [`SambaPlugin`], a
//! façade with one method per native capability. Each method turns its
//! arguments into a typed [`Request`] and hands it, together with a
//! [`Completion`] holding the caller's continuations, to an injected
//! [`Transport`]. The façade keeps no state and interprets nothing: results
//! and errors arrive later through the continuations.
//!
//! Transports shipped here:
//!
//! - [`StubTransport`] for builds without a native side.
//! - [`RecordingTransport`] for tests, which records calls and lets the test
//!   settle them later.
//!
//! The native implementation lives in `smbova-native`.

pub mod completion;
pub mod facade;
pub mod recording;
pub mod request;
pub mod stub;
pub mod traits;

pub use completion::Completion;
pub use facade::SambaPlugin;
pub use recording::RecordingTransport;
pub use request::{Invocation, Request};
pub use stub::StubTransport;
pub use traits::Transport;
