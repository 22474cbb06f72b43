// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Typed request set and its exec wire form.
//
// Every native capability is one `Request` variant carrying its positional
// arguments. On the wire a request becomes an `Invocation`: the service name,
// the action (operation name) and a positional argument array, or `null` for
// operations without arguments.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use smbova_core::error::{Result, SambaError};
use smbova_core::types::SERVICE_NAME;

/// One call into the SambaPlugin native service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    RunBackground,
    Auth { username: String, password: String },
    ListEntries { path: String },
    ReadAsText { path: String },
    ReadAsByteArray { path: String },
    OpenImage { path: String },
    OpenMedia { path: String },
    OpenFile { path: String },
    Upload { local_path: String, smb_path: String },
    Download { smb_path: String },
    CreateFile { path: String },
    CreateDirectory { path: String },
    Delete { path: String },
    WakeOnLan { mac: String, port: u16 },
}

/// Wire form of a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invocation {
    pub service: String,
    pub action: String,
    pub args: Option<Vec<Value>>,
}

impl Request {
    /// Native method name, exactly as the script side spells it.
    pub fn method(&self) -> &'static str {
        match self {
            Self::RunBackground => "runBackground",
            Self::Auth { .. } => "auth",
            Self::ListEntries { .. } => "listEntries",
            Self::ReadAsText { .. } => "readAsText",
            Self::ReadAsByteArray { .. } => "readAsByteArray",
            Self::OpenImage { .. } => "openImage",
            Self::OpenMedia { .. } => "openMedia",
            Self::OpenFile { .. } => "openFile",
            Self::Upload { .. } => "upload",
            Self::Download { .. } => "download",
            Self::CreateFile { .. } => "createFile",
            Self::CreateDirectory { .. } => "createDirectory",
            Self::Delete { .. } => "delete",
            Self::WakeOnLan { .. } => "wakeOnLan",
        }
    }

    /// Positional argument list; `None` for operations without arguments.
    pub fn args(&self) -> Option<Vec<Value>> {
        let s = |v: &String| Value::String(v.clone());
        match self {
            Self::RunBackground => None,
            Self::Auth { username, password } => Some(vec![s(username), s(password)]),
            Self::ListEntries { path }
            | Self::ReadAsText { path }
            | Self::ReadAsByteArray { path }
            | Self::OpenImage { path }
            | Self::OpenMedia { path }
            | Self::OpenFile { path }
            | Self::CreateFile { path }
            | Self::CreateDirectory { path }
            | Self::Delete { path } => Some(vec![s(path)]),
            Self::Upload {
                local_path,
                smb_path,
            } => Some(vec![s(local_path), s(smb_path)]),
            Self::Download { smb_path } => Some(vec![s(smb_path)]),
            Self::WakeOnLan { mac, port } => Some(vec![s(mac), Value::from(*port)]),
        }
    }

    pub fn invocation(&self) -> Invocation {
        Invocation {
            service: SERVICE_NAME.to_owned(),
            action: self.method().to_owned(),
            args: self.args(),
        }
    }

    /// Parse a wire invocation back into a typed request (receiving side).
    pub fn decode(invocation: &Invocation) -> Result<Self> {
        if invocation.service != SERVICE_NAME {
            return Err(SambaError::UnknownService(invocation.service.clone()));
        }
        let args = Args {
            action: &invocation.action,
            values: invocation.args.as_deref().unwrap_or(&[]),
        };
        let path = || args.string(0);
        let request = match invocation.action.as_str() {
            "runBackground" => Self::RunBackground,
            "auth" => Self::Auth {
                username: args.optional_string(0)?,
                password: args.optional_string(1)?,
            },
            "listEntries" => Self::ListEntries { path: path()? },
            "readAsText" => Self::ReadAsText { path: path()? },
            "readAsByteArray" => Self::ReadAsByteArray { path: path()? },
            "openImage" => Self::OpenImage { path: path()? },
            "openMedia" => Self::OpenMedia { path: path()? },
            "openFile" => Self::OpenFile { path: path()? },
            "upload" => Self::Upload {
                local_path: args.string(0)?,
                smb_path: args.string(1)?,
            },
            "download" => Self::Download { smb_path: path()? },
            "createFile" => Self::CreateFile { path: path()? },
            "createDirectory" => Self::CreateDirectory { path: path()? },
            "delete" => Self::Delete { path: path()? },
            "wakeOnLan" => Self::WakeOnLan {
                mac: args.string(0)?,
                port: args.port(1)?,
            },
            other => return Err(SambaError::UndefinedMethod(other.to_owned())),
        };
        Ok(request)
    }
}

/// Positional argument accessor used while decoding.
struct Args<'a> {
    action: &'a str,
    values: &'a [Value],
}

impl Args<'_> {
    fn bad(&self, index: usize, reason: impl Into<String>) -> SambaError {
        SambaError::BadArgument {
            action: self.action.to_owned(),
            index,
            reason: reason.into(),
        }
    }

    fn string(&self, index: usize) -> Result<String> {
        match self.values.get(index) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Err(self.bad(index, format!("expected string, got {other}"))),
            None => Err(self.bad(index, "missing")),
        }
    }

    /// Absent or null decodes as empty, which the native side treats as
    /// "no value".
    fn optional_string(&self, index: usize) -> Result<String> {
        match self.values.get(index) {
            None | Some(Value::Null) => Ok(String::new()),
            Some(_) => self.string(index),
        }
    }

    fn port(&self, index: usize) -> Result<u16> {
        let value = self.values.get(index).ok_or_else(|| self.bad(index, "missing"))?;
        value
            .as_u64()
            .and_then(|n| u16::try_from(n).ok())
            .ok_or_else(|| self.bad(index, format!("expected port number, got {value}")))
    }
}
