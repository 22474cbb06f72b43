// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Line-delimited JSON framing between the script runtime and the host.
//
// Inbound:  {"callbackId": "...", "service": "SambaPlugin", "action": "...", "args": [...]}
// Outbound: {"callbackId": "...", "status": "ok" | "error", "payload": ...}
//           {"event": "progress", "path": "...", "fraction": 0.5}

use serde::{Deserialize, Serialize};
use serde_json::json;

use smbova_bridge::Invocation;
use smbova_core::error::Result;
use smbova_core::types::{Payload, Progress};

/// One exec call as sent by the script runtime.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inbound {
    pub callback_id: String,
    #[serde(flatten)]
    pub invocation: Invocation,
}

/// Which continuation a reply settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Error,
}

pub fn parse_line(line: &str) -> Result<Inbound> {
    Ok(serde_json::from_str(line)?)
}

pub fn reply(callback_id: &str, status: Status, payload: &Payload) -> String {
    json!({
        "callbackId": callback_id,
        "status": status,
        "payload": payload.to_wire(),
    })
    .to_string()
}

pub fn progress_event(progress: &Progress) -> String {
    json!({
        "event": "progress",
        "path": progress.path,
        "fraction": progress.fraction,
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn parses_call_without_args() {
        let inbound =
            parse_line(r#"{"callbackId":"7","service":"SambaPlugin","action":"runBackground"}"#)
                .expect("parse");
        assert_eq!(inbound.callback_id, "7");
        assert_eq!(inbound.invocation.action, "runBackground");
        assert_eq!(inbound.invocation.args, None);
    }

    #[test]
    fn parses_positional_args() {
        let inbound = parse_line(
            r#"{"callbackId":"a","service":"SambaPlugin","action":"wakeOnLan","args":["AA:BB:CC:DD:EE:FF",9]}"#,
        )
        .expect("parse");
        let args = inbound.invocation.args.expect("args");
        assert_eq!(args[1], 9);
    }

    #[test]
    fn rejects_lines_without_callback_id() {
        assert!(parse_line(r#"{"service":"SambaPlugin","action":"auth"}"#).is_err());
        assert!(parse_line("not json").is_err());
    }

    #[test]
    fn replies_carry_status_and_wire_payload() {
        let line = reply("9", Status::Ok, &Payload::Bytes(vec![1, 2, 3]));
        let value: Value = serde_json::from_str(&line).expect("json");
        assert_eq!(value["callbackId"], "9");
        assert_eq!(value["status"], "ok");
        assert_eq!(value["payload"]["type"], "ArrayBuffer");
        assert_eq!(value["payload"]["data"], "AQID");

        let line = reply("9", Status::Error, &Payload::from("Invalid MAC address."));
        let value: Value = serde_json::from_str(&line).expect("json");
        assert_eq!(value["status"], "error");
        assert_eq!(value["payload"], "Invalid MAC address.");
    }

    #[test]
    fn progress_lines_are_events() {
        let line = progress_event(&Progress {
            path: "smb://nas/a.bin".into(),
            fraction: 0.5,
        });
        let value: Value = serde_json::from_str(&line).expect("json");
        assert_eq!(value["event"], "progress");
        assert_eq!(value["fraction"], 0.5);
    }
}
