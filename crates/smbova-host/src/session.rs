// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Routing of inbound lines to a transport and of results back to stdout.

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use smbova_bridge::{Completion, Request, Transport};
use smbova_core::types::{Payload, Progress};

use crate::wire::{self, Status};

/// Decode one inbound line and hand it to `transport`. The reply line is
/// queued on `out` once the call settles. Lines without a usable
/// `callbackId` cannot be answered and are dropped.
pub fn handle_line(transport: &impl Transport, out: &UnboundedSender<String>, line: &str) {
    let inbound = match wire::parse_line(line) {
        Ok(inbound) => inbound,
        Err(e) => {
            warn!(error = %e, "dropping malformed line");
            return;
        }
    };
    let callback_id = inbound.callback_id;

    let request = match Request::decode(&inbound.invocation) {
        Ok(request) => request,
        Err(e) => {
            debug!(callback_id = %callback_id, error = %e, "rejecting undecodable call");
            send(out, wire::reply(&callback_id, Status::Error, &Payload::from(e.to_string())));
            return;
        }
    };

    let (ok_out, ok_id) = (out.clone(), callback_id.clone());
    let (err_out, err_id) = (out.clone(), callback_id);
    transport.exec(
        request,
        Completion::new(
            move |payload: Payload| send(&ok_out, wire::reply(&ok_id, Status::Ok, &payload)),
            move |payload: Payload| send(&err_out, wire::reply(&err_id, Status::Error, &payload)),
        ),
    );
}

/// Write reply and progress lines to `sink` until every reply sender is gone.
///
/// Progress is published before a transfer's reply is queued, so polling it
/// first writes every event ahead of the reply that ends the transfer.
pub async fn write_output<W: AsyncWrite + Unpin>(
    mut sink: W,
    mut progress: broadcast::Receiver<Progress>,
    mut replies: UnboundedReceiver<String>,
) -> std::io::Result<()> {
    let mut progress_open = true;
    loop {
        let line = tokio::select! {
            biased;
            event = progress.recv(), if progress_open => match event {
                Ok(event) => wire::progress_event(&event),
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "progress events skipped");
                    continue;
                }
                Err(RecvError::Closed) => {
                    progress_open = false;
                    continue;
                }
            },
            reply = replies.recv() => match reply {
                Some(line) => line,
                None => break,
            },
        };
        sink.write_all(line.as_bytes()).await?;
        sink.write_all(b"\n").await?;
        sink.flush().await?;
    }
    Ok(())
}

fn send(out: &UnboundedSender<String>, line: String) {
    if out.send(line).is_err() {
        debug!("output closed; reply dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use smbova_bridge::RecordingTransport;
    use tokio::sync::mpsc;

    fn next(rx: &mut mpsc::UnboundedReceiver<String>) -> Value {
        let line = rx.try_recv().expect("reply queued");
        serde_json::from_str(&line).expect("json")
    }

    #[test]
    fn forwards_and_replies_when_settled() {
        let transport = RecordingTransport::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        handle_line(
            &transport,
            &tx,
            r#"{"callbackId":"c1","service":"SambaPlugin","action":"listEntries","args":["smb://nas/"]}"#,
        );
        assert_eq!(
            transport.requests(),
            vec![Request::ListEntries {
                path: "smb://nas/".into()
            }]
        );
        assert!(rx.try_recv().is_err());

        assert!(transport.resolve(0, Value::Null));
        let reply = next(&mut rx);
        assert_eq!(reply["callbackId"], "c1");
        assert_eq!(reply["status"], "ok");
        assert_eq!(reply["payload"], Value::Null);
    }

    #[test]
    fn rejected_call_replies_with_error() {
        let transport = RecordingTransport::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        handle_line(
            &transport,
            &tx,
            r#"{"callbackId":"c2","service":"SambaPlugin","action":"delete","args":["smb://nas/x"]}"#,
        );
        assert!(transport.reject(0, "access denied: smb://nas/x"));
        let reply = next(&mut rx);
        assert_eq!(reply["status"], "error");
        assert_eq!(reply["payload"], "access denied: smb://nas/x");
    }

    #[test]
    fn unknown_action_is_answered_without_forwarding() {
        let transport = RecordingTransport::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        handle_line(
            &transport,
            &tx,
            r#"{"callbackId":"c3","service":"SambaPlugin","action":"format","args":[]}"#,
        );
        assert!(transport.is_empty());
        let reply = next(&mut rx);
        assert_eq!(reply["status"], "error");
        assert_eq!(reply["payload"], "Undefined method:format");
    }

    #[test]
    fn malformed_lines_are_dropped() {
        let transport = RecordingTransport::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        handle_line(&transport, &tx, "{");
        assert!(transport.is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn progress_is_written_before_the_final_reply() {
        let (progress_tx, progress_rx) = broadcast::channel(16);
        let (reply_tx, reply_rx) = mpsc::unbounded_channel();
        for fraction in [0.5, 1.0] {
            progress_tx
                .send(Progress {
                    path: "smb://nas/a.bin".into(),
                    fraction,
                })
                .expect("subscriber");
        }
        reply_tx
            .send(wire::reply("d1", Status::Ok, &Payload::from("/tmp/a.bin")))
            .expect("open");
        drop(reply_tx);

        let mut sink = Vec::new();
        write_output(&mut sink, progress_rx, reply_rx)
            .await
            .expect("write");

        let lines: Vec<Value> = String::from_utf8(sink)
            .expect("utf-8")
            .lines()
            .map(|l| serde_json::from_str(l).expect("json"))
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["event"], "progress");
        assert_eq!(lines[1]["fraction"], 1.0);
        assert_eq!(lines[2]["callbackId"], "d1");
        // The progress sender is still alive; the writer stops on replies alone.
        drop(progress_tx);
    }
}
