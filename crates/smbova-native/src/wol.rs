// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Wake-on-LAN.
//
// Wake a sleeping NAS before browsing it: a magic packet (6x 0xFF followed by
// 16 repetitions of the MAC) broadcast over UDP.

use std::net::{Ipv4Addr, UdpSocket};
use std::sync::LazyLock;

use regex::Regex;
use tracing::info;

use smbova_core::error::{Result, SambaError};

/// Size of a magic packet for a 6-byte MAC.
pub const MAGIC_PACKET_LEN: usize = 6 + 16 * 6;

static MAC_RULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9a-fA-F]{2}[-:]){5}[0-9a-fA-F]{2}$").expect("MAC pattern is valid")
});

/// Parse `AA:BB:CC:DD:EE:FF` or `aa-bb-cc-dd-ee-ff` into bytes.
pub fn parse_mac(mac: &str) -> Result<[u8; 6]> {
    if !MAC_RULE.is_match(mac) {
        return Err(SambaError::InvalidMac);
    }
    let mut bytes = [0u8; 6];
    for (slot, part) in bytes.iter_mut().zip(mac.split([':', '-'])) {
        *slot = u8::from_str_radix(part, 16).map_err(|_| SambaError::InvalidMac)?;
    }
    Ok(bytes)
}

/// Build the magic packet for `mac`.
pub fn magic_packet(mac: &[u8; 6]) -> [u8; MAGIC_PACKET_LEN] {
    let mut packet = [0xFFu8; MAGIC_PACKET_LEN];
    for chunk in packet[6..].chunks_exact_mut(6) {
        chunk.copy_from_slice(mac);
    }
    packet
}

/// Send a magic packet for `mac` to `address:port`.
pub fn broadcast(address: Ipv4Addr, mac: &str, port: u16) -> Result<()> {
    let mac_bytes = parse_mac(mac)?;
    let packet = magic_packet(&mac_bytes);

    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))
        .map_err(|e| SambaError::WakeOnLan(format!("bind: {e}")))?;
    socket
        .set_broadcast(true)
        .map_err(|e| SambaError::WakeOnLan(format!("broadcast: {e}")))?;
    socket
        .send_to(&packet, (address, port))
        .map_err(|e| SambaError::WakeOnLan(format!("send: {e}")))?;

    info!(mac, %address, port, "Wake-on-LAN magic packet sent");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn parses_both_separators() {
        let expected = [0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF];
        assert_eq!(parse_mac("AA:BB:CC:DD:EE:FF").expect("colon"), expected);
        assert_eq!(parse_mac("aa-bb-cc-dd-ee-ff").expect("dash"), expected);
    }

    #[test]
    fn rejects_malformed_macs() {
        for bad in ["", "AA:BB:CC:DD:EE", "AA:BB:CC:DD:EE:FF:00", "GG:BB:CC:DD:EE:FF", "AABBCCDDEEFF"] {
            assert!(matches!(parse_mac(bad), Err(SambaError::InvalidMac)), "{bad}");
        }
    }

    #[test]
    fn packet_is_preamble_plus_sixteen_macs() {
        let mac = [1, 2, 3, 4, 5, 6];
        let packet = magic_packet(&mac);
        assert_eq!(packet.len(), 102);
        assert_eq!(&packet[..6], &[0xFF; 6]);
        for repeat in packet[6..].chunks(6) {
            assert_eq!(repeat, &mac);
        }
    }

    #[test]
    fn sends_packet_to_receiver() {
        let receiver = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).expect("bind");
        receiver
            .set_read_timeout(Some(Duration::from_secs(5)))
            .expect("timeout");
        let port = receiver.local_addr().expect("addr").port();

        broadcast(Ipv4Addr::LOCALHOST, "01:02:03:04:05:06", port).expect("send");

        let mut buf = [0u8; 256];
        let (n, _) = receiver.recv_from(&mut buf).expect("recv");
        assert_eq!(&buf[..n], &magic_packet(&[1, 2, 3, 4, 5, 6])[..]);
    }

    #[test]
    fn invalid_mac_sends_nothing() {
        assert_eq!(
            broadcast(Ipv4Addr::LOCALHOST, "nope", 9).unwrap_err().to_string(),
            "Invalid MAC address."
        );
    }
}
