//! A fake game server on the loopback interface.

#![allow(dead_code)]

use mcstatus::probe::PROBE;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// What the fake server does after receiving the probe.
#[derive(Clone, Debug)]
pub enum Behavior {
    /// Sends all the chunks, pausing in between.
    Respond(Vec<Vec<u8>>, Duration),

    /// Never sends anything.
    Silent,
}

/// What the fake server observed.
#[derive(Debug)]
pub struct Observed {
    /// The bytes received before responding.
    pub probe: Vec<u8>,

    /// The bytes received after responding until the client closed.
    pub rest: Vec<u8>,
}

/// Encodes a response with framing.
pub fn response(text: &str) -> Vec<u8> {
    let mut res = vec![0xFF, 0x00, 0x17, 0x00, 0xA7];
    res.extend(text.encode_utf16().flat_map(u16::to_le_bytes));
    res
}

/// Encodes text without framing.
pub fn utf16(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

/// Starts a server accepting a single connection.
pub async fn serve(
    behavior: Behavior,
) -> (SocketAddr, JoinHandle<Observed>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut sock, _) = listener.accept().await.unwrap();
        let mut probe = vec![0; PROBE.len()];
        sock.read_exact(&mut probe).await.unwrap();
        if let Behavior::Respond(chunks, pause) = behavior {
            for chunk in chunks {
                // The client may already be gone after the first chunk.
                if sock.write_all(&chunk).await.is_err() {
                    break;
                }
                let _ = sock.flush().await;
                tokio::time::sleep(pause).await;
            }
        }
        let mut rest = Vec::new();
        let _ = sock.read_to_end(&mut rest).await;
        Observed { probe, rest }
    });
    (addr, handle)
}

/// Returns a port nobody listens on.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}
