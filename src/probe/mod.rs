//! Asking a server for its status.
//!
//! The probe speaks the legacy “server list ping”: right after
//! connecting it sends the fixed [`PROBE`] message and waits for the
//! server to answer. The first chunk of data received is decoded as a
//! [`Payload`] and turned into a [`ServerStatus`]. Anything arriving
//! later is ignored; there is no reassembly of responses split over
//! several reads.
//!
//! A single inactivity timeout covers both connecting and waiting for the
//! response. It is not restarted once the connection is established.

pub use self::connect::{AsyncConnect, TcpConnect};
pub use self::payload::{parse_int, Payload};

use crate::error::Error;
use crate::resolv::ServerLocation;
use bytes::BytesMut;
use std::io;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, trace};

pub mod connect;
pub mod payload;

//------------ Configuration Constants ---------------------------------------

/// The message sent to the server.
///
/// This is a server list ping (`0xFE`) followed by `0x01` and an empty
/// plugin message.
pub const PROBE: [u8; 14] = [0xFE, 0x01, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];

/// How much we are willing to read in one go.
const READ_BUF_SIZE: usize = 64 * 1024;

/// The payload key for the player count.
const PLAYERS_KEY: &str = "player_0";

/// The payload key for the message of the day.
const MOTD_KEY: &str = "description";

/// The payload key for the version.
const VERSION_KEY: &str = "version";

//------------ probe ---------------------------------------------------------

/// Asks the server at `location` for its status over TCP.
///
/// Fails with [`Error::ProbeTimeout`] if the server hasn’t answered
/// within `timeout` after starting to connect and with
/// [`Error::ProbeTransport`] if the connection fails. A location with
/// port 0 is refused without trying to connect.
pub async fn probe(
    location: &ServerLocation,
    timeout: Duration,
) -> Result<ServerStatus, Error> {
    if location.port() == 0 {
        debug!("refusing to probe {}", location);
        return Err(Error::transport(io::Error::new(
            io::ErrorKind::InvalidInput,
            "port 0 cannot be connected to",
        )));
    }
    let connect = TcpConnect::new(location.host(), location.port());
    probe_with(&connect, location.host(), timeout).await
}

/// Asks a server for its status over a connection created by `connect`.
///
/// The `name` ends up as [`ServerStatus::name`] and should be whatever
/// was used to reach the server. The connection is dropped, and thereby
/// closed, before the function returns.
pub async fn probe_with<C: AsyncConnect>(
    connect: &C,
    name: &str,
    timeout: Duration,
) -> Result<ServerStatus, Error> {
    let exchange = async {
        trace!("connecting to {}", name);
        let mut conn = connect.connect().await.map_err(|err| {
            debug!("failed to connect to {}: {}", name, err);
            Error::transport(err)
        })?;
        let status = handshake(&mut conn, name).await?;
        Ok::<_, Error>((conn, status))
    };
    match tokio::time::timeout(timeout, exchange).await {
        Ok(Ok((conn, status))) => {
            trace!("closing connection to {}", name);
            drop(conn);
            Ok(status)
        }
        Ok(Err(err)) => Err(err),
        Err(_) => {
            debug!("{} did not respond within {:?}", name, timeout);
            Err(Error::ProbeTimeout)
        }
    }
}

/// Performs the handshake on an established connection.
///
/// Writes the probe, reads once, and decodes what was received. Closing
/// the connection is left to the caller.
pub async fn handshake<S>(
    conn: &mut S,
    name: &str,
) -> Result<ServerStatus, Error>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    conn.write_all(&PROBE).await.map_err(Error::transport)?;
    trace!("probe written to {}", name);

    let mut buf = BytesMut::with_capacity(READ_BUF_SIZE);
    let len = conn.read_buf(&mut buf).await.map_err(Error::transport)?;
    if len == 0 {
        debug!("{} closed the connection without responding", name);
        return Err(Error::transport(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "connection closed before a response was received",
        )));
    }
    trace!("received {} bytes from {}", len, name);

    let payload = Payload::decode(&buf);
    trace!("decoded fields from {}: {:?}", name, payload.fields());
    Ok(ServerStatus::from_payload(name, &payload))
}

//------------ ServerStatus --------------------------------------------------

/// What a server reported about itself.
///
/// All fields but the name come straight from the response. If the
/// server didn’t send a field or sent something unexpected, the field is
/// `None`.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServerStatus {
    name: String,
    player_count: Option<i64>,
    motd: Option<String>,
    version: Option<String>,
}

impl ServerStatus {
    /// Creates a new value from its parts.
    pub fn new(
        name: impl Into<String>,
        player_count: Option<i64>,
        motd: Option<String>,
        version: Option<String>,
    ) -> Self {
        ServerStatus {
            name: name.into(),
            player_count,
            motd,
            version,
        }
    }

    /// Creates a new value from a decoded payload.
    pub fn from_payload(name: impl Into<String>, payload: &Payload) -> Self {
        ServerStatus {
            name: name.into(),
            player_count: payload.get(PLAYERS_KEY).and_then(parse_int),
            motd: payload.get(MOTD_KEY).map(Into::into),
            version: payload.get(VERSION_KEY).map(Into::into),
        }
    }

    /// Returns the name used to reach the server.
    ///
    /// This is not reported by the server.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of players reported by the server.
    pub fn player_count(&self) -> Option<i64> {
        self.player_count
    }

    /// Returns the message of the day.
    pub fn motd(&self) -> Option<&str> {
        self.motd.as_deref()
    }

    /// Returns the version reported by the server.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

//============ Testing =======================================================
