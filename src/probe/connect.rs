//! Creating connections to servers.

use core::future::Future;
use std::boxed::Box;
use std::fmt;
use std::io;
use std::pin::Pin;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

//------------ AsyncConnect --------------------------------------------------

/// This trait is for creating new network connections asynchronously.
///
/// A probe only ever needs one connection. It calls [`connect`] once,
/// owns the resulting connection exclusively, and drops it before it
/// returns.
///
/// [`connect`]: AsyncConnect::connect
pub trait AsyncConnect {
    /// The type of the connection.
    type Connection: AsyncRead + AsyncWrite + Send + Unpin;

    /// The future resolving into a new connection.
    type Fut: Future<Output = Result<Self::Connection, io::Error>> + Send;

    /// Starts connecting.
    fn connect(&self) -> Self::Fut;
}

//------------ TcpConnect ----------------------------------------------------

/// Create new TCP connections to a host and port.
///
/// The host can be an address or a host name. Host names are resolved
/// through the system’s resolver when connecting.
#[derive(Clone)]
pub struct TcpConnect {
    /// Remote host to connect to.
    host: String,

    /// Remote port to connect to.
    port: u16,
}

impl TcpConnect {
    /// Creates a new value connecting to `host` and `port`.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        TcpConnect {
            host: host.into(),
            port,
        }
    }
}

impl AsyncConnect for TcpConnect {
    type Connection = TcpStream;
    type Fut =
        Pin<Box<dyn Future<Output = Result<TcpStream, io::Error>> + Send>>;

    fn connect(&self) -> Self::Fut {
        let addr = (self.host.clone(), self.port);
        Box::pin(async move {
            let stream = TcpStream::connect(addr).await?;
            stream.set_nodelay(true)?;
            Ok(stream)
        })
    }
}

impl fmt::Debug for TcpConnect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TcpConnect({}:{})", self.host, self.port)
    }
}
