//! The trait defining the DNS lookups needed to find a server.

use super::ServiceRecord;
use std::error;
use std::fmt;
use std::future::Future;
use std::io;
use std::net::Ipv4Addr;
use std::sync::Arc;

//----------- Lookup ---------------------------------------------------------

/// A type that can answer the two DNS questions needed to find a server.
///
/// Finding a server needs exactly two kinds of questions: the SRV records
/// for a service name and the A records for a plain host name. Anything
/// that can answer these can be used with [`resolve`][super::resolve].
/// The crate provides [`StubLookup`][super::StubLookup] which asks the
/// system’s configured name servers.
///
/// Both methods return futures that are polled concurrently and may be
/// dropped before they complete.
pub trait Lookup {
    /// The future resolving into SRV records.
    type Srv<'a>: Future<Output = Result<Vec<ServiceRecord>, LookupError>>
        + Send
    where
        Self: 'a;

    /// The future resolving into IPv4 addresses.
    type Ipv4<'a>: Future<Output = Result<Vec<Ipv4Addr>, LookupError>>
        + Send
    where
        Self: 'a;

    /// Returns a future looking up the SRV records for `qname`.
    ///
    /// The records should be returned in the order they should be tried.
    fn lookup_srv<'a>(&'a self, qname: &str) -> Self::Srv<'a>;

    /// Returns a future looking up the A records for `qname`.
    fn lookup_ipv4<'a>(&'a self, qname: &str) -> Self::Ipv4<'a>;
}

//------------ LookupError ---------------------------------------------------

/// A single DNS lookup did not produce anything usable.
#[derive(Clone, Debug)]
pub enum LookupError {
    /// The query name is not a valid domain name.
    BadName(String),

    /// The name server answered with an error response code.
    ///
    /// This includes the common case of the name not existing at all.
    Negative(String),

    /// The answer was fine but contained no usable records.
    NoRecords,

    /// The answer could not be parsed.
    Malformed(String),

    /// Talking to the name servers failed.
    Io(Arc<io::Error>),
}

impl From<io::Error> for LookupError {
    fn from(err: io::Error) -> Self {
        LookupError::Io(Arc::new(err))
    }
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::BadName(name) => {
                write!(f, "invalid domain name '{}'", name)
            }
            LookupError::Negative(rcode) => {
                write!(f, "negative response ({})", rcode)
            }
            LookupError::NoRecords => f.write_str("no records found"),
            LookupError::Malformed(err) => {
                write!(f, "malformed response: {}", err)
            }
            LookupError::Io(err) => write!(f, "{}", err),
        }
    }
}

impl error::Error for LookupError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            LookupError::Io(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}
