//! The error type of the crate.

use crate::resolv::LookupError;
use std::error;
use std::fmt;
use std::io;
use std::sync::Arc;

//------------ Error ---------------------------------------------------------

/// Why asking a server for its status failed.
///
/// There are exactly two ways for each of the two steps of a status
/// query to fail: either they ran out of time or something went wrong
/// before that. A response that decodes into nonsense is not an error;
/// it ends up in an odd [`ServerStatus`][crate::ServerStatus] instead.
#[derive(Clone, Debug)]
pub enum Error {
    /// The shared deadline expired while resolving the domain name.
    ResolutionTimeout,

    /// Both the SRV and the A lookup failed.
    ///
    /// The contained error describes why the A lookup failed since that
    /// is the last thing that was tried.
    ResolutionFailure(LookupError),

    /// The server did not answer within the inactivity window.
    ProbeTimeout,

    /// Connecting to, writing to, or reading from the server failed.
    ProbeTransport(Arc<io::Error>),
}

impl Error {
    /// Creates a transport error from an IO error.
    pub(crate) fn transport(err: io::Error) -> Self {
        Error::ProbeTransport(Arc::new(err))
    }

    /// Returns whether the error was caused by running out of time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::ResolutionTimeout | Error::ProbeTimeout)
    }

    /// Returns whether the error happened while resolving the domain.
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            Error::ResolutionTimeout | Error::ResolutionFailure(_)
        )
    }
}

//--- Display and Error

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ResolutionTimeout => {
                f.write_str("timed out while resolving the server address")
            }
            Error::ResolutionFailure(err) => {
                write!(f, "failed to resolve the server address: {}", err)
            }
            Error::ProbeTimeout => {
                f.write_str("timed out waiting for the server to respond")
            }
            Error::ProbeTransport(err) => {
                write!(f, "connection to the server failed: {}", err)
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::ResolutionTimeout => None,
            Error::ResolutionFailure(err) => Some(err),
            Error::ProbeTimeout => None,
            Error::ProbeTransport(err) => Some(err.as_ref()),
        }
    }
}

//============ Testing =======================================================
