//! Finding the address and port of a server.
//!
//! Game clients locate a server in one of two ways. If the domain has an
//! SRV record for the `_minecraft._tcp` service, its target and port are
//! used. Otherwise the domain’s own A record is used together with the
//! [default port][crate::DEFAULT_PORT].
//!
//! [`resolve`] implements this. Both lookups are started at the same time
//! so that the fallback does not add the latency of a second round trip,
//! and both run against the same deadline. The actual DNS queries are
//! performed by a [`Lookup`]; [`StubLookup`] uses the system’s name
//! servers.

pub use self::lookup::{Lookup, LookupError};
pub use self::stub::StubLookup;

use crate::error::Error;
use std::fmt;
use std::time::Duration;
use tracing::{debug, trace};

mod lookup;
mod stub;

/// The SRV service and protocol labels for game servers.
pub const SERVICE: &str = "_minecraft._tcp";

//------------ resolve -------------------------------------------------------

/// Resolves a domain name into a server location.
///
/// Starts an SRV lookup for `<service>.<domain>` and an A lookup for
/// `<domain>` and waits for them for at most `timeout` in total.
///
/// The SRV lookup takes precedence: if it produces a usable record, that
/// record’s target and port are returned no matter what happened to the
/// A lookup. If it fails, the first address of the A lookup is returned
/// with `default_port`. An SRV answer without any usable records counts
/// as a failure.
///
/// If the deadline passes before the SRV lookup has finished, or before
/// the A lookup has finished after the SRV lookup failed, the function
/// fails with [`Error::ResolutionTimeout`]. If both lookups fail, it
/// fails with [`Error::ResolutionFailure`] carrying the A lookup’s
/// error.
pub async fn resolve<L: Lookup + ?Sized>(
    lookup: &L,
    domain: &str,
    service: &str,
    default_port: u16,
    timeout: Duration,
) -> Result<ServerLocation, Error> {
    let domain = domain.trim_end_matches('.');
    let srv_name = format!("{}.{}", service, domain);

    let deadline = tokio::time::sleep(timeout);
    let srv = lookup.lookup_srv(&srv_name);
    let ipv4 = lookup.lookup_ipv4(domain);
    tokio::pin!(deadline, srv, ipv4);

    let mut srv_err: Option<LookupError> = None;
    let mut ipv4_res = None;
    loop {
        tokio::select! {
            biased;
            res = &mut srv, if srv_err.is_none() => {
                match res.map(first_usable) {
                    Ok(Some(record)) => {
                        trace!(
                            "{} has SRV record {}:{}",
                            srv_name, record.target(), record.port()
                        );
                        return Ok(ServerLocation::new(
                            record.target, record.port,
                        ));
                    }
                    Ok(None) => srv_err = Some(LookupError::NoRecords),
                    Err(err) => srv_err = Some(err),
                }
            }
            res = &mut ipv4, if ipv4_res.is_none() => {
                ipv4_res = Some(res);
            }
            _ = &mut deadline => {
                debug!("resolving {} timed out after {:?}", domain, timeout);
                return Err(Error::ResolutionTimeout);
            }
        }

        let Some(srv_err) = srv_err.as_ref() else {
            continue;
        };
        let Some(res) = ipv4_res.take() else {
            continue;
        };
        debug!(
            "no SRV record for {} ({}), falling back to A record",
            srv_name, srv_err
        );
        return match res {
            Ok(addrs) => match addrs.first() {
                Some(addr) => {
                    Ok(ServerLocation::new(addr.to_string(), default_port))
                }
                None => {
                    Err(Error::ResolutionFailure(LookupError::NoRecords))
                }
            },
            Err(err) => {
                debug!("A lookup for {} failed: {}", domain, err);
                Err(Error::ResolutionFailure(err))
            }
        };
    }
}

/// Returns the first record that actually points somewhere.
fn first_usable(records: Vec<ServiceRecord>) -> Option<ServiceRecord> {
    records.into_iter().find(ServiceRecord::is_usable)
}

//------------ ServerLocation ------------------------------------------------

/// The host and port a server can be reached at.
///
/// Locations produced by [`resolve`] always have a non-zero port. A
/// location built by hand with port 0 is refused when probing.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServerLocation {
    host: String,
    port: u16,
}

impl ServerLocation {
    /// Creates a new location from a host name or address and a port.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        ServerLocation {
            host: host.into(),
            port,
        }
    }

    /// Returns the host name or address.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for ServerLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

//------------ ServiceRecord -------------------------------------------------

/// The parts of an SRV record needed to reach a server.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServiceRecord {
    target: String,
    port: u16,
}

impl ServiceRecord {
    /// Creates a new record.
    ///
    /// A trailing dot in `target` is removed.
    pub fn new(target: impl Into<String>, port: u16) -> Self {
        let mut target = target.into();
        while target.ends_with('.') {
            target.pop();
        }
        ServiceRecord { target, port }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns whether the record points to an actual host and port.
    ///
    /// RFC 2782 uses the root name as target to say that the service is
    /// decidedly not available. Port 0 can’t be connected to either.
    pub fn is_usable(&self) -> bool {
        !self.target.is_empty() && self.port != 0
    }
}

//============ Testing =======================================================
