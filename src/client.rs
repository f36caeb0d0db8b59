//! Querying servers by domain name or address.
//!
//! [`StatusClient`] combines [resolving][crate::resolv] a domain name with
//! [probing][crate::probe] the server found. It holds the lookup to use and
//! a [`Config`] with the timeouts and can be reused for any number of
//! queries.
//!
//! For one-off queries, [`get_server_information`] and
//! [`get_server_information_from_dns`] create a client with the default
//! configuration.

use crate::error::Error;
use crate::probe::{self, ServerStatus};
use crate::resolv::{self, Lookup, ServerLocation, StubLookup};
use crate::utils::config::DefMinMax;
use crate::DEFAULT_PORT;
use std::time::Duration;
use tracing::debug;

//------------ Configuration Constants ---------------------------------------

/// Time allowed for resolving a domain name.
const RESOLVE_TIMEOUT: DefMinMax<Duration> = DefMinMax::new(
    Duration::from_secs(5),
    Duration::from_millis(1),
    Duration::from_secs(600),
);

/// Time allowed for connecting to a server and receiving its response.
const IO_TIMEOUT: DefMinMax<Duration> = DefMinMax::new(
    Duration::from_secs(5),
    Duration::from_millis(1),
    Duration::from_secs(600),
);

//------------ get_server_information ----------------------------------------

/// Asks the server at the given address and port for its status.
///
/// The address can also be a host name. It is looked up through the
/// system’s resolver when connecting, SRV records are not considered.
/// Pass [`DEFAULT_PORT`] if you don’t know the port.
pub async fn get_server_information(
    address: &str,
    port: u16,
) -> Result<ServerStatus, Error> {
    StatusClient::new().status_at(address, port).await
}

/// Finds the server for a domain name and asks it for its status.
///
/// See [`resolv::resolve`] for how the domain name is turned into an
/// address and port.
pub async fn get_server_information_from_dns(
    domain: &str,
) -> Result<ServerStatus, Error> {
    StatusClient::new().status(domain).await
}

//------------ Config --------------------------------------------------------

/// Configuration for a status client.
#[derive(Clone, Debug)]
pub struct Config {
    /// Time allowed for resolving a domain name.
    resolve_timeout: Duration,

    /// Time allowed for connecting and receiving the response.
    io_timeout: Duration,

    /// The SRV service and protocol labels.
    service: String,

    /// The port used with A records.
    default_port: u16,
}

impl Config {
    /// Creates a new, default config.
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns the resolve timeout.
    ///
    /// This is the total amount of time both DNS lookups together may
    /// take.
    pub fn resolve_timeout(&self) -> Duration {
        self.resolve_timeout
    }

    /// Sets the resolve timeout.
    ///
    /// Excessive values are quietly trimmed.
    pub fn set_resolve_timeout(&mut self, value: Duration) {
        self.resolve_timeout = RESOLVE_TIMEOUT.limit(value)
    }

    /// Returns the IO timeout.
    ///
    /// This covers connecting to the server and waiting for its response.
    pub fn io_timeout(&self) -> Duration {
        self.io_timeout
    }

    /// Sets the IO timeout.
    ///
    /// Excessive values are quietly trimmed.
    pub fn set_io_timeout(&mut self, value: Duration) {
        self.io_timeout = IO_TIMEOUT.limit(value)
    }

    /// Returns the SRV service and protocol labels.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Sets the SRV service and protocol labels, e.g., `"_minecraft._tcp"`.
    pub fn set_service(&mut self, value: impl Into<String>) {
        self.service = value.into()
    }

    /// Returns the port used when falling back to A records.
    pub fn default_port(&self) -> u16 {
        self.default_port
    }

    /// Sets the port used when falling back to A records.
    ///
    /// Port 0 cannot be connected to and is ignored.
    pub fn set_default_port(&mut self, value: u16) {
        if value != 0 {
            self.default_port = value
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resolve_timeout: RESOLVE_TIMEOUT.default(),
            io_timeout: IO_TIMEOUT.default(),
            service: resolv::SERVICE.into(),
            default_port: DEFAULT_PORT,
        }
    }
}

//------------ StatusClient --------------------------------------------------

/// A client for querying server status.
#[derive(Clone, Debug)]
pub struct StatusClient<L = StubLookup> {
    /// The lookup used for resolving domain names.
    lookup: L,

    /// The configuration.
    config: Config,
}

impl StatusClient<StubLookup> {
    /// Creates a client using the system’s name servers and defaults.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a client using the system’s name servers.
    pub fn with_config(config: Config) -> Self {
        Self::from_parts(StubLookup::new(), config)
    }
}

impl Default for StatusClient<StubLookup> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Lookup> StatusClient<L> {
    /// Creates a client from a lookup and a configuration.
    pub fn from_parts(lookup: L, config: Config) -> Self {
        StatusClient { lookup, config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolves a domain name into the location of its server.
    pub async fn resolve(
        &self,
        domain: &str,
    ) -> Result<ServerLocation, Error> {
        resolv::resolve(
            &self.lookup,
            domain,
            &self.config.service,
            self.config.default_port,
            self.config.resolve_timeout,
        )
        .await
    }

    /// Finds the server for a domain name and asks it for its status.
    pub async fn status(&self, domain: &str) -> Result<ServerStatus, Error> {
        let location = self.resolve(domain).await?;
        debug!("{} resolved to {}", domain, location);
        self.status_of(&location).await
    }

    /// Asks the server at the given host and port for its status.
    pub async fn status_at(
        &self,
        host: &str,
        port: u16,
    ) -> Result<ServerStatus, Error> {
        self.status_of(&ServerLocation::new(host, port)).await
    }

    /// Asks the server at the given location for its status.
    pub async fn status_of(
        &self,
        location: &ServerLocation,
    ) -> Result<ServerStatus, Error> {
        probe::probe(location, self.config.io_timeout).await
    }
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = Config::new();
        assert_eq!(config.resolve_timeout(), Duration::from_secs(5));
        assert_eq!(config.io_timeout(), Duration::from_secs(5));
        assert_eq!(config.service(), "_minecraft._tcp");
        assert_eq!(config.default_port(), 25565);
    }

    #[test]
    fn config_limits() {
        let mut config = Config::new();
        config.set_resolve_timeout(Duration::ZERO);
        config.set_io_timeout(Duration::from_secs(86400));
        config.set_default_port(0);
        assert_eq!(config.resolve_timeout(), Duration::from_millis(1));
        assert_eq!(config.io_timeout(), Duration::from_secs(600));
        assert_eq!(config.default_port(), 25565);

        config.set_default_port(25577);
        config.set_service("_minecraft._udp");
        assert_eq!(config.default_port(), 25577);
        assert_eq!(config.service(), "_minecraft._udp");
    }
}
