//! Locating game servers and querying their status.
//!
//! This crate answers a simple question: given the domain name a player
//! would type into a game client, what is the server behind it currently
//! reporting about itself? Getting there takes two steps, each of which
//! lives in its own module:
//!
//! * [resolv] turns a domain name into a concrete host and port. It asks
//!   the DNS for a `_minecraft._tcp` SRV record and falls back to the
//!   domain’s A record paired with the default port. Both queries are
//!   started at once and share a single deadline.
//! * [probe] connects to that host and port, sends the fixed legacy
//!   server list ping and decodes the first response it receives into a
//!   [`ServerStatus`].
//!
//! The [client] module ties the two together. Most users will only ever
//! need the two functions re-exported at the top of the crate:
//!
//! ```no_run
//! # async fn run() -> Result<(), mcstatus::Error> {
//! let status = mcstatus::get_server_information_from_dns("mc.example.com").await?;
//! println!("{} players online", status.player_count().unwrap_or(0));
//!
//! let status = mcstatus::get_server_information(
//!     "192.0.2.1", mcstatus::DEFAULT_PORT
//! ).await?;
//! println!("{:?}", status.motd());
//! # Ok(())
//! # }
//! ```
//!
//! If you need to query many servers or want to change timeouts, create a
//! [`StatusClient`] once and reuse it.
//!
//! # Reference of Feature Flags
//!
//! * `serde`: Enables serde serialization for [`ServerStatus`] and
//!   [`ServerLocation`].
//! * `demo`: Pulls in `tracing-subscriber` for the `status` demo program.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub use self::client::{
    get_server_information, get_server_information_from_dns, Config,
    StatusClient,
};
pub use self::error::Error;
pub use self::probe::ServerStatus;
pub use self::resolv::ServerLocation;

pub mod client;
pub mod error;
pub mod probe;
pub mod resolv;
pub mod utils;

/// The port a server listens on if nobody tells us otherwise.
pub const DEFAULT_PORT: u16 = 25565;
