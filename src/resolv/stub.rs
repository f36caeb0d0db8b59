//! Lookups through the system’s name servers.

use super::lookup::{Lookup, LookupError};
use super::ServiceRecord;
use bytes::Bytes;
use domain::base::iana::Rtype;
use domain::base::name::Name;
use domain::base::Message;
use domain::base::wire::ParseError;
use domain::rdata::{Srv, A};
use domain::resolv::stub::conf::ResolvConf;
use domain::resolv::stub::Answer;
use domain::resolv::StubResolver;
use std::fmt;
use std::future::Future;
use std::net::Ipv4Addr;
use std::pin::Pin;
use std::str::FromStr;
use std::sync::Arc;
use tracing::trace;

//------------ StubLookup ----------------------------------------------------

/// A [`Lookup`] asking the configured name servers via a stub resolver.
///
/// Values can be cloned cheaply; clones share the same resolver.
#[derive(Clone)]
pub struct StubLookup {
    resolver: Arc<StubResolver>,
}

impl StubLookup {
    /// Creates a new lookup using the system’s default configuration.
    pub fn new() -> Self {
        Self::from_resolver(StubResolver::new())
    }

    /// Creates a new lookup using the given resolver configuration.
    pub fn from_conf(conf: ResolvConf) -> Self {
        Self::from_resolver(StubResolver::from_conf(conf))
    }

    /// Creates a new lookup using an existing stub resolver.
    pub fn from_resolver(resolver: StubResolver) -> Self {
        StubLookup {
            resolver: Arc::new(resolver),
        }
    }

    /// Asks a single question and weeds out error responses.
    async fn query(
        &self,
        qname: &str,
        rtype: Rtype,
    ) -> Result<Answer, LookupError> {
        let name = Name::<Vec<u8>>::from_str(qname)
            .map_err(|_| LookupError::BadName(qname.into()))?;
        trace!("querying {} {}", qname, rtype);
        let answer = self.resolver.query((name, rtype)).await?;
        check_rcode(&answer)?;
        Ok(answer)
    }
}

impl Default for StubLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StubLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StubLookup").finish_non_exhaustive()
    }
}

impl Lookup for StubLookup {
    type Srv<'a> = Pin<
        Box<
            dyn Future<Output = Result<Vec<ServiceRecord>, LookupError>>
                + Send
                + 'a,
        >,
    >;
    type Ipv4<'a> = Pin<
        Box<
            dyn Future<Output = Result<Vec<Ipv4Addr>, LookupError>>
                + Send
                + 'a,
        >,
    >;

    fn lookup_srv<'a>(&'a self, qname: &str) -> Self::Srv<'a> {
        let qname = qname.to_string();
        Box::pin(async move {
            let answer = self.query(&qname, Rtype::SRV).await?;
            service_records(&answer)
        })
    }

    fn lookup_ipv4<'a>(&'a self, qname: &str) -> Self::Ipv4<'a> {
        let qname = qname.to_string();
        Box::pin(async move {
            let answer = self.query(&qname, Rtype::A).await?;
            ipv4_addrs(&answer)
        })
    }
}

//------------ Reading Answers -----------------------------------------------

/// Turns an error rcode into a negative lookup result.
fn check_rcode(msg: &Message<Bytes>) -> Result<(), LookupError> {
    if msg.is_error() {
        return Err(LookupError::Negative(msg.header().rcode().to_string()));
    }
    Ok(())
}

/// Collects the SRV records from the answer section.
///
/// Records of other types, such as the CNAMEs of an alias chain, are
/// skipped.
fn service_records(
    msg: &Message<Bytes>,
) -> Result<Vec<ServiceRecord>, LookupError> {
    let mut res = Vec::new();
    for record in msg.answer()?.limit_to::<Srv<_>>() {
        let record = record?;
        let data = record.data();
        res.push(ServiceRecord::new(data.target().to_string(), data.port()));
    }
    Ok(res)
}

/// Collects the IPv4 addresses from the answer section.
fn ipv4_addrs(msg: &Message<Bytes>) -> Result<Vec<Ipv4Addr>, LookupError> {
    let mut res = Vec::new();
    for record in msg.answer()?.limit_to::<A>() {
        res.push(record?.data().addr());
    }
    Ok(res)
}

//------------ From<ParseError> for LookupError ------------------------------

impl From<ParseError> for LookupError {
    fn from(err: ParseError) -> Self {
        LookupError::Malformed(err.to_string())
    }
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;
    use domain::base::iana::Rcode;
    use domain::base::MessageBuilder;
    use domain::rdata::Cname;

    fn name(s: &str) -> Name<Vec<u8>> {
        Name::from_str(s).unwrap()
    }

    /// Builds a response with the given rcode and no records.
    fn empty(rcode: Rcode) -> Message<Bytes> {
        let mut msg = MessageBuilder::new_bytes();
        msg.header_mut().set_qr(true);
        msg.header_mut().set_rcode(rcode);
        msg.into_message()
    }

    /// Builds a response with SRV records for the given targets and ports.
    fn srv(records: &[(&str, u16)]) -> Message<Bytes> {
        let owner = name("_minecraft._tcp.mc.example.com.");
        let mut msg = MessageBuilder::new_bytes();
        msg.header_mut().set_qr(true);
        let mut msg = msg.answer();
        for (target, port) in records {
            msg.push((&owner, 300, Srv::new(0, 5, *port, name(target))))
                .unwrap();
        }
        msg.into_message()
    }

    #[test]
    fn error_rcode_is_negative() {
        match check_rcode(&empty(Rcode::NXDOMAIN)) {
            Err(LookupError::Negative(rcode)) => assert_eq!(rcode, "NXDOMAIN"),
            res => panic!("unexpected result {:?}", res),
        }
        assert!(check_rcode(&empty(Rcode::NOERROR)).is_ok());
    }

    #[test]
    fn no_records() {
        let msg = empty(Rcode::NOERROR);
        assert_eq!(service_records(&msg).unwrap(), []);
        assert_eq!(ipv4_addrs(&msg).unwrap(), [] as [Ipv4Addr; 0]);
    }

    #[test]
    fn srv_records() {
        let records = service_records(&srv(&[
            ("play.example.net.", 25577),
            ("backup.example.net.", 25578),
        ]))
        .unwrap();
        assert_eq!(
            records,
            [
                ServiceRecord::new("play.example.net", 25577),
                ServiceRecord::new("backup.example.net", 25578),
            ]
        );
        assert!(records[0].is_usable());
    }

    #[test]
    fn root_srv_target_is_unusable() {
        let records = service_records(&srv(&[(".", 25565)])).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].target(), "");
        assert!(!records[0].is_usable());
    }

    #[test]
    fn a_records_skip_aliases() {
        let owner = name("mc.example.com.");
        let mut msg = MessageBuilder::new_bytes();
        msg.header_mut().set_qr(true);
        let mut msg = msg.answer();
        msg.push((&owner, 300, Cname::new(name("host.example.net."))))
            .unwrap();
        msg.push((
            name("host.example.net."),
            300,
            A::new(Ipv4Addr::new(192, 0, 2, 7)),
        ))
        .unwrap();
        let msg = msg.into_message();
        assert_eq!(ipv4_addrs(&msg).unwrap(), [Ipv4Addr::new(192, 0, 2, 7)]);
        assert_eq!(service_records(&msg).unwrap(), []);
    }

    #[test]
    fn truncated_answer_is_malformed() {
        let msg = srv(&[("play.example.net.", 25577)]);
        let octets = msg.as_slice();
        let short = Bytes::copy_from_slice(&octets[..octets.len() - 4]);
        let msg = Message::from_octets(short).unwrap();
        assert!(matches!(
            service_records(&msg),
            Err(LookupError::Malformed(_))
        ));
    }
}
