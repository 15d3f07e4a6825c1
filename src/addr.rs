//! Resolved address candidates.
//!
//! All model fields are host byte order; network byte order only exists at
//! the OS boundary, applied by the `socket2::SockAddr` conversions. IPv6
//! flow-info and scope-id are carried exactly as the resolver produced
//! them and are never byte-swapped.

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6};

use crate::params::{AddrFamily, Protocol, ResolveFlag, SocketType};

/// Family-dispatched address payload of a candidate. Reading the other
/// family's form yields the zero value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CandidateIp {
    V4(Ipv4Addr),
    V6 {
        addr: Ipv6Addr,
        flowinfo: u32,
        scope_id: u32,
    },
}

impl CandidateIp {
    pub fn v4(&self) -> Ipv4Addr {
        match self {
            CandidateIp::V4(addr) => *addr,
            CandidateIp::V6 { .. } => Ipv4Addr::UNSPECIFIED,
        }
    }

    pub fn v6(&self) -> (Ipv6Addr, u32, u32) {
        match self {
            CandidateIp::V4(_) => (Ipv6Addr::UNSPECIFIED, 0, 0),
            CandidateIp::V6 {
                addr,
                flowinfo,
                scope_id,
            } => (*addr, *flowinfo, *scope_id),
        }
    }
}

/// One resolvable endpoint as returned by name resolution. Immutable after
/// the resolver produces it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddrCandidate {
    pub flags: ResolveFlag,
    pub family: AddrFamily,
    pub socket_type: SocketType,
    pub protocol: Protocol,
    /// Port in host byte order.
    pub port: u16,
    pub ip: CandidateIp,
    /// Only present when canonical-name resolution was requested and the
    /// resolver returned one (the first record of a lookup).
    pub canonical_name: Option<String>,
}

impl AddrCandidate {
    /// Build a candidate for a caller-supplied target, e.g. for
    /// [`Connection::send_to`](crate::Connection::send_to).
    pub fn from_socket_addr(addr: SocketAddr) -> Self {
        let (family, ip) = match addr {
            SocketAddr::V4(v4) => (AddrFamily::Ipv4, CandidateIp::V4(*v4.ip())),
            SocketAddr::V6(v6) => (
                AddrFamily::Ipv6,
                CandidateIp::V6 {
                    addr: *v6.ip(),
                    flowinfo: v6.flowinfo(),
                    scope_id: v6.scope_id(),
                },
            ),
        };
        Self {
            flags: ResolveFlag::default(),
            family,
            socket_type: SocketType::default(),
            protocol: Protocol::default(),
            port: addr.port(),
            ip,
            canonical_name: None,
        }
    }

    /// The bind/connect-time encoding of this candidate. Dispatches on the
    /// family field: IPv4 encodes a `SocketAddrV4`, anything else the
    /// IPv6 form, with flow-info and scope-id passed through unswapped.
    pub fn socket_addr(&self) -> SocketAddr {
        match self.family {
            AddrFamily::Ipv4 => SocketAddr::V4(SocketAddrV4::new(self.ip.v4(), self.port)),
            _ => {
                let (addr, flowinfo, scope_id) = self.ip.v6();
                SocketAddr::V6(SocketAddrV6::new(addr, self.port, flowinfo, scope_id))
            }
        }
    }
}

/// Ordered candidate list, insertion order identical to resolver output.
/// No reordering, no dedup; callers select an entry by index.
#[derive(Clone, Debug, Default)]
pub struct CandidateList {
    entries: Vec<AddrCandidate>,
}

impl CandidateList {
    pub(crate) fn new(entries: Vec<AddrCandidate>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AddrCandidate> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AddrCandidate> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a CandidateList {
    type Item = &'a AddrCandidate;
    type IntoIter = std::slice::Iter<'a, AddrCandidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v4_candidate(ip: Ipv4Addr, port: u16) -> AddrCandidate {
        AddrCandidate::from_socket_addr(SocketAddr::V4(SocketAddrV4::new(ip, port)))
    }

    fn v6_candidate(ip: Ipv6Addr, port: u16, flowinfo: u32, scope_id: u32) -> AddrCandidate {
        AddrCandidate::from_socket_addr(SocketAddr::V6(SocketAddrV6::new(
            ip, port, flowinfo, scope_id,
        )))
    }

    #[test]
    fn test_encode_decode_round_trip_v4() {
        let candidate = v4_candidate(Ipv4Addr::new(192, 168, 1, 7), 50007);
        let encoded = socket2::SockAddr::from(candidate.socket_addr());
        let decoded = encoded.as_socket().unwrap();
        assert_eq!(decoded, candidate.socket_addr());
        assert_eq!(decoded.port(), 50007);
    }

    #[test]
    fn test_encode_decode_round_trip_v6() {
        let ip = Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 0x42);
        let candidate = v6_candidate(ip, 50007, 0xdead, 3);
        let encoded = socket2::SockAddr::from(candidate.socket_addr());
        let decoded = encoded.as_socket().unwrap();
        match decoded {
            SocketAddr::V6(v6) => {
                assert_eq!(*v6.ip(), ip);
                assert_eq!(v6.port(), 50007);
                assert_eq!(v6.flowinfo(), 0xdead);
                assert_eq!(v6.scope_id(), 3);
            }
            SocketAddr::V4(_) => panic!("decoded as IPv4"),
        }
    }

    #[test]
    fn test_unused_family_reads_as_zero() {
        let v4 = v4_candidate(Ipv4Addr::LOCALHOST, 80);
        assert_eq!(v4.ip.v6(), (Ipv6Addr::UNSPECIFIED, 0, 0));

        let v6 = v6_candidate(Ipv6Addr::LOCALHOST, 80, 1, 2);
        assert_eq!(v6.ip.v4(), Ipv4Addr::UNSPECIFIED);
    }

    #[test]
    fn test_from_socket_addr_defaults() {
        let candidate = v4_candidate(Ipv4Addr::LOCALHOST, 8080);
        assert_eq!(candidate.family, AddrFamily::Ipv4);
        assert_eq!(candidate.socket_type, SocketType::Stream);
        assert_eq!(candidate.protocol, Protocol::Any);
        assert!(candidate.canonical_name.is_none());
    }

    #[test]
    fn test_list_indexing() {
        let list = CandidateList::new(vec![
            v4_candidate(Ipv4Addr::LOCALHOST, 1),
            v6_candidate(Ipv6Addr::LOCALHOST, 2, 0, 0),
        ]);
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(0).unwrap().port, 1);
        assert_eq!(list.get(1).unwrap().port, 2);
        assert!(list.get(2).is_none());
    }
}
