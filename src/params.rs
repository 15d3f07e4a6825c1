//! Portable socket parameters and their mapping to platform constants.
//!
//! Every mapping is total in both directions: an unrecognized value on
//! either side maps to the default variant / default constant instead of
//! erroring. Callers rely on this lenient behavior when inspecting
//! resolver output on platforms with extra flags set.

use libc::{AF_INET, AF_INET6, AF_UNSPEC, AI_CANONNAME, AI_PASSIVE, SOCK_DGRAM, SOCK_STREAM};
use socket2::Domain;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResolveFlag {
    #[default]
    Passive,
    CanonicalName,
}

impl ResolveFlag {
    pub fn to_raw(self) -> libc::c_int {
        match self {
            ResolveFlag::Passive => AI_PASSIVE,
            ResolveFlag::CanonicalName => AI_CANONNAME,
        }
    }

    pub fn from_raw(raw: libc::c_int) -> Self {
        match raw {
            AI_PASSIVE => ResolveFlag::Passive,
            AI_CANONNAME => ResolveFlag::CanonicalName,
            _ => ResolveFlag::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AddrFamily {
    #[default]
    Unspecified,
    Ipv4,
    Ipv6,
}

impl AddrFamily {
    pub fn to_raw(self) -> libc::c_int {
        match self {
            AddrFamily::Unspecified => AF_UNSPEC,
            AddrFamily::Ipv4 => AF_INET,
            AddrFamily::Ipv6 => AF_INET6,
        }
    }

    pub fn from_raw(raw: libc::c_int) -> Self {
        match raw {
            AF_UNSPEC => AddrFamily::Unspecified,
            AF_INET => AddrFamily::Ipv4,
            AF_INET6 => AddrFamily::Ipv6,
            _ => AddrFamily::default(),
        }
    }

    pub fn domain(self) -> Domain {
        match self {
            AddrFamily::Ipv4 => Domain::IPV4,
            AddrFamily::Ipv6 => Domain::IPV6,
            AddrFamily::Unspecified => Domain::from(AF_UNSPEC),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SocketType {
    #[default]
    Stream,
    Datagram,
}

impl SocketType {
    pub fn to_raw(self) -> libc::c_int {
        match self {
            SocketType::Stream => SOCK_STREAM,
            SocketType::Datagram => SOCK_DGRAM,
        }
    }

    pub fn from_raw(raw: libc::c_int) -> Self {
        match raw {
            SOCK_STREAM => SocketType::Stream,
            SOCK_DGRAM => SocketType::Datagram,
            _ => SocketType::default(),
        }
    }

    pub fn socket2_type(self) -> socket2::Type {
        match self {
            SocketType::Stream => socket2::Type::STREAM,
            SocketType::Datagram => socket2::Type::DGRAM,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Protocol {
    #[default]
    Any,
}

impl Protocol {
    pub fn to_raw(self) -> libc::c_int {
        match self {
            Protocol::Any => 0,
        }
    }

    pub fn from_raw(_raw: libc::c_int) -> Self {
        Protocol::Any
    }

    pub fn socket2_protocol(self) -> Option<socket2::Protocol> {
        match self.to_raw() {
            0 => None,
            p => Some(socket2::Protocol::from(p)),
        }
    }
}
