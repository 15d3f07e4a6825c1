//! Name resolution producing an inspectable candidate list.
//!
//! Wraps the system resolver. The native `addrinfo` list is translated
//! record by record in the order the resolver returned it and freed before
//! this module returns; it never escapes.

use std::ffi::{CStr, CString};

use tracing::{debug, trace};

use crate::Error;
use crate::addr::{AddrCandidate, CandidateIp, CandidateList};
use crate::params::{AddrFamily, Protocol, ResolveFlag, SocketType};

#[derive(Clone, Copy, Debug, Default)]
pub struct ResolveOpts {
    pub socket_type: SocketType,
    /// Resolve for binding to local interfaces. Only meaningful together
    /// with a `None` host.
    pub passive: bool,
    /// Request the canonical hostname of the target.
    pub canonical_name: bool,
}

struct AddrInfoGuard(*mut libc::addrinfo);

impl Drop for AddrInfoGuard {
    fn drop(&mut self) {
        if !self.0.is_null() {
            unsafe { libc::freeaddrinfo(self.0) };
        }
    }
}

/// Resolve `host`/`service` into the full candidate list, both IPv4 and
/// IPv6, in resolver order. `host = None` with `opts.passive` resolves the
/// wildcard addresses for binding.
pub fn resolve(host: Option<&str>, service: &str, opts: ResolveOpts) -> crate::Result<CandidateList> {
    let host_c = host
        .map(CString::new)
        .transpose()
        .map_err(|_| Error::Resolve("host contains an interior NUL".to_owned()))?;
    let service_c = CString::new(service)
        .map_err(|_| Error::Resolve("service contains an interior NUL".to_owned()))?;

    let mut flags = 0;
    if opts.passive {
        flags |= ResolveFlag::Passive.to_raw();
    }
    if opts.canonical_name {
        flags |= ResolveFlag::CanonicalName.to_raw();
    }

    let mut hints: libc::addrinfo = unsafe { std::mem::zeroed() };
    hints.ai_family = AddrFamily::Unspecified.to_raw();
    hints.ai_socktype = opts.socket_type.to_raw();
    hints.ai_flags = flags;

    trace!(?host, service, ?opts, "resolving");

    let mut info: *mut libc::addrinfo = std::ptr::null_mut();
    let status = unsafe {
        libc::getaddrinfo(
            host_c.as_ref().map_or(std::ptr::null(), |h| h.as_ptr()),
            service_c.as_ptr(),
            &hints,
            &mut info,
        )
    };
    if status != 0 {
        let diagnostic = unsafe { CStr::from_ptr(libc::gai_strerror(status)) }
            .to_string_lossy()
            .into_owned();
        return Err(Error::Resolve(diagnostic));
    }
    let guard = AddrInfoGuard(info);

    let mut entries = Vec::new();
    let mut cur = guard.0;
    while !cur.is_null() {
        let ai = unsafe { &*cur };
        entries.push(translate(ai));
        cur = ai.ai_next;
    }

    debug!(count = entries.len(), "resolved");
    Ok(CandidateList::new(entries))
}

fn translate(ai: &libc::addrinfo) -> AddrCandidate {
    let family = AddrFamily::from_raw(ai.ai_family);

    let (port, ip) = match family {
        AddrFamily::Ipv4 if !ai.ai_addr.is_null() => {
            let sa = unsafe { &*(ai.ai_addr as *const libc::sockaddr_in) };
            (
                u16::from_be(sa.sin_port),
                CandidateIp::V4(u32::from_be(sa.sin_addr.s_addr).into()),
            )
        }
        AddrFamily::Ipv6 if !ai.ai_addr.is_null() => {
            let sa = unsafe { &*(ai.ai_addr as *const libc::sockaddr_in6) };
            (
                u16::from_be(sa.sin6_port),
                CandidateIp::V6 {
                    addr: sa.sin6_addr.s6_addr.into(),
                    // Already in the representation the OS hands out, not
                    // swapped on the way in or out.
                    flowinfo: sa.sin6_flowinfo,
                    scope_id: sa.sin6_scope_id,
                },
            )
        }
        _ => (0, CandidateIp::V4(std::net::Ipv4Addr::UNSPECIFIED)),
    };

    let canonical_name = if ai.ai_canonname.is_null() {
        None
    } else {
        Some(
            unsafe { CStr::from_ptr(ai.ai_canonname) }
                .to_string_lossy()
                .into_owned(),
        )
    };

    AddrCandidate {
        flags: ResolveFlag::from_raw(ai.ai_flags),
        family,
        socket_type: SocketType::from_raw(ai.ai_socktype),
        protocol: Protocol::from_raw(ai.ai_protocol),
        port,
        ip,
        canonical_name,
    }
}
