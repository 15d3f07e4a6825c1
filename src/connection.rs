//! An established socket after a successful accept or connect.

use std::io;
use std::mem::MaybeUninit;
use std::net::SocketAddr;

use socket2::{SockAddr, Socket};
use tracing::trace;

use crate::Error;
use crate::addr::{AddrCandidate, CandidateIp};
use crate::params::AddrFamily;

/// A connected socket. Exclusively owns its descriptor; dropping the
/// `Connection` is the one place it gets closed.
pub struct Connection {
    socket: Socket,
    family: AddrFamily,
    port: u16,
    ip: CandidateIp,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("peer", &self.peer_addr())
            .finish_non_exhaustive()
    }
}

// socket2 reads into MaybeUninit buffers; our callers hand us initialized
// ones, and the kernel only ever writes initialized bytes.
fn as_uninit(buf: &mut [u8]) -> &mut [MaybeUninit<u8>] {
    unsafe { &mut *(buf as *mut [u8] as *mut [MaybeUninit<u8>]) }
}

/// Send the whole buffer through `send`, retrying the remaining tail after
/// every partial write. Returns the full length, or the failure together
/// with how many bytes had gone out before it.
pub(crate) fn send_all(
    buf: &[u8],
    mut send: impl FnMut(&[u8]) -> io::Result<usize>,
) -> crate::Result<usize> {
    let mut sent = 0;
    while sent < buf.len() {
        match send(&buf[sent..]) {
            Ok(n) => sent += n,
            Err(source) => return Err(Error::Send { sent, source }),
        }
    }
    Ok(sent)
}

impl Connection {
    pub(crate) fn new(socket: Socket, family: AddrFamily, port: u16, ip: CandidateIp) -> Self {
        Self {
            socket,
            family,
            port,
            ip,
        }
    }

    /// Build a connection from an accepted descriptor and the peer address
    /// the OS reported for it.
    pub(crate) fn from_peer(socket: Socket, peer: SocketAddr) -> Self {
        let (family, ip) = match peer {
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
        Self::new(socket, family, peer.port(), ip)
    }

    pub fn peer_family(&self) -> AddrFamily {
        self.family
    }

    /// Peer port in host byte order.
    pub fn peer_port(&self) -> u16 {
        self.port
    }

    pub fn peer_ip(&self) -> CandidateIp {
        self.ip
    }

    pub fn peer_addr(&self) -> SocketAddr {
        match self.family {
            AddrFamily::Ipv4 => SocketAddr::from((self.ip.v4(), self.port)),
            _ => {
                let (addr, flowinfo, scope_id) = self.ip.v6();
                SocketAddr::V6(std::net::SocketAddrV6::new(
                    addr, self.port, flowinfo, scope_id,
                ))
            }
        }
    }

    /// The local endpoint the OS chose for this socket.
    pub fn local_addr(&self) -> crate::Result<SocketAddr> {
        self.socket
            .local_addr()
            .map_err(Error::LocalAddr)?
            .as_socket()
            .ok_or(Error::PeerAddr)
    }

    /// Blocking send of the entire buffer. Either all of `buf` goes out and
    /// `buf.len()` is returned, or the first failing underlying send is
    /// reported. Partial progress is never silently returned.
    pub fn send(&self, buf: &[u8]) -> crate::Result<usize> {
        send_all(buf, |tail| self.socket.send(tail))
    }

    /// A single blocking receive. Returns the OS-reported count; 0 means
    /// the peer closed the connection. Never loops to fill the buffer.
    pub fn recv(&self, buf: &mut [u8]) -> crate::Result<usize> {
        self.socket.recv(as_uninit(buf)).map_err(Error::Recv)
    }

    /// Connectionless variant of [`send`](Self::send): the whole buffer to
    /// `target`, with the same retry-the-tail contract.
    pub fn send_to(&self, target: &AddrCandidate, buf: &[u8]) -> crate::Result<usize> {
        let addr = SockAddr::from(target.socket_addr());
        trace!(target = ?target.socket_addr(), "sending");
        send_all(buf, |tail| self.socket.send_to(tail, &addr))
    }

    /// A single blocking receive, returning the sender's address alongside
    /// the count.
    pub fn recv_from(&self, buf: &mut [u8]) -> crate::Result<(usize, SocketAddr)> {
        let (n, addr) = self.socket.recv_from(as_uninit(buf)).map_err(Error::Recv)?;
        let addr = addr.as_socket().ok_or(Error::PeerAddr)?;
        Ok((n, addr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_all_full_write() {
        let sent = send_all(b"hello", |tail| Ok(tail.len())).unwrap();
        assert_eq!(sent, 5);
    }

    #[test]
    fn test_send_all_empty_buffer_makes_no_calls() {
        let mut calls = 0;
        let sent = send_all(b"", |_| {
            calls += 1;
            Ok(0)
        })
        .unwrap();
        assert_eq!(sent, 0);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_send_all_retries_partial_writes() {
        let payload: Vec<u8> = (0..100u8).collect();
        let mut written = Vec::new();
        let sent = send_all(&payload, |tail| {
            let n = tail.len().min(7);
            written.extend_from_slice(&tail[..n]);
            Ok(n)
        })
        .unwrap();
        assert_eq!(sent, payload.len());
        assert_eq!(written, payload);
    }

    #[test]
    fn test_send_all_reports_failure_with_progress() {
        let payload = [0u8; 64];
        let mut budget = 10usize;
        let err = send_all(&payload, |tail| {
            if budget == 0 {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "peer gone"));
            }
            let n = tail.len().min(4).min(budget);
            budget -= n;
            Ok(n)
        })
        .unwrap_err();
        match err {
            Error::Send { sent, source } => {
                assert_eq!(sent, 10);
                assert_eq!(source.kind(), io::ErrorKind::BrokenPipe);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
