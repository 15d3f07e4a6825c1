//! Server-role endpoint: resolve passively, bind a chosen candidate,
//! listen, accept.

use std::net::SocketAddr;

use socket2::Socket;
use tracing::{debug, trace};

use crate::Error;
use crate::addr::CandidateList;
use crate::connection::Connection;
use crate::params::SocketType;
use crate::resolver::{ResolveOpts, resolve};

pub const DEFAULT_BACKLOG: i32 = 10;

/// A listening endpoint. Owns the candidate list from its last passive
/// resolution and, once [`start`](Self::start) succeeds, the listening
/// socket. Dropping it closes the socket.
pub struct Listener {
    candidates: CandidateList,
    socket: Option<Socket>,
    backlog: i32,
}

impl Default for Listener {
    fn default() -> Self {
        Self::new()
    }
}

impl Listener {
    pub fn new() -> Self {
        Self::with_backlog(DEFAULT_BACKLOG)
    }

    pub fn with_backlog(backlog: i32) -> Self {
        Self {
            candidates: CandidateList::default(),
            socket: None,
            backlog,
        }
    }

    /// Listen backlog used by the next [`start`](Self::start).
    pub fn set_backlog(&mut self, backlog: i32) {
        self.backlog = backlog;
    }

    /// Resolve `service` passively (all local interfaces, both families).
    /// An endpoint that is already bound is closed first. On failure the
    /// previous candidate list is left untouched.
    pub fn setup(&mut self, service: &str, socket_type: SocketType) -> crate::Result<()> {
        if self.socket.is_some() {
            self.close();
        }
        self.candidates = resolve(
            None,
            service,
            ResolveOpts {
                socket_type,
                passive: true,
                ..Default::default()
            },
        )?;
        Ok(())
    }

    pub fn candidates(&self) -> &CandidateList {
        &self.candidates
    }

    pub fn is_bound(&self) -> bool {
        self.socket.is_some()
    }

    /// Bind and listen on the candidate at `index`. Fails without any OS
    /// call when already bound or when the index is out of range. Any
    /// failing step closes the new socket and leaves the endpoint unbound.
    pub fn start(&mut self, index: usize) -> crate::Result<()> {
        if self.socket.is_some() {
            return Err(Error::AlreadyBound);
        }
        let candidate = self.candidates.get(index).ok_or(Error::InvalidIndex {
            index,
            len: self.candidates.len(),
        })?;

        let socket = Socket::new(
            candidate.family.domain(),
            candidate.socket_type.socket2_type(),
            candidate.protocol.socket2_protocol(),
        )
        .map_err(Error::SocketNew)?;

        // Required so a restarted server can rebind a port still in
        // TIME_WAIT; failing to set it is a setup failure.
        socket.set_reuse_address(true).map_err(Error::ReuseAddress)?;

        let addr = candidate.socket_addr();
        socket
            .bind(&addr.into())
            .map_err(|source| Error::Bind { addr, source })?;
        socket.listen(self.backlog).map_err(Error::Listen)?;

        debug!(?addr, backlog = self.backlog, "listening");
        self.socket = Some(socket);
        Ok(())
    }

    /// Block until a peer connects, returning a [`Connection`] owning the
    /// accepted descriptor. An OS-level accept failure leaves the
    /// listening socket usable for further accepts.
    pub fn accept(&self) -> crate::Result<Connection> {
        let socket = self.socket.as_ref().ok_or(Error::NotBound)?;
        let (conn, peer) = socket.accept().map_err(Error::Accept)?;
        let peer = peer.as_socket().ok_or(Error::PeerAddr)?;
        trace!(?peer, "accepted");
        Ok(Connection::from_peer(conn, peer))
    }

    /// The address actually bound, e.g. the OS-chosen port after binding
    /// service "0".
    pub fn local_addr(&self) -> crate::Result<SocketAddr> {
        let socket = self.socket.as_ref().ok_or(Error::NotBound)?;
        socket
            .local_addr()
            .map_err(Error::LocalAddr)?
            .as_socket()
            .ok_or(Error::PeerAddr)
    }

    /// Close the listening socket and return to the unbound state. A no-op
    /// when already unbound. The candidate list is retained so `start` can
    /// be called again.
    pub fn close(&mut self) {
        if self.socket.take().is_some() {
            trace!("closed listener");
        }
    }
}
