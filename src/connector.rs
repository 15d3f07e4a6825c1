//! Client-role endpoint: resolve a remote host, connect to a chosen
//! candidate.

use socket2::Socket;
use tracing::debug;

use crate::Error;
use crate::addr::CandidateList;
use crate::connection::Connection;
use crate::params::SocketType;
use crate::resolver::{ResolveOpts, resolve};

/// A connecting endpoint. Owns the candidate list from its last
/// resolution; sockets it creates are handed to the returned
/// [`Connection`], which closes them on drop. A failed connect closes the
/// socket on the way out and leaves the endpoint immediately reusable.
#[derive(Default)]
pub struct Connector {
    candidates: CandidateList,
}

impl Connector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `host`/`service` for connecting. No passive flag: the OS
    /// picks the local binding at connect time.
    pub fn setup(
        &mut self,
        host: &str,
        service: &str,
        socket_type: SocketType,
    ) -> crate::Result<()> {
        self.candidates = resolve(
            Some(host),
            service,
            ResolveOpts {
                socket_type,
                ..Default::default()
            },
        )?;
        Ok(())
    }

    pub fn candidates(&self) -> &CandidateList {
        &self.candidates
    }

    /// Connect to the candidate at `index`. Fails without any OS call when
    /// the index is out of range. The returned connection's peer identity
    /// is the candidate exactly as resolved, not re-queried from the OS:
    /// the connecting side already knows who it dialed.
    pub fn connect(&self, index: usize) -> crate::Result<Connection> {
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

        let addr = candidate.socket_addr();
        socket
            .connect(&addr.into())
            .map_err(|source| Error::Connect { addr, source })?;

        debug!(?addr, "connected");
        Ok(Connection::new(
            socket,
            candidate.family,
            candidate.port,
            candidate.ip,
        ))
    }
}
