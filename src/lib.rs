//! Blocking TCP and UDP sockets built from an inspectable list of
//! resolved address candidates.
//!
//! Resolution enumerates every candidate the system resolver returns for a
//! host/service pair, IPv4 and IPv6 alike; the caller inspects the list,
//! picks one by index, and a [`Listener`] binds and accepts on it or a
//! [`Connector`] connects to it, yielding a [`Connection`] with a
//! whole-buffer send guarantee.
//!
//! ```no_run
//! use candidate_sockets::{Connector, Listener, SocketType};
//!
//! # fn main() -> candidate_sockets::Result<()> {
//! let mut server = Listener::new();
//! server.setup("3490", SocketType::Stream)?;
//! server.start(0)?;
//!
//! let mut client = Connector::new();
//! client.setup("127.0.0.1", "3490", SocketType::Stream)?;
//! let conn = client.connect(0)?;
//! conn.send(b"hello")?;
//!
//! let accepted = server.accept()?;
//! let mut buf = [0u8; 5];
//! accepted.recv(&mut buf)?;
//! # Ok(())
//! # }
//! ```


mod error;
pub use error::{Error, Result};

pub mod addr;
pub mod connection;
pub mod connector;
pub mod listener;
pub mod params;
pub mod resolver;

pub use addr::{AddrCandidate, CandidateIp, CandidateList};
pub use connection::Connection;
pub use connector::Connector;
pub use listener::{DEFAULT_BACKLOG, Listener};
pub use params::{AddrFamily, Protocol, ResolveFlag, SocketType};
pub use resolver::{ResolveOpts, resolve};
