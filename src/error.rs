use std::net::SocketAddr;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("resolution failed: {0}")]
    Resolve(String),
    #[error("candidate index {index} out of range, {len} candidates")]
    InvalidIndex { index: usize, len: usize },
    #[error("socket already bound")]
    AlreadyBound,
    #[error("socket not bound")]
    NotBound,
    #[error("error creating socket: {0}")]
    SocketNew(std::io::Error),
    #[error("error setting SO_REUSEADDR: {0}")]
    ReuseAddress(std::io::Error),
    #[error("error binding to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("error listening: {0}")]
    Listen(std::io::Error),
    #[error("error accepting: {0}")]
    Accept(std::io::Error),
    #[error("peer address is not an inet address")]
    PeerAddr,
    #[error("error connecting to {addr}: {source}")]
    Connect {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("error sending after {sent} bytes: {source}")]
    Send {
        sent: usize,
        source: std::io::Error,
    },
    #[error("error receiving: {0}")]
    Recv(std::io::Error),
    #[error("error getting local_addr(): {0}")]
    LocalAddr(std::io::Error),
}

pub type Result<T> = core::result::Result<T, Error>;
