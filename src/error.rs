//! Server error types.
//!
//! Defines errors that can occur while serving:
//! - Setup errors (`InvalidAddress` through `Registration`) abort startup
//! - `Wait`: the readiness wait itself failed; the serve loop stops
//! - Per-connection errors (`Accept`, `Read`, `Write`) are absorbed by the
//!   loop and logged; a single bad connection never stops the server
//! - `FileOpen`: response building from a file that cannot be read

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while setting up or running the server.
#[derive(Error, Debug)]
pub enum ServerError {
    /// The configured listen address did not parse
    #[error("invalid listen address `{0}`")]
    InvalidAddress(String),

    /// Creating the listening socket failed
    #[error("failed to create listening socket: {0}")]
    SocketCreate(#[source] io::Error),

    /// Binding the listening socket failed
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Address we tried to bind
        addr: String,
        #[source]
        source: io::Error,
    },

    /// Binding failed because the address is already in use
    #[error("address {addr} is already in use")]
    PortInUse {
        /// Address that was occupied
        addr: String,
        #[source]
        source: io::Error,
    },

    /// Putting the socket into listen state failed
    #[error("failed to listen on {addr}: {source}")]
    Listen {
        /// Address we listen on
        addr: String,
        #[source]
        source: io::Error,
    },

    /// Creating the readiness poller failed
    #[error("failed to create poller: {0}")]
    MultiplexerInit(#[source] io::Error),

    /// Registering a socket with the poller failed
    #[error("failed to register socket with poller: {0}")]
    Registration(#[source] io::Error),

    /// The readiness wait itself failed; the server has stopped serving
    #[error("readiness wait failed: {0}")]
    Wait(#[source] io::Error),

    /// Accepting a pending connection failed
    #[error("failed to accept connection: {0}")]
    Accept(#[source] io::Error),

    /// Reading a client request failed
    #[error("failed to read request: {0}")]
    Read(#[source] io::Error),

    /// Writing a response failed
    #[error("failed to write response: {0}")]
    Write(#[source] io::Error),

    /// A response file could not be read
    #[error("failed to open {}: {source}", .path.display())]
    FileOpen {
        /// File the response was built from
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ServerError {
    /// Classifies a bind failure, surfacing address-in-use distinctly.
    pub(crate) fn bind(addr: &str, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::AddrInUse {
            Self::PortInUse { addr: addr.to_string(), source }
        } else {
            Self::Bind { addr: addr.to_string(), source }
        }
    }
}
