use std::io;
use std::net::SocketAddr;

use mio::net::{TcpListener, TcpStream};
use mio::{Interest, Registry, Token};
use slab::Slab;
use socket2::{Domain, Protocol, Socket, Type};
use tracing::{debug, warn};

use crate::error::ServerError;

/// Token of the listening socket. Client tokens are slab keys offset by one.
pub(crate) const LISTENER: Token = Token(0);

/// Owns the listening socket: creates it non-blocking, binds it, listens,
/// and drains pending connections when the poller reports it readable.
pub struct Acceptor {
    listener: TcpListener,
}

impl Acceptor {
    /// Creates and binds the listening socket.
    ///
    /// Each setup step fails with its own error: socket creation, bind
    /// (address-in-use surfaced distinctly), listen. A failure on any step
    /// drops the socket created so far, so no descriptor outlives an error.
    pub fn bind(addr: &str) -> Result<Self, ServerError> {
        let parsed: SocketAddr = addr
            .parse()
            .map_err(|_| ServerError::InvalidAddress(addr.to_string()))?;

        let socket = Socket::new(Domain::for_address(parsed), Type::STREAM, Some(Protocol::TCP))
            .map_err(ServerError::SocketCreate)?;
        socket.set_nonblocking(true).map_err(ServerError::SocketCreate)?;
        socket.set_reuse_address(true).map_err(ServerError::SocketCreate)?;

        socket
            .bind(&parsed.into())
            .map_err(|e| ServerError::bind(addr, e))?;
        socket.listen(libc::SOMAXCONN).map_err(|e| ServerError::Listen {
            addr: addr.to_string(),
            source: e,
        })?;

        Ok(Self {
            listener: TcpListener::from_std(socket.into()),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub(crate) fn register(&mut self, registry: &Registry) -> Result<(), ServerError> {
        registry
            .register(&mut self.listener, LISTENER, Interest::READABLE)
            .map_err(ServerError::Registration)
    }

    pub(crate) fn deregister(&mut self, registry: &Registry) {
        if let Err(e) = registry.deregister(&mut self.listener) {
            debug!(error = %e, "Failed to deregister listener");
        }
    }

    /// Accepts until the kernel reports would-block.
    ///
    /// The poller notifies on readability transitions, so every notification
    /// must drain the whole accept queue or connections queued behind the
    /// first would be missed. Accepted streams are already non-blocking.
    /// A stream that cannot be registered is dropped and serving continues;
    /// only that client is lost.
    pub(crate) fn accept_ready(&mut self, registry: &Registry, conns: &mut Slab<TcpStream>) {
        loop {
            match self.listener.accept() {
                Ok((mut stream, peer)) => {
                    let entry = conns.vacant_entry();
                    let token = Token(entry.key() + 1);
                    match registry.register(&mut stream, token, Interest::READABLE) {
                        Ok(()) => {
                            entry.insert(stream);
                            debug!(%peer, "Accepted connection");
                        }
                        Err(e) => {
                            warn!(%peer, error = %e, "Failed to register connection, dropping it");
                        }
                    }
                }
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    warn!(error = %e, "Failed to accept connection");
                    break;
                }
            }
        }
    }
}
