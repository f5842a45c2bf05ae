use std::io::{self, Read};
use std::net::SocketAddr;

use mio::net::TcpStream;
use tracing::{debug, warn};

use crate::http::writer::ResponseWriter;

use super::handler::{Handler, Status};

/// Upper bound on a single request read. A request whose head exceeds this
/// is silently truncated; the handler sees only the first kilobyte.
pub(crate) const READ_BUFFER_SIZE: usize = 1024;

/// What the dispatch loop should do with a connection after servicing it.
pub(crate) enum Disposition {
    /// Served, peer-closed, or failed: close the connection.
    Close,
    /// Nothing to read yet; leave it registered for the next readiness event.
    Wait,
}

/// The write side of one accepted connection, handed to the request handler.
///
/// Writes are queued in memory and flushed after the handler returns, so a
/// handler never blocks on the socket itself.
pub struct Client {
    peer: SocketAddr,
    queued: Vec<u8>,
}

impl Client {
    pub(crate) fn new(peer: SocketAddr) -> Self {
        Self {
            peer,
            queued: Vec::new(),
        }
    }

    /// Address of the connected peer.
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Queues response bytes to be written when the handler returns.
    pub fn write(&mut self, bytes: &[u8]) {
        self.queued.extend_from_slice(bytes);
    }

    pub(crate) fn into_queued(self) -> Vec<u8> {
        self.queued
    }
}

/// Services one readable client connection.
///
/// Performs a single read. Zero bytes means the peer closed and the handler
/// is never invoked. A would-block read means the readiness event was spent
/// before we got here; the connection must stay open and wait for the next
/// event rather than be torn down. Any data invokes the handler exactly
/// once, after which the connection is closed regardless of the outcome.
pub(crate) fn service<H: Handler>(stream: &mut TcpStream, handler: &H) -> Disposition {
    let peer = match stream.peer_addr() {
        Ok(peer) => peer,
        Err(_) => return Disposition::Close,
    };

    let mut buf = [0u8; READ_BUFFER_SIZE];
    let n = loop {
        match stream.read(&mut buf) {
            Ok(n) => break n,
            Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => return Disposition::Wait,
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!(%peer, error = %e, "Failed to read request");
                return Disposition::Close;
            }
        }
    };

    if n == 0 {
        debug!(%peer, "Peer closed connection");
        return Disposition::Close;
    }

    let request = String::from_utf8_lossy(&buf[..n]);
    let mut client = Client::new(peer);
    if handler.handle(&mut client, &request) == Status::Error {
        debug!(%peer, "Handler reported an error");
    }

    let queued = client.into_queued();
    if !queued.is_empty() {
        if let Err(e) = ResponseWriter::new(queued).write_to_stream(stream) {
            warn!(%peer, error = %e, "Failed to write response");
        }
    }

    Disposition::Close
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_queues_writes_in_order() {
        let peer: SocketAddr = "127.0.0.1:9999".parse().unwrap();
        let mut client = Client::new(peer);
        client.write(b"HTTP/1.1 200 OK\r\n\r\n");
        client.write(b"hello");

        assert_eq!(client.peer(), peer);
        assert_eq!(client.into_queued(), b"HTTP/1.1 200 OK\r\n\r\nhello");
    }
}
