use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use mio::net::TcpStream;
use mio::{Events, Poll, Token};
use slab::Slab;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::ServerError;

use super::connection::{self, Disposition};
use super::handler::Handler;
use super::listener::{Acceptor, LISTENER};

const EVENTS_CAPACITY: usize = 1024;

/// Upper bound on one readiness wait, so the shutdown flag is observed
/// between rounds even when no traffic arrives.
const POLL_TIMEOUT: Duration = Duration::from_millis(500);

/// The wait/dispatch loop: owns the poller, the acceptor, and the set of
/// live client connections.
pub struct Reactor<H> {
    poll: Poll,
    acceptor: Acceptor,
    conns: Slab<TcpStream>,
    handler: H,
    shutdown: Arc<AtomicBool>,
}

/// Trips the reactor's stop flag. `run` returns cleanly after the wait round
/// in progress when the flag was set.
#[derive(Clone)]
pub struct ShutdownHandle(Arc<AtomicBool>);

impl ShutdownHandle {
    pub fn shutdown(&self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

impl<H> Reactor<H> {
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.acceptor.local_addr()
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle(self.shutdown.clone())
    }

    /// Closes every tracked connection and deregisters the listener.
    ///
    /// Safe to call again after a fatal loop exit; a second pass finds the
    /// connection set already empty.
    fn cleanup(&mut self) {
        let open = self.conns.len();
        for mut stream in self.conns.drain() {
            if let Err(e) = self.poll.registry().deregister(&mut stream) {
                debug!(error = %e, "Failed to deregister connection");
            }
        }
        if open > 0 {
            info!(connections = open, "Closed open connections");
        }
        self.acceptor.deregister(self.poll.registry());
    }
}

impl<H: Handler> Reactor<H> {
    /// Binds the listening socket and registers it with a fresh poller.
    ///
    /// Returns the first setup failure; everything created up to that point
    /// is dropped, so no descriptor leaks out of a failed construction.
    pub fn new(cfg: &Config, handler: H) -> Result<Self, ServerError> {
        let mut acceptor = Acceptor::bind(&cfg.listen_addr)?;
        let poll = Poll::new().map_err(ServerError::MultiplexerInit)?;
        acceptor.register(poll.registry())?;

        Ok(Self {
            poll,
            acceptor,
            conns: Slab::new(),
            handler,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Runs the wait/dispatch cycle until shutdown or a fatal wait error.
    ///
    /// Each readiness batch is processed fully, in the order the poller
    /// returned it, before the next wait. Per-connection failures are
    /// absorbed inside the loop; only a failure of the wait itself stops
    /// the server, unwinding after open connections are closed.
    pub fn run(&mut self) -> Result<(), ServerError> {
        let mut events = Events::with_capacity(EVENTS_CAPACITY);

        if let Ok(addr) = self.acceptor.local_addr() {
            info!("Listening on {}", addr);
        }

        while !self.shutdown.load(Ordering::Relaxed) {
            if let Err(e) = self.poll.poll(&mut events, Some(POLL_TIMEOUT)) {
                if e.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                self.cleanup();
                return Err(ServerError::Wait(e));
            }

            for event in events.iter() {
                match event.token() {
                    LISTENER => {
                        self.acceptor
                            .accept_ready(self.poll.registry(), &mut self.conns);
                    }
                    token => self.client_ready(token),
                }
            }
        }

        info!("Shutdown requested");
        self.cleanup();
        Ok(())
    }

    fn client_ready(&mut self, token: Token) {
        let key = token.0 - 1;
        // Events can still arrive for a connection closed earlier in the
        // same batch.
        let Some(stream) = self.conns.get_mut(key) else {
            return;
        };

        match connection::service(stream, &self.handler) {
            Disposition::Close => {
                let mut stream = self.conns.remove(key);
                if let Err(e) = self.poll.registry().deregister(&mut stream) {
                    debug!(error = %e, "Failed to deregister connection");
                }
            }
            Disposition::Wait => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::{Client, Status};

    fn test_config() -> Config {
        Config {
            listen_addr: "127.0.0.1:0".to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn run_observes_a_pre_tripped_shutdown() {
        let handler = |_: &mut Client, _: &str| Status::Ok;
        let mut reactor = Reactor::new(&test_config(), handler).unwrap();
        reactor.shutdown_handle().shutdown();
        reactor.run().unwrap();
    }

    #[test]
    fn binding_an_occupied_port_fails_distinctly() {
        let handler = |_: &mut Client, _: &str| Status::Ok;
        let first = Reactor::new(&test_config(), handler).unwrap();
        let addr = first.local_addr().unwrap();

        let occupied = Config {
            listen_addr: addr.to_string(),
            ..Config::default()
        };
        match Reactor::new(&occupied, handler) {
            Err(ServerError::PortInUse { addr: reported, .. }) => {
                assert_eq!(reported, addr.to_string());
            }
            other => panic!("expected PortInUse, got {:?}", other.map(|_| ())),
        }
    }
}
