use std::io::{self, Write};

use mio::net::TcpStream;

use crate::error::ServerError;

pub struct ResponseWriter {
    buffer: Vec<u8>,
    written: usize,
}

impl ResponseWriter {
    pub fn new(buffer: Vec<u8>) -> Self {
        Self { buffer, written: 0 }
    }

    /// Writes the whole buffer to the stream.
    ///
    /// A would-block mid-response is an error here rather than a reason to
    /// re-arm the poller: the connection closes after one response, so no
    /// write state is carried across readiness events.
    pub fn write_to_stream(&mut self, stream: &mut TcpStream) -> Result<(), ServerError> {
        while self.written < self.buffer.len() {
            match stream.write(&self.buffer[self.written..]) {
                Ok(0) => {
                    return Err(ServerError::Write(io::Error::new(
                        io::ErrorKind::WriteZero,
                        "connection closed while writing",
                    )));
                }
                Ok(n) => self.written += n,
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(ServerError::Write(e)),
            }
        }

        Ok(())
    }
}
