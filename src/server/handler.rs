use super::connection::Client;

/// Outcome a handler reports for one request.
///
/// Advisory only: the connection is closed afterwards either way, and an
/// `Error` outcome is merely logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Error,
}

/// A request callback.
///
/// Invoked at most once per accepted connection, with the raw request text
/// read from the socket. The text is borrowed for the duration of the call
/// and must not be retained. Whatever the handler queues on the [`Client`]
/// is written back before the connection closes.
pub trait Handler {
    fn handle(&self, client: &mut Client, request: &str) -> Status;
}

impl<F> Handler for F
where
    F: Fn(&mut Client, &str) -> Status,
{
    fn handle(&self, client: &mut Client, request: &str) -> Status {
        self(client, request)
    }
}
