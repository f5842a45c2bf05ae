use std::path::PathBuf;

use tracing::warn;

use wicket::config::Config;
use wicket::http::response;
use wicket::server::{Client, Handler, Reactor, Status};

/// Serves files from a web root, one request per connection.
struct StaticSite {
    root: PathBuf,
    index: String,
}

impl StaticSite {
    /// Naive request-line routing: the second whitespace token is the path,
    /// `/` maps to the index file, anything containing `..` is refused.
    fn resolve(&self, request: &str) -> Option<PathBuf> {
        let mut parts = request.split_whitespace();
        let _method = parts.next()?;
        let path = parts.next()?;

        if path.contains("..") {
            return None;
        }

        let rel = if path == "/" {
            self.index.as_str()
        } else {
            path.trim_start_matches('/')
        };
        Some(self.root.join(rel))
    }
}

impl Handler for StaticSite {
    fn handle(&self, client: &mut Client, request: &str) -> Status {
        let Some(path) = self.resolve(request) else {
            client.write(&response::from_bytes(
                "400 Bad Request",
                "text/html; charset=UTF-8",
                b"<h1>400 Bad Request</h1>\n",
            ));
            return Status::Error;
        };

        match response::from_file("200 OK", &path) {
            Ok(bytes) => {
                client.write(&bytes);
                Status::Ok
            }
            Err(e) => {
                warn!(peer = %client.peer(), error = %e, "Failed to build response");
                let not_found = response::from_file("404 Not Found", self.root.join("404.html"))
                    .unwrap_or_else(|_| {
                        response::from_bytes(
                            "404 Not Found",
                            "text/html; charset=UTF-8",
                            b"<h1>404 Not Found</h1>\n",
                        )
                    });
                client.write(&not_found);
                Status::Error
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load();
    let site = StaticSite {
        root: cfg.web_root.clone(),
        index: cfg.index_file.clone(),
    };

    let mut reactor = Reactor::new(&cfg, site)?;

    let shutdown = reactor.shutdown_handle();
    ctrlc::set_handler(move || {
        tracing::info!("Shutdown signal received");
        shutdown.shutdown();
    })?;

    reactor.run()?;
    Ok(())
}
