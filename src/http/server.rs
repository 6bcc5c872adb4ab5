use crate::concurrency::ThreadPool;
use crate::http::error::ServerError;
use crate::http::method::HttpMethod;
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::router::RouteTable;
use crate::http::wire::{self, PendingRead};
use anyhow::Context;
use std::io::{self, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::panic::{self, AssertUnwindSafe};
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, trace, warn};

/// Route registration and server settings. Consumed by [`Server::bind`], after
/// which the routing table can no longer change.
#[derive(Default)]
pub struct Server {
    routes: RouteTable,
    workers: usize,
    body_wait: Duration,
}

impl Server {
    pub fn new() -> Server {
        Server::default()
    }

    /// Handle connections on a pool of `n` threads instead of the accept loop itself.
    /// `0` keeps the strictly sequential accept-then-handle loop.
    pub fn workers(mut self, n: usize) -> Server {
        self.workers = n;
        self
    }

    pub fn body_wait(mut self, wait: Duration) -> Server {
        self.body_wait = wait;
        self
    }

    pub fn get<F>(&mut self, path: &str, f: F) -> &mut Server
    where
        F: Fn(&Request) -> String + Send + Sync + 'static,
    {
        self.route(HttpMethod::Get, path, f)
    }

    pub fn post<F>(&mut self, path: &str, f: F) -> &mut Server
    where
        F: Fn(&Request) -> String + Send + Sync + 'static,
    {
        self.route(HttpMethod::Post, path, f)
    }

    pub fn put<F>(&mut self, path: &str, f: F) -> &mut Server
    where
        F: Fn(&Request) -> String + Send + Sync + 'static,
    {
        self.route(HttpMethod::Put, path, f)
    }

    pub fn delete<F>(&mut self, path: &str, f: F) -> &mut Server
    where
        F: Fn(&Request) -> String + Send + Sync + 'static,
    {
        self.route(HttpMethod::Delete, path, f)
    }

    pub fn patch<F>(&mut self, path: &str, f: F) -> &mut Server
    where
        F: Fn(&Request) -> String + Send + Sync + 'static,
    {
        self.route(HttpMethod::Patch, path, f)
    }

    pub fn route<F>(&mut self, method: HttpMethod, path: &str, f: F) -> &mut Server
    where
        F: Fn(&Request) -> String + Send + Sync + 'static,
    {
        self.routes.add(method, path, Box::new(f));
        self
    }

    pub fn bind(self, addr: impl Into<SocketAddr>) -> Result<Listener, ServerError> {
        let addr = addr.into();
        let listener = TcpListener::bind(addr).map_err(|source| ServerError::Bind {
            addr: addr.to_string(),
            source,
        })?;

        let pool = (self.workers > 0).then(|| ThreadPool::new(self.workers));

        info!(
            addr = %listener.local_addr().unwrap_or(addr),
            workers = self.workers,
            "listening"
        );

        Ok(Listener {
            listener,
            dispatcher: Arc::new(Dispatcher {
                routes: self.routes,
                body_wait: self.body_wait,
            }),
            pool,
        })
    }

    /// Binds every interface on `port` and serves forever. A bind failure ends the process.
    pub fn listen(self, port: u16) -> ! {
        match self.bind(([0, 0, 0, 0], port)) {
            Ok(listener) => listener.run(),
            Err(e) => {
                error!(error = %e, cause = ?std::error::Error::source(&e), "fail to create socket");
                process::exit(1)
            }
        }
    }
}

pub struct Listener {
    listener: TcpListener,
    dispatcher: Arc<Dispatcher>,
    // Dropped last so queued connections finish before shutdown returns.
    pool: Option<ThreadPool>,
}

impl Listener {
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts a single connection and serves it. Without a pool the connection
    /// is closed by the time this returns; with one it is only queued.
    pub fn accept_one(&self) -> Result<(), ServerError> {
        trace!("waiting for connection");
        let (stream, peer) = self.listener.accept().map_err(ServerError::Accept)?;
        debug!(%peer, "accepted connection");

        match &self.pool {
            None => self.dispatcher.serve(stream),
            Some(pool) => {
                let dispatcher = Arc::clone(&self.dispatcher);
                pool.execute(move || dispatcher.serve(stream))?;
            }
        }

        Ok(())
    }

    pub fn run(self) -> ! {
        loop {
            if let Err(e) = self.accept_one() {
                error!(error = %e, cause = ?std::error::Error::source(&e), "connection dropped");
            }
        }
    }

    pub fn shutdown(self) {
        info!("shutting down");
        drop(self);
    }
}

struct Dispatcher {
    routes: RouteTable,
    body_wait: Duration,
}

impl Dispatcher {
    fn serve(&self, mut stream: TcpStream) {
        match panic::catch_unwind(AssertUnwindSafe(|| self.respond(&mut stream))) {
            Ok(response) => {
                if let Err(e) = write_response(&mut stream, &response) {
                    error!(error = ?e, "fail to send");
                }
            }
            Err(_) => error!("handler panicked, closing connection without a response"),
        }

        if let Err(e) = stream.shutdown(Shutdown::Write) {
            debug!(error = %e, "socket already closed");
        }
    }

    fn respond<S: PendingRead>(&self, source: &mut S) -> Response {
        match wire::read_raw_request(source, self.body_wait).and_then(Request::try_from) {
            Ok(req) => {
                debug!("{}", req);
                self.dispatch(&req)
            }
            Err(e) => {
                warn!(error = %e, "unparseable request");
                Response::minimal()
            }
        }
    }

    fn dispatch(&self, req: &Request) -> Response {
        match self.routes.dispatch(req) {
            Some(body) => Response::text(body),
            None => {
                debug!(method = %req.method(), path = req.path(), "no route");
                Response::fallback()
            }
        }
    }
}

fn write_response(w: &mut impl Write, response: &Response) -> anyhow::Result<()> {
    w.write_all(&response.to_bytes())
        .context("fail to send response")?;
    w.flush().context("fail to flush response")
}
