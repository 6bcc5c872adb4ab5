use clap::Parser;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "raw-http-server")]
#[command(about = "Minimal HTTP/1.1 server on raw TCP sockets")]
#[command(version)]
pub struct Config {
    /// Port to listen on (all interfaces)
    #[arg(short, long, default_value_t = 8080, env = "HTTP_PORT")]
    pub port: u16,

    /// Worker threads; 0 handles each connection on the accept loop
    #[arg(short, long, default_value_t = 0, env = "HTTP_WORKERS")]
    pub workers: usize,

    /// Longest wait, in milliseconds, for body bytes after the headers
    #[arg(long = "body-wait-ms", default_value_t = 0, env = "HTTP_BODY_WAIT_MS")]
    pub body_wait_ms: u64,

    /// Log filter used when RUST_LOG is unset
    #[arg(long = "log-level", default_value = "info", env = "HTTP_LOG")]
    pub log_level: String,
}

impl Config {
    pub fn body_wait(&self) -> Duration {
        Duration::from_millis(self.body_wait_ms)
    }
}
