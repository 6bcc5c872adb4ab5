use clap::Parser;
use raw_http::config::Config;
use raw_http::http::{Request, Server};
use tracing_subscriber::EnvFilter;

fn main() {
    let config = Config::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut server = Server::new()
        .workers(config.workers)
        .body_wait(config.body_wait());

    server
        .get("/hello", |_| "Hello from raw-http-server!".to_string())
        .get("/user-agent", user_agent)
        .post("/echo", echo)
        .put("/echo", echo)
        .patch("/echo", echo)
        .delete("/echo", |req| format!("deleted {}", req.path()));

    server.listen(config.port)
}

fn echo(req: &Request) -> String {
    req.body().to_string()
}

fn user_agent(req: &Request) -> String {
    req.get_header("User-Agent").unwrap_or_default().to_string()
}
