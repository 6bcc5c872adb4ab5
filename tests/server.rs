use raw_http::http::{Listener, Server};
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

const FALLBACK: &str = "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\nHello, World!";

fn bind(server: Server) -> Listener {
    server.bind(([127, 0, 0, 1], 0)).expect("bind")
}

/// Serves exactly `connections` connections on a background thread, then shuts down.
fn serve(listener: Listener, connections: usize) -> (SocketAddr, JoinHandle<()>) {
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        for _ in 0..connections {
            listener.accept_one().unwrap();
        }
        listener.shutdown();
    });
    (addr, handle)
}

fn connect(addr: SocketAddr) -> TcpStream {
    let stream = TcpStream::connect(addr).unwrap();
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    stream
}

fn exchange(addr: SocketAddr, request: &str) -> String {
    let mut stream = connect(addr);
    stream.write_all(request.as_bytes()).unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).unwrap();
    response
}

#[test]
fn handler_response_then_next_connection() {
    let mut server = Server::new();
    server.get("/hello", |_| "ok".to_string());
    let (addr, handle) = serve(bind(server), 2);

    let first = exchange(addr, "GET /hello HTTP/1.1\r\nHost: x\r\n\r\n");
    assert_eq!(first, "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\nok");

    let second = exchange(addr, "GET /hello HTTP/1.1\r\nHost: x\r\n\r\n");
    assert_eq!(second, first);

    handle.join().unwrap();
}

#[test]
fn exact_match_only() {
    let mut server = Server::new();
    server.get("/a/b", |_| "matched".to_string());
    let (addr, handle) = serve(bind(server), 3);

    assert!(exchange(addr, "GET /a/b HTTP/1.1\r\n\r\n").ends_with("\r\n\r\nmatched"));
    assert_eq!(exchange(addr, "GET /a/b/ HTTP/1.1\r\n\r\n"), FALLBACK);
    assert_eq!(exchange(addr, "GET /a HTTP/1.1\r\n\r\n"), FALLBACK);

    handle.join().unwrap();
}

#[test]
fn last_registration_wins() {
    let mut server = Server::new();
    server
        .put("/item", |_| "first".to_string())
        .put("/item", |_| "second".to_string());
    let (addr, handle) = serve(bind(server), 1);

    assert!(exchange(addr, "PUT /item HTTP/1.1\r\n\r\n").ends_with("\r\n\r\nsecond"));

    handle.join().unwrap();
}

#[test]
fn request_parts_reach_the_handler() {
    let mut server = Server::new();
    server.post("/submit", |req| {
        format!(
            "{} {} {} {}",
            req.method(),
            req.path(),
            req.get_header("X-Id").unwrap_or("-"),
            req.body()
        )
    });
    let (addr, handle) = serve(bind(server), 1);

    let response = exchange(
        addr,
        "POST /submit HTTP/1.1\r\nHost: x\r\nX-Id:  42 \r\n\r\nsome body",
    );
    assert!(response.ends_with("\r\n\r\nPOST /submit 42 some body"));

    handle.join().unwrap();
}

#[test]
fn query_string_is_part_of_the_path() {
    let mut server = Server::new();
    server
        .get("/search", |_| "bare".to_string())
        .get("/search?q=1", |req| format!("exact {}", req.path()));
    let (addr, handle) = serve(bind(server), 2);

    let exact = exchange(addr, "GET /search?q=1 HTTP/1.1\r\n\r\n");
    assert!(exact.ends_with("\r\n\r\nexact /search?q=1"));
    assert_eq!(exchange(addr, "GET /search?q=2 HTTP/1.1\r\n\r\n"), FALLBACK);

    handle.join().unwrap();
}

#[test]
fn unknown_method_gets_bare_status_line() {
    let mut server = Server::new();
    server.get("/", |_| "root".to_string());
    let (addr, handle) = serve(bind(server), 1);

    assert_eq!(exchange(addr, "BREW / HTTP/1.1\r\n\r\n"), "HTTP/1.1 200 OK");

    handle.join().unwrap();
}

#[test]
fn silent_client_gets_bare_status_line() {
    let (addr, handle) = serve(bind(Server::new()), 1);

    let mut stream = connect(addr);
    stream.shutdown(std::net::Shutdown::Write).unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).unwrap();

    assert_eq!(response, "HTTP/1.1 200 OK");
    handle.join().unwrap();
}

#[test]
fn body_wait_picks_up_a_late_body() {
    let mut server = Server::new().body_wait(Duration::from_millis(500));
    server.post("/echo", |req| req.body().to_string());
    let (addr, handle) = serve(bind(server), 1);

    let mut stream = connect(addr);
    stream
        .write_all(b"POST /echo HTTP/1.1\r\nHost: x\r\n\r\n")
        .unwrap();
    thread::sleep(Duration::from_millis(20));
    stream.write_all(b"late").unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).unwrap();

    assert!(response.ends_with("\r\n\r\nlate"));
    handle.join().unwrap();
}

#[test]
fn body_after_headers_is_not_waited_for() {
    let mut server = Server::new();
    server.post("/echo", |req| format!("[{}]", req.body()));
    let (addr, handle) = serve(bind(server), 1);

    let mut stream = connect(addr);
    stream
        .write_all(b"POST /echo HTTP/1.1\r\nHost: x\r\n\r\n")
        .unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).unwrap();
    // The server has already answered and closed; these bytes are never read.
    let _ = stream.write_all(b"late");

    assert!(response.ends_with("\r\n\r\n[]"));
    handle.join().unwrap();
}

fn panicking_route_then_next_request(mut server: Server) {
    server
        .get("/boom", |_| panic!("handler failure"))
        .get("/ok", |_| "ok".to_string());
    let (addr, handle) = serve(bind(server), 3);

    assert_eq!(exchange(addr, "GET /boom HTTP/1.1\r\n\r\n"), "");
    assert!(exchange(addr, "GET /ok HTTP/1.1\r\n\r\n").ends_with("\r\n\r\nok"));
    assert!(exchange(addr, "GET /ok HTTP/1.1\r\n\r\n").ends_with("\r\n\r\nok"));

    handle.join().unwrap();
}

#[test]
fn panicking_handler_does_not_stop_sequential_loop() {
    panicking_route_then_next_request(Server::new());
}

#[test]
fn panicking_handler_does_not_stop_worker_pool() {
    panicking_route_then_next_request(Server::new().workers(1));
}

#[test]
fn worker_pool_serves_every_connection() {
    let mut server = Server::new().workers(4);
    server.get("/n", |req| req.get_header("N").unwrap_or("?").to_string());
    let (addr, handle) = serve(bind(server), 8);

    let clients: Vec<_> = (0..8)
        .map(|i| {
            thread::spawn(move || {
                let response = exchange(addr, &format!("GET /n HTTP/1.1\r\nN: {}\r\n\r\n", i));
                assert!(response.ends_with(&format!("\r\n\r\n{}", i)));
            })
        })
        .collect();

    for client in clients {
        client.join().unwrap();
    }
    handle.join().unwrap();
}

#[test]
fn bind_failure_is_an_error() {
    let taken = bind(Server::new());
    let addr = taken.local_addr().unwrap();

    assert!(Server::new().bind(addr).is_err());
}
