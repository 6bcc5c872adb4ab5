use crate::http::handler::HandlerFunc;
use crate::http::method::HttpMethod;
use crate::http::request::Request;
use std::collections::HashMap;

#[derive(Default)]
pub struct Router {
    routes: HashMap<String, HandlerFunc>,
}

impl Router {
    pub fn new() -> Router {
        Router::default()
    }

    pub fn add_route(&mut self, path: &str, f: HandlerFunc) {
        self.routes.insert(path.to_string(), f);
    }

    /// Byte-for-byte lookup: no trailing-slash folding, no parameters, no wildcards.
    pub fn resolve(&self, path: &str) -> Option<&HandlerFunc> {
        self.routes.get(path)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Per-method routers. Filled while the server is being set up and read-only afterwards.
#[derive(Default)]
pub struct RouteTable {
    routers: HashMap<HttpMethod, Router>,
}

impl RouteTable {
    pub fn add(&mut self, method: HttpMethod, path: &str, f: HandlerFunc) {
        self.routers.entry(method).or_default().add_route(path, f);
    }

    pub fn resolve(&self, method: HttpMethod, path: &str) -> Option<&HandlerFunc> {
        self.routers.get(&method)?.resolve(path)
    }

    pub fn dispatch(&self, req: &Request) -> Option<String> {
        self.resolve(req.method(), req.path()).map(|f| f(req))
    }

    pub fn router(&self, method: HttpMethod) -> Option<&Router> {
        self.routers.get(&method)
    }
}
