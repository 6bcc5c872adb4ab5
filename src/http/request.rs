use crate::http::error::ParseError;
use crate::http::method::HttpMethod;
use crate::http::raw::RawRequest;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

static REQUEST_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<method>\S+)\s+(?P<target>\S+)(?:\s+(?P<version>\S+))?").unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: HttpMethod,
    path: String,
    version: Option<String>,
    headers: HashMap<String, String>,
    body: String,
}

impl Request {
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|v| v.as_str())
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

impl TryFrom<RawRequest> for Request {
    type Error = ParseError;

    fn try_from(raw: RawRequest) -> Result<Self, Self::Error> {
        let line = raw.method_line();
        if line.trim().is_empty() {
            return Err(ParseError::EmptyRequestLine);
        }

        let caps = REQUEST_LINE_RE
            .captures(line)
            .ok_or_else(|| ParseError::MalformedRequestLine(line.to_string()))?;

        let method_raw = &caps["method"];
        let method = HttpMethod::from_str(method_raw)
            .map_err(|_| ParseError::UnknownMethod(method_raw.to_string()))?;
        let path = caps["target"].to_string();
        let version = caps.name("version").map(|m| m.as_str().to_string());

        Ok(Request {
            method,
            path,
            version,
            headers: parse_headers(raw.header_lines()),
            body: raw.body().to_string(),
        })
    }
}

// Lines without a colon are dropped.
fn parse_headers(block: &str) -> HashMap<String, String> {
    block
        .lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect()
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.method, self.path)?;
        for (name, value) in &self.headers {
            writeln!(f, "{}: {}", name, value)?;
        }
        write!(f, "\n{}", self.body)
    }
}
