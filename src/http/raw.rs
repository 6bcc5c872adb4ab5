/// The three unparsed segments of a request as they came off the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRequest {
    method_line: String,
    header_lines: String,
    body: String,
}

impl RawRequest {
    pub fn new(
        method_line: impl Into<String>,
        header_lines: impl Into<String>,
        body: impl Into<String>,
    ) -> RawRequest {
        RawRequest {
            method_line: method_line.into(),
            header_lines: header_lines.into(),
            body: body.into(),
        }
    }

    pub fn method_line(&self) -> &str {
        &self.method_line
    }

    pub fn header_lines(&self) -> &str {
        &self.header_lines
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}
