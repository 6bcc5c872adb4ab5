use crate::http::request::Request;

pub type HandlerFunc = Box<dyn Fn(&Request) -> String + Sync + Send>;
