use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::time::Duration;

#[derive(PartialEq, Eq, Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match *self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub enum Version {
    #[serde(rename = "HTTP/0.9")]
    Http09,
    #[serde(rename = "HTTP/1.0")]
    Http10,
    #[serde(rename = "HTTP/1.1")]
    Http11,
    #[serde(rename = "HTTP/2.0")]
    Http2,
    #[serde(rename = "HTTP/3.0")]
    Http3,
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let version = match *self {
            Version::Http09 => "HTTP/0.9",
            Version::Http10 => "HTTP/1.0",
            Version::Http11 => "HTTP/1.1",
            Version::Http2 => "HTTP/2.0",
            Version::Http3 => "HTTP/3.0",
        };
        f.write_str(version)
    }
}

/// One fully assembled exchange, built fresh by every verb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub target: String,
    /// Form-encoded payload. `None` for GET, which carries its parameters in
    /// the target instead.
    pub body: Option<String>,
}

#[derive(Debug)]
pub struct Response {
    pub version: Version,
    pub status_code: u16,
    pub status: String,
    pub headers: Vec<(String, String)>,
    pub remote_addr: Option<SocketAddr>,
    pub content_length: Option<u64>,
    pub body: String,
}

/// Transfer details for the last exchange.
///
/// Only `url`, `method` and `total_time` are guaranteed; the rest is filled
/// in once the server answered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    pub url: String,
    pub method: Method,
    pub status_code: Option<u16>,
    pub status: Option<String>,
    pub version: Option<Version>,
    pub headers: Vec<(String, String)>,
    pub content_length: Option<u64>,
    pub remote_addr: Option<SocketAddr>,
    #[serde(serialize_with = "as_secs_f64")]
    pub total_time: Duration,
}

impl Metadata {
    pub(crate) fn new(request: &Request, total_time: Duration) -> Self {
        Metadata {
            url: request.target.clone(),
            method: request.method,
            status_code: None,
            status: None,
            version: None,
            headers: vec![],
            content_length: None,
            remote_addr: None,
            total_time,
        }
    }

    pub(crate) fn with_response(mut self, response: &Response) -> Self {
        self.status_code = Some(response.status_code);
        self.status = Some(response.status.clone());
        self.version = Some(response.version);
        self.headers = response.headers.clone();
        self.content_length = response.content_length;
        self.remote_addr = response.remote_addr;
        self
    }

    /// First value of the header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn as_secs_f64<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_f64(duration.as_secs_f64())
}

/// Result of the most recent verb call. Replaced as a whole, never patched.
#[derive(Debug, Clone, Default)]
pub struct Outcome {
    pub body: String,
    pub metadata: Option<Metadata>,
    pub error: Option<String>,
}
