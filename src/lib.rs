//! # form-request
//!
//! form-request is a small blocking HTTP helper. A [`RequestClient`] holds a
//! target URL and an ordered set of [`Parameters`], and exposes four verbs:
//!
//! - `get()` appends the parameters to the URL as a query string
//! - `post()`, `put()` and `delete()` send them as an
//!   `application/x-www-form-urlencoded` body to the unmodified URL
//!
//! Each verb performs one exchange and returns the response body. The transfer
//! details of that exchange are kept for [`RequestClient::debug`], and a
//! transport failure (unresolvable host, refused connection, timeout, invalid
//! URL) is kept as a message for [`RequestClient::error`] instead of being
//! returned as an `Err`.
//!
//! ```no_run
//! use form_request::{Parameters, RequestClient};
//!
//! let mut client = RequestClient::create("http://example.com/api", Parameters::new());
//! client
//!     .set_url("http://example.com/items")
//!     .set_parameters([("name", "widget"), ("colour", "dark blue")]);
//!
//! // POST http://example.com/items
//! // name=widget&colour=dark+blue
//! let body = client.post();
//!
//! match client.error() {
//!     Some(error) => eprintln!("{}", error),
//!     None => {
//!         let status = client.debug().and_then(|metadata| metadata.status_code);
//!         println!("{:?}: {}", status, body);
//!     }
//! }
//! ```
//!
//! HTTP error statuses are not transport failures: a `404` leaves
//! [`RequestClient::error`] empty and is only visible through the metadata
//! status code and the body.

use std::time::Duration;

pub use crate::client::{IntoTarget, RequestClient};
pub use crate::http_client::reqwest::ReqwestHttpClient;
pub use crate::http_client::HttpClient;
pub use crate::model::{Metadata, Method, Outcome, Request, Response, Version};
pub use crate::parameters::{Parameters, Value};

mod client;
pub mod http_client;
mod model;
mod parameters;

pub type Result<T> = anyhow::Result<T>;

/// Options handed to the transport for every exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// Whole-exchange timeout. Without one the transport default applies.
    pub timeout: Option<Duration>,
    pub user_agent: Option<String>,
}

impl ClientConfig {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            timeout,
            user_agent: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}
