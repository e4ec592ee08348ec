use std::marker::PhantomData;
use std::time::Instant;

use tracing::{debug, warn};

use crate::http_client::reqwest::ReqwestHttpClient;
use crate::http_client::HttpClient;
use crate::{ClientConfig, Method, Metadata, Outcome, Parameters, Request};

#[cfg(test)]
mod tests;

/// A target URL as accepted by [`RequestClient`]. `None` leaves the client
/// without one.
pub trait IntoTarget {
    fn into_target(self) -> Option<String>;
}

impl IntoTarget for &str {
    fn into_target(self) -> Option<String> {
        Some(self.to_string())
    }
}

impl IntoTarget for String {
    fn into_target(self) -> Option<String> {
        Some(self)
    }
}

impl IntoTarget for &String {
    fn into_target(self) -> Option<String> {
        Some(self.clone())
    }
}

impl<T: IntoTarget> IntoTarget for Option<T> {
    fn into_target(self) -> Option<String> {
        self.and_then(IntoTarget::into_target)
    }
}

/// Keeps a URL and form parameters and sends them with one of four verbs.
///
/// Every verb performs exactly one blocking exchange and records its
/// [`Outcome`]: the body it returns, the transfer [`Metadata`] available from
/// [`debug`](Self::debug) and the transport failure, if any, available from
/// [`error`](Self::error). Transport failures are never returned as `Err`, and
/// HTTP error statuses are not failures at all: a 404 shows up as a body plus
/// `status_code` in the metadata.
///
/// ```no_run
/// use form_request::{Parameters, RequestClient};
///
/// let mut client = RequestClient::new(
///     "http://example.com/api",
///     Parameters::from([("a", "1"), ("b", "two words")]),
/// );
/// // GET http://example.com/api?a=1&b=two+words
/// let body = client.get();
/// if let Some(error) = client.error() {
///     eprintln!("request failed: {}", error);
/// }
/// ```
#[derive(Debug)]
pub struct RequestClient<C = ReqwestHttpClient> {
    url: Option<String>,
    parameters: Parameters,
    config: ClientConfig,
    last: Outcome,
    client: PhantomData<fn() -> C>,
}

impl Default for RequestClient<ReqwestHttpClient> {
    fn default() -> Self {
        Self::empty()
    }
}

impl RequestClient<ReqwestHttpClient> {
    pub fn new<U, P>(url: U, parameters: P) -> Self
    where
        U: IntoTarget,
        P: Into<Parameters>,
    {
        Self::with_client(url, parameters)
    }

    /// Same as [`new`](Self::new), reads better at the head of a chain.
    pub fn create<U, P>(url: U, parameters: P) -> Self
    where
        U: IntoTarget,
        P: Into<Parameters>,
    {
        Self::new(url, parameters)
    }
}

impl<C: HttpClient> RequestClient<C> {
    /// A client sending through the transport `C`.
    pub fn with_client<U, P>(url: U, parameters: P) -> Self
    where
        U: IntoTarget,
        P: Into<Parameters>,
    {
        let mut client = Self::empty();
        client.url = url.into_target();
        client.parameters = parameters.into();
        client
    }

    /// A client with no URL and no parameters.
    pub fn empty() -> Self {
        RequestClient {
            url: None,
            parameters: Parameters::new(),
            config: ClientConfig::default(),
            last: Outcome::default(),
            client: PhantomData,
        }
    }

    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the URL; `None` clears it.
    pub fn set_url<U: IntoTarget>(&mut self, url: U) -> &mut Self {
        self.url = url.into_target();
        self
    }

    /// Replaces the parameters as a whole; nothing of the previous set is kept.
    pub fn set_parameters<P: Into<Parameters>>(&mut self, parameters: P) -> &mut Self {
        self.parameters = parameters.into();
        self
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sends the parameters as a query string appended to the URL.
    pub fn get(&mut self) -> String {
        let mut target = self.url.clone().unwrap_or_default();
        let query = self.parameters.encode();
        if !query.is_empty() {
            target.push(if target.contains('?') { '&' } else { '?' });
            target.push_str(&query);
        }
        self.execute(Request {
            method: Method::Get,
            target,
            body: None,
        })
    }

    pub fn post(&mut self) -> String {
        self.send_form(Method::Post)
    }

    pub fn put(&mut self) -> String {
        self.send_form(Method::Put)
    }

    pub fn delete(&mut self) -> String {
        self.send_form(Method::Delete)
    }

    /// Metadata of the last exchange, `None` before the first one.
    pub fn debug(&self) -> Option<&Metadata> {
        self.last.metadata.as_ref()
    }

    /// Transport failure of the last exchange.
    pub fn error(&self) -> Option<&str> {
        self.last.error.as_deref()
    }

    pub fn body(&self) -> &str {
        &self.last.body
    }

    pub fn outcome(&self) -> &Outcome {
        &self.last
    }

    fn send_form(&mut self, method: Method) -> String {
        self.execute(Request {
            method,
            target: self.url.clone().unwrap_or_default(),
            body: Some(self.parameters.encode()),
        })
    }

    fn execute(&mut self, request: Request) -> String {
        debug!(method = %request.method, target = %request.target, "sending request");

        let started = Instant::now();
        // The transport handle lives only inside this closure.
        let result = C::create(&self.config).and_then(|client| client.execute(&request));
        let metadata = Metadata::new(&request, started.elapsed());

        self.last = match result {
            Ok(response) => {
                debug!(
                    method = %request.method,
                    target = %request.target,
                    status = response.status_code,
                    elapsed = ?metadata.total_time,
                    "request completed"
                );
                Outcome {
                    metadata: Some(metadata.with_response(&response)),
                    body: response.body,
                    error: None,
                }
            }
            Err(e) => {
                let error = format!(
                    "{:#}",
                    e.context(format!("{} {}", request.method, request.target))
                );
                warn!(%error, "request failed");
                Outcome {
                    body: String::new(),
                    metadata: Some(metadata),
                    error: Some(error),
                }
            }
        };

        self.last.body.clone()
    }
}
