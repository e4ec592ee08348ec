use crate::{ClientConfig, Request, Response, Result};


pub mod reqwest;

/// The transport a [`RequestClient`](crate::RequestClient) delegates to.
///
/// A handle is created for a single exchange and dropped right after it.
pub trait HttpClient {
    fn create(config: &ClientConfig) -> Result<Self>
    where
        Self: Sized;

    fn execute(&self, request: &Request) -> Result<Response>;
}
