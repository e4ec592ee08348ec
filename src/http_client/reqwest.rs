use crate::http_client::{ClientConfig, HttpClient};
use crate::{Method, Request, Response, Result, Version};
use anyhow::Context;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, CONTENT_TYPE};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug)]
pub struct ReqwestHttpClient {
    client: Client,
}

impl HttpClient for ReqwestHttpClient {
    fn create(config: &ClientConfig) -> Result<ReqwestHttpClient>
    where
        Self: Sized,
    {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }
        let client = builder.build().context("Failed building HTTP client")?;

        Ok(ReqwestHttpClient { client })
    }

    fn execute(&self, request: &Request) -> Result<Response> {
        let Request {
            method,
            target,
            body,
        } = request;
        let mut request_builder = self.client.request(method.into(), target.as_str());
        if let Some(body) = body {
            request_builder = set_body(body, request_builder);
        }
        let response = request_builder.send()?;

        to_response(response)
    }
}

impl From<&Method> for reqwest::Method {
    fn from(method: &Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl From<reqwest::Version> for Version {
    fn from(version: reqwest::Version) -> Self {
        match version {
            reqwest::Version::HTTP_09 => Version::Http09,
            reqwest::Version::HTTP_10 => Version::Http10,
            reqwest::Version::HTTP_2 => Version::Http2,
            reqwest::Version::HTTP_3 => Version::Http3,
            _ => Version::Http11,
        }
    }
}

fn to_response(response: reqwest::blocking::Response) -> Result<Response> {
    let status = response.status();
    let version = response.version().into();
    let headers = headers(response.headers());
    let remote_addr = response.remote_addr();
    let content_length = response.content_length();
    let body = response
        .text()
        .with_context(|| format!("Failed reading response body ({})", status))?;

    Ok(Response {
        version,
        status_code: status.as_u16(),
        status: status.to_string(),
        headers,
        remote_addr,
        content_length,
        body,
    })
}

fn headers(value: &HeaderMap) -> Vec<(String, String)> {
    value
        .iter()
        .map(|(header_name, header_value)| {
            (
                header_name.to_string(),
                String::from_utf8_lossy(header_value.as_bytes()).into_owned(),
            )
        })
        .collect()
}

fn set_body(body: &str, request_builder: RequestBuilder) -> RequestBuilder {
    request_builder
        .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
        .body(body.to_string())
}
