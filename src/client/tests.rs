use std::cell::{Cell, RefCell};
use std::time::Duration;

use anyhow::anyhow;

use crate::http_client::HttpClient;
use crate::{ClientConfig, Method, Parameters, Request, RequestClient, Response, Result, Version};

thread_local! {
    static SENT: RefCell<Vec<Request>> = RefCell::new(vec![]);
    static OPEN_HANDLES: Cell<i32> = Cell::new(0);
    static STATUS: Cell<u16> = Cell::new(200);
    static FAIL: Cell<bool> = Cell::new(false);
}

fn sent() -> Vec<Request> {
    SENT.with(|sent| sent.borrow().clone())
}

fn open_handles() -> i32 {
    OPEN_HANDLES.with(Cell::get)
}

/// Records every request and answers with its own target as the body, or
/// fails while `FAIL` is set.
struct EchoClient;

impl HttpClient for EchoClient {
    fn create(_config: &ClientConfig) -> Result<Self> {
        OPEN_HANDLES.with(|open| open.set(open.get() + 1));
        Ok(EchoClient)
    }

    fn execute(&self, request: &Request) -> Result<Response> {
        SENT.with(|sent| sent.borrow_mut().push(request.clone()));
        if FAIL.with(Cell::get) {
            return Err(anyhow!("Operation timed out"));
        }
        let status_code = STATUS.with(Cell::get);
        Ok(Response {
            version: Version::Http11,
            status_code,
            status: status_code.to_string(),
            headers: vec![("Content-Type".to_string(), "text/plain".to_string())],
            remote_addr: None,
            content_length: None,
            body: request.target.clone(),
        })
    }
}

impl Drop for EchoClient {
    fn drop(&mut self) {
        OPEN_HANDLES.with(|open| open.set(open.get() - 1));
    }
}

struct RefusingClient;

impl HttpClient for RefusingClient {
    fn create(_config: &ClientConfig) -> Result<Self> {
        OPEN_HANDLES.with(|open| open.set(open.get() + 1));
        Ok(RefusingClient)
    }

    fn execute(&self, _request: &Request) -> Result<Response> {
        Err(anyhow!("Connection refused"))
    }
}

impl Drop for RefusingClient {
    fn drop(&mut self) {
        OPEN_HANDLES.with(|open| open.set(open.get() - 1));
    }
}

struct UnavailableClient;

impl HttpClient for UnavailableClient {
    fn create(_config: &ClientConfig) -> Result<Self> {
        Err(anyhow!("no transport available"))
    }

    fn execute(&self, _request: &Request) -> Result<Response> {
        unreachable!()
    }
}

fn scenario() -> RequestClient<EchoClient> {
    RequestClient::with_client(
        "http://example.com/api",
        Parameters::from([("a", "1"), ("b", "two words")]),
    )
}

#[test]
fn get_appends_query_string() {
    let mut client = scenario();

    let body = client.get();

    assert_eq!(body, "http://example.com/api?a=1&b=two+words");
    assert_eq!(
        sent(),
        vec![Request {
            method: Method::Get,
            target: "http://example.com/api?a=1&b=two+words".to_string(),
            body: None,
        }]
    );
}

#[test]
fn get_without_parameters_keeps_url() {
    let mut client: RequestClient<EchoClient> =
        RequestClient::with_client("http://example.com/api", Parameters::new());

    client.get();

    assert_eq!(sent()[0].target, "http://example.com/api");
}

#[test]
fn get_with_only_null_parameters_keeps_url() {
    let mut client: RequestClient<EchoClient> = RequestClient::with_client(
        "http://example.com/api",
        Parameters::new().with("unset", Option::<i64>::None),
    );

    client.get();

    assert_eq!(sent()[0].target, "http://example.com/api");
}

#[test]
fn get_extends_existing_query_string() {
    let mut client: RequestClient<EchoClient> = RequestClient::with_client(
        "http://example.com/api?page=2",
        Parameters::from([("a", "1")]),
    );

    client.get();

    assert_eq!(sent()[0].target, "http://example.com/api?page=2&a=1");
}

#[test]
fn form_verbs_send_body_to_unmodified_url() {
    let mut client = scenario();

    client.post();
    client.put();
    client.delete();

    let expected = |method| Request {
        method,
        target: "http://example.com/api".to_string(),
        body: Some("a=1&b=two+words".to_string()),
    };
    assert_eq!(
        sent(),
        vec![
            expected(Method::Post),
            expected(Method::Put),
            expected(Method::Delete)
        ]
    );
}

#[test]
fn post_without_parameters_sends_empty_body() {
    let mut client: RequestClient<EchoClient> =
        RequestClient::with_client("http://example.com/api", Parameters::new());

    client.post();

    assert_eq!(sent()[0].method, Method::Post);
    assert_eq!(sent()[0].body, Some(String::new()));
}

#[test]
fn setters_replace_and_chain() {
    let mut client = scenario();

    client
        .set_url("http://example.com/other")
        .set_parameters([("c", "3")]);
    client.post();

    assert_eq!(client.url(), Some("http://example.com/other"));
    assert_eq!(client.parameters().get("a"), None);
    assert_eq!(sent()[0].target, "http://example.com/other");
    assert_eq!(sent()[0].body.as_deref(), Some("c=3"));
}

#[test]
fn nothing_recorded_before_first_call() {
    let client = scenario();

    assert!(client.debug().is_none());
    assert!(client.error().is_none());
    assert_eq!(client.body(), "");
}

#[test]
fn records_metadata() {
    let mut client = scenario();

    client.put();

    let metadata = client.debug().unwrap();
    assert_eq!(metadata.url, "http://example.com/api");
    assert_eq!(metadata.method, Method::Put);
    assert_eq!(metadata.status_code, Some(200));
    assert_eq!(metadata.version, Some(Version::Http11));
    assert_eq!(metadata.header("content-type"), Some("text/plain"));
    assert!(client.error().is_none());
}

#[test]
fn error_status_is_not_a_transport_error() {
    STATUS.with(|status| status.set(500));
    let mut client = scenario();

    let body = client.get();

    assert!(!body.is_empty());
    assert!(client.error().is_none());
    assert_eq!(client.debug().unwrap().status_code, Some(500));
}

#[test]
fn transport_failure_is_captured() {
    let mut client: RequestClient<RefusingClient> =
        RequestClient::with_client("http://example.com/api", Parameters::from([("a", "1")]));

    let body = client.delete();

    assert_eq!(body, "");
    let error = client.error().unwrap();
    assert!(error.starts_with("DELETE http://example.com/api"), "{}", error);
    assert!(error.contains("Connection refused"), "{}", error);

    let metadata = client.debug().unwrap();
    assert_eq!(metadata.method, Method::Delete);
    assert_eq!(metadata.status_code, None);
}

#[test]
fn unavailable_transport_is_captured() {
    let mut client: RequestClient<UnavailableClient> =
        RequestClient::with_client("http://example.com/api", Parameters::new());

    assert_eq!(client.get(), "");
    assert!(client.error().unwrap().contains("no transport available"));
    assert!(client.debug().is_some());
}

#[test]
fn missing_url_goes_to_the_transport() {
    let mut client: RequestClient<EchoClient> = RequestClient::empty();

    client.get();

    assert_eq!(sent()[0].target, "");
}

#[test]
fn construct_without_url() {
    let mut client: RequestClient<EchoClient> =
        RequestClient::with_client(None::<&str>, Parameters::from([("a", "1")]));

    assert_eq!(client.url(), None);
    client.post();

    assert_eq!(sent()[0].target, "");
    assert_eq!(sent()[0].body.as_deref(), Some("a=1"));
}

#[test]
fn construct_with_optional_url() {
    let client: RequestClient<EchoClient> =
        RequestClient::with_client(Some("http://example.com/api"), Parameters::new());

    assert_eq!(client.url(), Some("http://example.com/api"));
}

#[test]
fn set_url_none_clears_url() {
    let mut client = scenario();

    client.set_url(None::<String>).set_parameters(Parameters::new());
    client.get();

    assert_eq!(client.url(), None);
    assert_eq!(sent()[0].target, "");
}

#[test]
fn transport_handle_released_after_every_call() {
    let mut client = scenario();
    client.get();
    client.post();
    assert_eq!(open_handles(), 0);

    let mut refused: RequestClient<RefusingClient> =
        RequestClient::with_client("http://example.com/api", Parameters::new());
    refused.put();
    assert_eq!(open_handles(), 0);
}

#[test]
fn outcome_reflects_only_last_call() {
    let mut client = scenario();

    FAIL.with(|fail| fail.set(true));
    client.get();
    assert!(client.error().unwrap().contains("Operation timed out"));

    FAIL.with(|fail| fail.set(false));
    client.set_parameters(Parameters::new()).post();

    let outcome = client.outcome();
    assert_eq!(outcome.body, "http://example.com/api");
    assert_eq!(outcome.metadata.as_ref().unwrap().method, Method::Post);
    assert_eq!(outcome.metadata.as_ref().unwrap().status_code, Some(200));
    assert!(outcome.error.is_none());
}

#[test]
fn config_is_kept() {
    let config = ClientConfig::new(Some(Duration::from_secs(5))).with_user_agent("tests");
    let client = scenario().with_config(config.clone());

    assert_eq!(client.config(), &config);
    assert_eq!(client.config().timeout, Some(Duration::from_secs(5)));
    assert_eq!(client.config().user_agent.as_deref(), Some("tests"));
    assert_eq!(
        ClientConfig::default().with_timeout(Duration::from_secs(5)),
        ClientConfig::new(Some(Duration::from_secs(5)))
    );
}
