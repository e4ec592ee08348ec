use form_request::{Parameters, RequestClient};
use httpmock::MockServer;

pub const FORM: &str = "application/x-www-form-urlencoded";

/// A client aimed at `path` on the mock server, with `a=1` and `b=two words`.
pub fn client_for(server: &MockServer, path: &str) -> RequestClient {
    RequestClient::create(
        server.url(path),
        Parameters::from([("a", "1"), ("b", "two words")]),
    )
}
