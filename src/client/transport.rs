use std::io::Read;
use std::time::Duration;

/// Response as seen by the retry loop: status, `Retry-After`, body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub retry_after: Option<String>,
    pub body: Vec<u8>,
}

/// Blocking GET. Returns `Ok` for every HTTP status; `Err` only when no
/// response was received (DNS, connect, timeout, broken body stream).
pub trait Transport {
    fn get(&self, url: &str, query: &[(String, String)]) -> Result<HttpResponse, String>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str, query: &[(String, String)]) -> Result<HttpResponse, String> {
        (**self).get(url, query)
    }
}

/// Production transport on a `ureq` agent.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration, user_agent: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(user_agent)
            .build();
        Self { agent }
    }

    fn read_response(resp: ureq::Response) -> Result<HttpResponse, String> {
        let status = resp.status();
        let retry_after = resp.header("retry-after").map(str::to_owned);
        let mut body = Vec::new();
        resp.into_reader()
            .read_to_end(&mut body)
            .map_err(|e| format!("reading response body: {e}"))?;
        Ok(HttpResponse {
            status,
            retry_after,
            body,
        })
    }
}

impl Transport for UreqTransport {
    fn get(&self, url: &str, query: &[(String, String)]) -> Result<HttpResponse, String> {
        let mut request = self.agent.get(url);
        for (k, v) in query {
            request = request.query(k, v);
        }
        match request.call() {
            Ok(resp) => Self::read_response(resp),
            // ureq reports 4xx/5xx as errors; the retry loop wants them as data.
            Err(ureq::Error::Status(_, resp)) => Self::read_response(resp),
            Err(ureq::Error::Transport(t)) => Err(t.to_string()),
        }
    }
}
