//! Scripted [`Transport`] for exercising client operations offline.

use std::collections::VecDeque;
use std::sync::Mutex;

use nexus_client::{Error, Method, Request, Response, Result, Transport};
use serde_json::Value;

/// Response with a JSON body.
pub fn json_response(status: u16, body: Value) -> Response {
    Response {
        status,
        headers: vec![("Content-Type".into(), "application/json".into())],
        body: body.to_string().into_bytes(),
    }
}

/// Response with no body.
pub fn empty_response(status: u16) -> Response {
    Response::new(status)
}

#[derive(Debug)]
struct Route {
    method: Method,
    url: String,
    response: Response,
}

#[derive(Debug, Default)]
struct State {
    routes: Vec<Route>,
    queue: VecDeque<Response>,
    unreachable: Vec<String>,
    requests: Vec<Request>,
}

/// A transport answering from a script.
///
/// Requests are matched against routes first (exact method and URL, answered
/// every time), then served from the FIFO queue. Anything else gets a 404.
///
/// # Example
///
/// ```
/// use nexus_client::{Method, Request, Transport};
/// use nexus_test_utils::{MockTransport, empty_response};
///
/// let transport = MockTransport::new()
///     .route(Method::Head, "https://dl/nexus.tar.gz", empty_response(200));
/// let response = transport.send(&Request::head("https://dl/nexus.tar.gz")).unwrap();
/// assert_eq!(response.status, 200);
/// assert_eq!(transport.requests().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockTransport {
    state: Mutex<State>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next unrouted request.
    pub fn respond(self, response: Response) -> Self {
        self.lock().queue.push_back(response);
        self
    }

    /// Answer every `method` request for `url` with `response`.
    pub fn route(self, method: Method, url: impl Into<String>, response: Response) -> Self {
        self.lock().routes.push(Route {
            method,
            url: url.into(),
            response,
        });
        self
    }

    /// Fail requests for `url` as if the host could not be reached.
    pub fn unreachable(self, url: impl Into<String>) -> Self {
        self.lock().unreachable.push(url.into());
        self
    }

    /// Every request sent so far, in order.
    pub fn requests(&self) -> Vec<Request> {
        self.lock().requests.clone()
    }

    /// Requests sent with `method`.
    pub fn requests_with(&self, method: Method) -> Vec<Request> {
        self.lock()
            .requests
            .iter()
            .filter(|request| request.method == method)
            .cloned()
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &Request) -> Result<Response> {
        let mut state = self.lock();
        state.requests.push(request.clone());

        if state.unreachable.iter().any(|url| *url == request.url) {
            return Err(Error::Http {
                url: request.url.clone(),
                message: "connection refused".into(),
            });
        }

        if let Some(route) = state
            .routes
            .iter()
            .find(|route| route.method == request.method && route.url == request.url)
        {
            return Ok(route.response.clone());
        }

        Ok(state.queue.pop_front().unwrap_or_else(|| empty_response(404)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_routes_take_priority_over_queue() {
        let transport = MockTransport::new()
            .respond(json_response(200, json!({"queued": true})))
            .route(Method::Get, "http://n/a", json_response(201, json!({})));

        assert_eq!(transport.send(&Request::get("http://n/a")).unwrap().status, 201);
        assert_eq!(transport.send(&Request::get("http://n/a")).unwrap().status, 201);
        assert_eq!(transport.send(&Request::get("http://n/b")).unwrap().status, 200);
        assert_eq!(transport.send(&Request::get("http://n/b")).unwrap().status, 404);
        assert_eq!(transport.requests().len(), 4);
    }

    #[test]
    fn test_unreachable() {
        let transport = MockTransport::new().unreachable("http://down");
        assert!(transport.send(&Request::head("http://down")).is_err());
    }
}
