//! Scripted transport
//!
//! Replays canned responses keyed by method and path and records every
//! request it sees. Used for offline runs and by the tests of every crate
//! that talks to the API.

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::{Method, StatusCode};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use url::Url;

use crate::error::ClientError;
use crate::request::{ApiRequest, ApiResponse};
use crate::transport::Transport;
use crate::Result;

#[derive(Debug, Clone)]
enum Reply {
    Respond(ApiResponse),
    Fail(String),
}

type RouteKey = (Method, String);

#[derive(Clone)]
pub struct ScriptedTransport {
    base_url: Url,
    routes: Arc<Mutex<HashMap<RouteKey, VecDeque<Reply>>>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            base_url: Url::parse("http://localhost/api").expect("static URL parses"),
            routes: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a response for a route. Replies are served in order; the last
    /// one keeps being served once the queue is down to it.
    pub fn respond(&self, method: Method, path: &str, response: ApiResponse) -> &Self {
        self.push(method, path, Reply::Respond(response));
        self
    }

    pub fn respond_json(
        &self,
        method: Method,
        path: &str,
        status: StatusCode,
        body: serde_json::Value,
    ) -> &Self {
        self.respond(method, path, ApiResponse::json_body(status, &body))
    }

    /// Queue a transport-level failure (no response at all)
    pub fn fail(&self, method: Method, path: &str, message: &str) -> &Self {
        self.push(method, path, Reply::Fail(message.to_string()));
        self
    }

    /// Forget everything queued for a route
    pub fn clear(&self, method: Method, path: &str) -> &Self {
        self.routes.lock().remove(&(method, path.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self, method: &Method, path: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| &r.method == method && r.path == path)
            .count()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.requests.lock().last().cloned()
    }

    fn push(&self, method: Method, path: &str, reply: Reply) {
        self.routes
            .lock()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
    }

    fn next_reply(&self, method: &Method, path: &str) -> Option<Reply> {
        let mut routes = self.routes.lock();
        let queue = routes.get_mut(&(method.clone(), path.to_string()))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

impl Default for ScriptedTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse> {
        self.requests.lock().push(request.clone());

        match self.next_reply(&request.method, &request.path) {
            Some(Reply::Respond(response)) => Ok(response),
            Some(Reply::Fail(message)) => Err(ClientError::Network(message)),
            None => Err(ClientError::Network(format!(
                "no scripted response for {} {}",
                request.method, request.path
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_replies_in_order_then_sticky() {
        let transport = ScriptedTransport::new();
        transport
            .respond_json(Method::GET, "/documents", StatusCode::OK, json!({"n": 1}))
            .respond_json(Method::GET, "/documents", StatusCode::OK, json!({"n": 2}));

        let request = ApiRequest::get("/documents");
        let mut seen = Vec::new();
        for _ in 0..3 {
            let response = transport.execute(&request).await.unwrap();
            let body: serde_json::Value = response.json().unwrap();
            seen.push(body["n"].as_i64().unwrap());
        }

        assert_eq!(seen, vec![1, 2, 2]);
        assert_eq!(transport.request_count(&Method::GET, "/documents"), 3);
    }

    #[tokio::test]
    async fn test_unscripted_route_is_network_failure() {
        let transport = ScriptedTransport::new();
        let result = transport.execute(&ApiRequest::get("/auth/me")).await;
        assert!(matches!(result, Err(ClientError::Network(_))));
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_scripted_failure() {
        let transport = ScriptedTransport::new();
        transport.fail(Method::GET, "/documents", "connection refused");

        let err = transport
            .execute(&ApiRequest::get("/documents"))
            .await
            .unwrap_err();
        assert!(err.is_network());
        assert_eq!(err.to_string(), "Network error: connection refused");
    }
}
