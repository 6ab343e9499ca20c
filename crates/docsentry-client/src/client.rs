//! API client
//!
//! Every call goes through the same pipeline: request interceptors, the
//! transport, response interceptors, then status mapping. Callers never attach
//! credentials or react to 401s themselves.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use url::Url;

use crate::envelope::error_message;
use crate::error::ClientError;
use crate::policy::Interceptor;
use crate::request::{ApiRequest, ApiResponse, FormPart};
use crate::transport::{join_api_path, Transport};
use crate::Result;

#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            interceptors: Vec::new(),
        }
    }

    /// Add an interceptor. Request hooks run in insertion order, response
    /// hooks in the same order after the transport returns.
    pub fn with_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    pub fn base_url(&self) -> &Url {
        self.transport.base_url()
    }

    pub fn url_for(&self, path: &str) -> Result<Url> {
        join_api_path(self.transport.base_url(), path)
    }

    /// Run the pipeline and return the response whatever its status.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let request = self
            .interceptors
            .iter()
            .fold(request, |request, interceptor| interceptor.on_request(request));

        let response = match self.transport.execute(&request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    method = %request.method,
                    path = %request.path,
                    error = %e,
                    "Request failed"
                );
                return Err(e);
            }
        };

        for interceptor in &self.interceptors {
            interceptor.on_response(&request, &response);
        }

        Ok(response)
    }

    /// Like [`send`](Self::send), but non-2xx statuses become errors carrying
    /// the server's message when it sent one.
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let response = self.send(request).await?;
        if response.is_success() {
            return Ok(response);
        }

        let message = error_message(&response.body);
        if response.status == StatusCode::UNAUTHORIZED {
            Err(ClientError::Unauthorized { message })
        } else {
            Err(ClientError::Api {
                status: response.status,
                message,
            })
        }
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(ApiRequest::get(path)).await?.json()
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.execute(ApiRequest::post(path).json(body)).await?.json()
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        parts: Vec<FormPart>,
    ) -> Result<T> {
        self.execute(ApiRequest::post(path).multipart(parts))
            .await?
            .json()
    }

    pub async fn get_bytes(&self, path: &str) -> Result<ApiResponse> {
        self.execute(ApiRequest::get(path)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::attach_credential;
    use crate::scripted::ScriptedTransport;
    use parking_lot::Mutex;
    use reqwest::header::AUTHORIZATION;
    use reqwest::Method;
    use serde_json::json;

    struct StaticToken(&'static str);

    impl Interceptor for StaticToken {
        fn on_request(&self, request: ApiRequest) -> ApiRequest {
            attach_credential(request, Some(self.0))
        }
    }

    #[derive(Default)]
    struct StatusLog(Mutex<Vec<u16>>);

    impl Interceptor for StatusLog {
        fn on_response(&self, _request: &ApiRequest, response: &ApiResponse) {
            self.0.lock().push(response.status.as_u16());
        }
    }

    #[tokio::test]
    async fn test_interceptors_wrap_every_call() {
        let transport = ScriptedTransport::new();
        transport.respond_json(
            Method::GET,
            "/documents",
            StatusCode::OK,
            json!({"documents": []}),
        );
        transport.respond_json(
            Method::GET,
            "/auth/me",
            StatusCode::UNAUTHORIZED,
            json!({"error": {"message": "jwt expired"}}),
        );

        let log = Arc::new(StatusLog::default());
        let client = ApiClient::new(Arc::new(transport.clone()))
            .with_interceptor(Arc::new(StaticToken("tok1")))
            .with_interceptor(log.clone());

        let body: serde_json::Value = client.get_json("/documents").await.unwrap();
        assert!(body["documents"].is_array());

        let err = client
            .get_json::<serde_json::Value>("/auth/me")
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Unauthorized { .. }));
        assert_eq!(err.server_message(), Some("jwt expired"));

        assert_eq!(*log.0.lock(), vec![200, 401]);
        for request in transport.requests() {
            assert_eq!(
                request.headers.get(AUTHORIZATION).unwrap(),
                "Bearer tok1"
            );
        }
    }

    #[tokio::test]
    async fn test_api_error_without_envelope() {
        let transport = ScriptedTransport::new();
        transport.respond(
            Method::POST,
            "/documents/analyze",
            ApiResponse::new(StatusCode::BAD_GATEWAY, b"upstream down".to_vec()),
        );
        let client = ApiClient::new(Arc::new(transport));

        let err = client
            .post_multipart::<serde_json::Value>("/documents/analyze", Vec::new())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
        assert_eq!(err.server_message(), None);
    }

    #[tokio::test]
    async fn test_network_failure_skips_response_hooks() {
        let transport = ScriptedTransport::new();
        transport.fail(Method::GET, "/documents", "connection reset");

        let log = Arc::new(StatusLog::default());
        let client = ApiClient::new(Arc::new(transport)).with_interceptor(log.clone());

        let err = client.get_bytes("/documents").await.unwrap_err();
        assert!(err.is_network());
        assert!(log.0.lock().is_empty());
    }

    #[test]
    fn test_url_for() {
        let client = ApiClient::new(Arc::new(ScriptedTransport::new()));
        assert_eq!(
            client.url_for("/documents/3/download").unwrap().as_str(),
            "http://localhost/api/documents/3/download"
        );
    }
}
