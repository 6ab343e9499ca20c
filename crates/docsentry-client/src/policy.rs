//! Request/response interception
//!
//! The policy is two pure functions: [`attach_credential`] decorates an
//! outgoing request, [`inspect_response`] classifies an incoming status.
//! Stateful owners (the session) wrap them in an [`Interceptor`] that is
//! handed to the [`ApiClient`](crate::ApiClient) when it is built.

use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;

use crate::request::{ApiRequest, ApiResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseVerdict {
    Pass,
    SessionExpired,
}

/// Hooks run by the client around every call.
pub trait Interceptor: Send + Sync {
    fn on_request(&self, request: ApiRequest) -> ApiRequest {
        request
    }

    fn on_response(&self, _request: &ApiRequest, _response: &ApiResponse) {}
}

/// Add `Authorization: Bearer <credential>` when a credential is present.
pub fn attach_credential(mut request: ApiRequest, credential: Option<&str>) -> ApiRequest {
    let Some(token) = credential.filter(|token| !token.is_empty()) else {
        return request;
    };

    match HeaderValue::from_str(&format!("Bearer {}", token)) {
        Ok(mut value) => {
            value.set_sensitive(true);
            request.headers.insert(AUTHORIZATION, value);
        }
        Err(_) => {
            tracing::warn!(
                path = %request.path,
                "Stored credential is not a valid header value, sending without it"
            );
        }
    }

    request
}

/// Any 401 ends the session, whichever endpoint answered it.
pub fn inspect_response(status: StatusCode) -> ResponseVerdict {
    if status == StatusCode::UNAUTHORIZED {
        ResponseVerdict::SessionExpired
    } else {
        ResponseVerdict::Pass
    }
}
