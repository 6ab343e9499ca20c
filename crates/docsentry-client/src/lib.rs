//! DocSentry API Client
//!
//! HTTP plumbing shared by the session and document services:
//! - transport-neutral request/response values
//! - a [`Transport`] seam with a reqwest implementation and a scripted one
//! - an [`ApiClient`] that runs injected [`Interceptor`]s around every call
//! - the notification bus front ends render as toasts

mod client;
mod envelope;
mod error;
mod notify;
pub mod policy;
mod request;
mod scripted;
mod transport;

pub use client::ApiClient;
pub use envelope::{error_message, ErrorBody, ErrorEnvelope};
pub use error::ClientError;
pub use notify::{drain as drain_notifications, Notification, NotificationLevel, Notifier};
pub use policy::{attach_credential, inspect_response, Interceptor, ResponseVerdict};
pub use request::{ApiRequest, ApiResponse, FormPart, PartValue, RequestBody};
pub use scripted::ScriptedTransport;
pub use transport::{
    join_api_path, parse_base_url, ReqwestTransport, Transport, MAX_RESPONSE_BYTES,
};

pub use reqwest::{Method, StatusCode};
pub use url::Url;

pub type Result<T> = std::result::Result<T, ClientError>;
