//! AWS error types mirroring the official AWS SDK error model.
//!
//! Every failure the AWS binding produces, whether a service fault, a
//! transport problem or a bad local setting, is an [`AwsError`] so callers
//! match on one `code` field.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Code used when the endpoint could not be reached at all.
pub const ENDPOINT_UNREACHABLE: &str = "EndpointUnreachable";

/// Top-level error type for all AWS operations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AwsError {
    /// The AWS error code (e.g., "PipelineNotFoundException").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// HTTP status code, 0 when no response was received.
    pub status_code: u16,
    /// Request ID from the `x-amzn-RequestId` response header.
    pub request_id: Option<String>,
    /// The service that returned the error (e.g., "codepipeline").
    pub service: String,
    /// The API action that failed.
    pub action: Option<String>,
}

impl fmt::Display for AwsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AWS {}", self.service)?;
        if let Some(ref action) = self.action {
            write!(f, " {}", action)?;
        }
        write!(f, " error [{}]: {}", self.code, self.message)?;
        if self.status_code != 0 {
            write!(f, " (HTTP {})", self.status_code)?;
        }
        if let Some(ref req_id) = self.request_id {
            write!(f, " [RequestId: {}]", req_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for AwsError {}

impl AwsError {
    pub fn new(service: &str, code: &str, message: &str, status_code: u16) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            status_code,
            request_id: None,
            service: service.to_string(),
            action: None,
        }
    }

    /// A failure inside this client rather than from AWS.
    pub fn internal(service: &str, msg: &str) -> Self {
        Self::new(service, "InternalError", msg, 0)
    }

    pub fn credential_error(message: &str) -> Self {
        Self::new("sts", "CredentialError", message, 0)
    }

    /// Invalid local configuration (region, endpoint, config file).
    pub fn config(message: &str) -> Self {
        Self::new("config", "ConfigError", message, 0)
    }

    /// The response body did not match the expected shape.
    pub fn deserialization(service: &str, status_code: u16, err: &serde_json::Error) -> Self {
        Self::new(
            service,
            "DeserializationError",
            &format!("unexpected response body: {}", err),
            status_code,
        )
    }

    pub fn with_request_id(mut self, id: String) -> Self {
        self.request_id = Some(id);
        self
    }

    pub fn with_action(mut self, action: &str) -> Self {
        self.action = Some(action.to_string());
        self
    }

    /// True when the request never reached a server.
    pub fn is_unreachable(&self) -> bool {
        self.code == ENDPOINT_UNREACHABLE
    }

    /// Map a transport failure.
    ///
    /// Connection and name-resolution failures are rewritten to name the
    /// endpoint, since the usual cause is a wrong region or endpoint
    /// override. Anything else keeps the transport's own message.
    pub fn from_transport(service: &str, endpoint: &str, err: &reqwest::Error) -> Self {
        if err.is_connect() {
            return Self::new(
                service,
                ENDPOINT_UNREACHABLE,
                &format!(
                    "could not connect to {} ({}); check the region and endpoint settings",
                    endpoint, err
                ),
                0,
            );
        }
        let code = if err.is_timeout() {
            "RequestTimeout"
        } else {
            "HttpError"
        };
        Self::new(
            service,
            code,
            &err.to_string(),
            err.status().map(|s| s.as_u16()).unwrap_or(0),
        )
    }

    /// Parse an AWS JSON or REST-JSON error response.
    ///
    /// AWS JSON error format:
    /// ```json
    /// {
    ///   "__type": "com.amazonaws.codepipeline#PipelineNotFoundException",
    ///   "message": "Pipeline not found"
    /// }
    /// ```
    ///
    /// REST-JSON services may put the code only in the `x-amzn-ErrorType`
    /// header (`ValidationException:http://internal.amazon.com/...`).
    pub fn parse_json_error(
        service: &str,
        status_code: u16,
        body: &str,
        error_type_header: Option<&str>,
    ) -> Self {
        let header_code = error_type_header
            .and_then(|h| h.split(':').next())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(strip_namespace);

        let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
        let body_code = parsed.as_ref().and_then(|val| {
            val.get("__type")
                .or_else(|| val.get("code"))
                .or_else(|| val.get("Code"))
                .and_then(|v| v.as_str())
                .map(strip_namespace)
        });
        let message = parsed.as_ref().and_then(|val| {
            val.get("message")
                .or_else(|| val.get("Message"))
                .or_else(|| val.get("errorMessage"))
                .and_then(|v| v.as_str())
                .map(str::to_string)
        });

        match (header_code.or(body_code), message) {
            (Some(code), Some(message)) => Self::new(service, &code, &message, status_code),
            (Some(code), None) => Self::new(service, &code, &format!("HTTP {} from {}", status_code, service), status_code),
            (None, Some(message)) => Self::new(service, "UnknownError", &message, status_code),
            (None, None) if parsed.is_some() || body.trim().is_empty() => Self::new(
                service,
                "UnknownError",
                &format!("HTTP {} from {}", status_code, service),
                status_code,
            ),
            (None, None) => Self::new(
                service,
                "ParseError",
                &format!(
                    "Failed to parse error response: {}",
                    body.chars().take(200).collect::<String>()
                ),
                status_code,
            ),
        }
    }
}

/// `com.amazonaws.codepipeline#PipelineNotFoundException` → `PipelineNotFoundException`
fn strip_namespace(code: &str) -> String {
    code.rsplit('#').next().unwrap_or(code).to_string()
}

/// Convenience result type for AWS operations.
pub type AwsResult<T> = Result<T, AwsError>;
