//! Wire shapes for the two AWS protocols in use.
//!
//! | Protocol     | Request                                                  |
//! |--------------|----------------------------------------------------------|
//! | AWS JSON 1.1 | `POST /`, `x-amz-target: <Prefix>.<Operation>`, JSON body |
//! | REST JSON    | method + path + query string, optional JSON body         |
//!
//! An operation only describes its request; signing, sending and decoding
//! are done once in [`crate::client::AwsClient`].

use crate::error::{AwsError, AwsResult};
use awsop_core::Operation;
use reqwest::Method;
use serde::Serialize;

/// Identity of one AWS service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceSpec {
    /// Service name used in errors, logs and per-service endpoint overrides.
    pub name: &'static str,
    /// First DNS label(s) of the regional endpoint.
    pub endpoint_prefix: &'static str,
    /// SigV4 signing name.
    pub signing_name: &'static str,
}

/// A request ready to be signed.
#[derive(Debug, Clone, PartialEq)]
pub struct WireRequest {
    pub method: Method,
    /// Path segments, percent-encoded when the URL is built.
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(&'static str, String)>,
    pub body: Vec<u8>,
}

impl WireRequest {
    /// AWS JSON 1.1: everything goes in the body, the operation in a header.
    pub fn aws_json<T: Serialize>(target_prefix: &str, operation: &str, body: &T) -> AwsResult<Self> {
        Ok(Self {
            method: Method::POST,
            segments: Vec::new(),
            query: Vec::new(),
            headers: vec![
                ("content-type", "application/x-amz-json-1.1".to_string()),
                ("x-amz-target", format!("{}.{}", target_prefix, operation)),
            ],
            body: encode(body)?,
        })
    }

    /// REST JSON with a request body.
    pub fn rest_json<T: Serialize>(method: Method, path: &[&str], body: &T) -> AwsResult<Self> {
        Ok(Self {
            method,
            segments: path.iter().map(|s| s.to_string()).collect(),
            query: Vec::new(),
            headers: vec![("content-type", "application/json".to_string())],
            body: encode(body)?,
        })
    }

    /// REST JSON without a body (GET).
    pub fn rest(method: Method, path: &[&str]) -> Self {
        Self {
            method,
            segments: path.iter().map(|s| s.to_string()).collect(),
            query: Vec::new(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Add a query parameter when `value` is set.
    pub fn query<V: ToString>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.query.push((key.to_string(), value.to_string()));
        }
        self
    }

    /// Add a comma-joined list parameter when the list is non-empty.
    pub fn query_list<V: AsRef<str>>(self, key: &str, values: &[V]) -> Self {
        if values.is_empty() {
            return self;
        }
        let joined = values
            .iter()
            .map(|v| v.as_ref())
            .collect::<Vec<_>>()
            .join(",");
        self.query(key, Some(joined))
    }

    /// Full URL against a base endpoint.
    pub fn url(&self, base: &str) -> AwsResult<url::Url> {
        let mut url = url::Url::parse(base)
            .map_err(|e| AwsError::config(&format!("invalid endpoint '{}': {}", base, e)))?;
        if !self.segments.is_empty() {
            url.path_segments_mut()
                .map_err(|_| AwsError::config(&format!("endpoint '{}' cannot carry a path", base)))?
                .pop_if_empty()
                .extend(&self.segments);
        }
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        Ok(url)
    }
}

fn encode<T: Serialize>(body: &T) -> AwsResult<Vec<u8>> {
    serde_json::to_vec(body)
        .map_err(|e| AwsError::internal("serialization", &format!("cannot encode request: {}", e)))
}

/// An operation the AWS client can send.
pub trait AwsOperation: Operation {
    const SERVICE: &'static ServiceSpec;

    fn wire_request(request: &Self::Request) -> AwsResult<WireRequest>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn aws_json_sets_target_header() {
        let req = WireRequest::aws_json("CodePipeline_20150709", "ListPipelines", &json!({})).unwrap();
        assert_eq!(req.method, Method::POST);
        assert!(req
            .headers
            .contains(&("x-amz-target", "CodePipeline_20150709.ListPipelines".to_string())));
        assert_eq!(req.body, b"{}");
        assert_eq!(
            req.url("https://codepipeline.us-east-1.amazonaws.com").unwrap().as_str(),
            "https://codepipeline.us-east-1.amazonaws.com/"
        );
    }

    #[test]
    fn rest_path_segments_are_encoded() {
        let req = WireRequest::rest(Method::GET, &["v2", "place", "AQAAA/b+c"])
            .query("key", Some("k1"))
            .query::<String>("language", None)
            .query_list("additional-features", &["Contact", "Phonemes"]);
        let url = req.url("http://localhost:4566/").unwrap();
        assert_eq!(url.path(), "/v2/place/AQAAA%2Fb+c");
        assert_eq!(
            url.query(),
            Some("key=k1&additional-features=Contact%2CPhonemes")
        );
    }

    #[test]
    fn rest_json_has_content_type() {
        let req = WireRequest::rest_json(Method::POST, &["v2", "search-text"], &json!({"QueryText": "cafe"})).unwrap();
        assert!(req.headers.contains(&("content-type", "application/json".to_string())));
        assert_eq!(
            req.url("https://places.geo.eu-west-1.amazonaws.com").unwrap().path(),
            "/v2/search-text"
        );
    }
}
