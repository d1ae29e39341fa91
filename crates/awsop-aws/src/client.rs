//! Base AWS HTTP client with SigV4 signing.
//!
//! One `AwsClient` serves every operation of every service. It resolves the
//! endpoint, signs with `aws-sigv4` using credentials from the SDK provider
//! chain, sends exactly once, and turns the response into either the
//! operation's typed output or an [`AwsError`]. No retries happen here.

use crate::config::{AwsRegion, ClientSettings};
use crate::error::{AwsError, AwsResult};
use crate::protocol::{AwsOperation, ServiceSpec, WireRequest};
use async_trait::async_trait;
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_sigv4::http_request::{sign, SignableBody, SignableRequest, SigningSettings};
use aws_sigv4::sign::v4;
use awsop_core::Invoke;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::SystemTime;

const USER_AGENT: &str = concat!("awsop/", env!("CARGO_PKG_VERSION"));

/// Raw response from an AWS API call.
#[derive(Debug, Clone)]
pub struct AwsResponse {
    pub status: u16,
    pub body: Vec<u8>,
    pub request_id: Option<String>,
    pub error_type: Option<String>,
}

/// Shared, cheaply clonable AWS client.
#[derive(Debug, Clone)]
pub struct AwsClient {
    http: Client,
    credentials: SharedCredentialsProvider,
    region: AwsRegion,
    settings: ClientSettings,
    user_agent: String,
}

impl AwsClient {
    /// Build a client from settings and an explicit credentials provider.
    pub fn new(settings: ClientSettings, credentials: SharedCredentialsProvider) -> AwsResult<Self> {
        settings.validate()?;
        let region = settings
            .region
            .as_deref()
            .map(AwsRegion::new)
            .ok_or_else(|| {
                AwsError::config("no region configured; set --region, AWS_REGION or a profile region")
            })?;

        let http = Client::builder()
            .timeout(settings.request_timeout())
            .connect_timeout(settings.connect_timeout())
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| AwsError::internal("http", &format!("cannot build HTTP client: {}", e)))?;

        let user_agent = match settings.user_agent_suffix {
            Some(ref suffix) => format!("{} {}", USER_AGENT, suffix),
            None => USER_AGENT.to_string(),
        };

        Ok(Self {
            http,
            credentials,
            region,
            settings,
            user_agent,
        })
    }

    /// Build a client using the SDK default credential chain (environment,
    /// profile, SSO, IMDS). The region falls back to whatever the SDK
    /// resolves when the settings leave it unset.
    pub async fn connect(mut settings: ClientSettings) -> AwsResult<Self> {
        settings.validate()?;
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(ref profile) = settings.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(ref region) = settings.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        let sdk = loader.load().await;

        if settings.region.is_none() {
            settings.region = sdk.region().map(|r| r.to_string());
        }
        let credentials = sdk.credentials_provider().ok_or_else(|| {
            AwsError::credential_error("no AWS credentials provider could be resolved")
        })?;
        log::debug!(
            "AWS client ready (region: {}, profile: {})",
            settings.region.as_deref().unwrap_or("<none>"),
            settings.profile.as_deref().unwrap_or("default")
        );
        Self::new(settings, credentials)
    }

    pub fn region_name(&self) -> &str {
        &self.region.name
    }

    /// Base endpoint for a service after overrides.
    pub fn endpoint(&self, service: &ServiceSpec) -> String {
        self.settings
            .endpoint_for(service.name, service.endpoint_prefix, &self.region)
    }

    /// Sign and send one request. Non-2xx responses become errors.
    pub async fn send(
        &self,
        service: &ServiceSpec,
        action: &str,
        request: &WireRequest,
    ) -> AwsResult<AwsResponse> {
        let endpoint = self.endpoint(service);
        let url = request.url(&endpoint)?;
        let host = host_header(&url)
            .ok_or_else(|| AwsError::config(&format!("endpoint '{}' has no host", endpoint)))?;

        let mut headers: Vec<(String, String)> = vec![("host".to_string(), host)];
        headers.extend(
            request
                .headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone())),
        );
        self.sign(service, &request.method, &url, &mut headers, &request.body)
            .await
            .map_err(|e| e.with_action(action))?;

        log::debug!("AWS {} {} → {} {}", service.name, action, request.method, url);

        let mut builder = self.http.request(request.method.clone(), url.clone());
        for (name, value) in &headers {
            // reqwest derives Host from the URL
            if name != "host" {
                builder = builder.header(name.as_str(), value.as_str());
            }
        }
        builder = builder.header("user-agent", &self.user_agent);
        if !request.body.is_empty() {
            builder = builder.body(request.body.clone());
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| AwsError::from_transport(service.name, &endpoint, &e).with_action(action))?;

        let status = resp.status().as_u16();
        let header = |name: &str| {
            resp.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let request_id = header("x-amzn-requestid").or_else(|| header("x-amz-request-id"));
        let error_type = header("x-amzn-errortype");
        let body = resp
            .bytes()
            .await
            .map_err(|e| AwsError::from_transport(service.name, &endpoint, &e).with_action(action))?
            .to_vec();

        if !(200..300).contains(&status) {
            let text = String::from_utf8_lossy(&body);
            let mut err = AwsError::parse_json_error(service.name, status, &text, error_type.as_deref())
                .with_action(action);
            if let Some(id) = request_id {
                err = err.with_request_id(id);
            }
            log::debug!("{}", err);
            return Err(err);
        }

        Ok(AwsResponse {
            status,
            body,
            request_id,
            error_type,
        })
    }

    async fn sign(
        &self,
        service: &ServiceSpec,
        method: &reqwest::Method,
        url: &url::Url,
        headers: &mut Vec<(String, String)>,
        body: &[u8],
    ) -> AwsResult<()> {
        let credentials = self
            .credentials
            .provide_credentials()
            .await
            .map_err(|e| AwsError::credential_error(&format!("failed to load AWS credentials: {}", e)))?;
        let identity = credentials.into();

        let signable_request = SignableRequest::new(
            method.as_str(),
            url.as_str(),
            headers.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            SignableBody::Bytes(body),
        )
        .map_err(|e| AwsError::internal(service.name, &format!("request cannot be signed: {}", e)))?;

        let signing_params = v4::SigningParams::builder()
            .identity(&identity)
            .region(&self.region.name)
            .name(service.signing_name)
            .time(SystemTime::now())
            .settings(SigningSettings::default())
            .build()
            .map_err(|e| AwsError::internal(service.name, &format!("signing parameters: {}", e)))?
            .into();

        let (instructions, _signature) = sign(signable_request, &signing_params)
            .map_err(|e| AwsError::internal(service.name, &format!("signing failed: {}", e)))?
            .into_parts();

        for (name, value) in instructions.headers() {
            headers.push((name.to_string(), value.to_string()));
        }
        Ok(())
    }
}

/// `host[:port]`, as it goes into the signed `host` header.
fn host_header(url: &url::Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// Decode a success body; an empty body is an empty object.
pub fn decode_body<T: DeserializeOwned>(service: &str, response: &AwsResponse) -> AwsResult<T> {
    let body: &[u8] = if response.body.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        &response.body
    };
    serde_json::from_slice(body).map_err(|e| {
        let mut err = AwsError::deserialization(service, response.status, &e);
        if let Some(ref id) = response.request_id {
            err = err.with_request_id(id.clone());
        }
        err
    })
}

#[async_trait]
impl<O> Invoke<O> for AwsClient
where
    O: AwsOperation,
    O::Response: DeserializeOwned,
{
    type Error = AwsError;

    async fn invoke(&self, request: &O::Request) -> Result<O::Response, AwsError> {
        let wire = O::wire_request(request).map_err(|e| e.with_action(O::NAME))?;
        let response = self.send(O::SERVICE, O::NAME, &wire).await?;
        decode_body(O::SERVICE.name, &response).map_err(|e| e.with_action(O::NAME))
    }
}
