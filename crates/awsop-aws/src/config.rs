//! Client configuration and region handling.
//!
//! Settings are layered, lowest precedence first:
//!
//! | Layer        | Source                                             |
//! |--------------|----------------------------------------------------|
//! | defaults     | [`ClientSettings::default`]                        |
//! | config file  | `<config dir>/awsop/config.yaml` or `--config`     |
//! | environment  | `AWS_REGION`, `AWS_DEFAULT_REGION`, `AWS_PROFILE`, `AWS_ENDPOINT_URL`, `AWSOP_REQUEST_TIMEOUT_SECS` |
//! | flags        | whatever the caller passes to [`ClientSettings::apply`] |
//!
//! Credentials are not configured here; they come from the SDK's default
//! provider chain, optionally pinned to `profile`.

use crate::error::{AwsError, AwsResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ── Regions ─────────────────────────────────────────────────────────────

/// All standard AWS regions as of 2025.
pub const AWS_REGIONS: &[&str] = &[
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
    "af-south-1",
    "ap-east-1",
    "ap-south-1",
    "ap-south-2",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-southeast-3",
    "ap-southeast-4",
    "ap-southeast-5",
    "ap-southeast-7",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-northeast-3",
    "ca-central-1",
    "ca-west-1",
    "eu-central-1",
    "eu-central-2",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "eu-south-1",
    "eu-south-2",
    "eu-north-1",
    "il-central-1",
    "me-south-1",
    "me-central-1",
    "mx-central-1",
    "sa-east-1",
    // GovCloud
    "us-gov-east-1",
    "us-gov-west-1",
    // China
    "cn-north-1",
    "cn-northwest-1",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AwsRegion {
    /// Region code (e.g., "us-east-1").
    pub name: String,
}

impl AwsRegion {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    /// Regional endpoint: `https://{prefix}.{region}.amazonaws.com`.
    pub fn endpoint(&self, endpoint_prefix: &str) -> String {
        format!(
            "https://{}.{}.{}",
            endpoint_prefix,
            self.name,
            self.dns_suffix()
        )
    }

    pub fn dns_suffix(&self) -> &str {
        if self.name.starts_with("cn-") {
            "amazonaws.com.cn"
        } else {
            "amazonaws.com"
        }
    }

    pub fn is_valid(&self) -> bool {
        AWS_REGIONS.contains(&self.name.as_str())
    }
}

impl std::fmt::Display for AwsRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

// ── Settings ────────────────────────────────────────────────────────────

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientSettings {
    /// Region; when unset the SDK's own resolution (profile, IMDS) applies.
    pub region: Option<String>,
    /// Named profile for credentials and region.
    pub profile: Option<String>,
    /// Endpoint override for every service (LocalStack, proxies).
    pub endpoint_url: Option<String>,
    /// Per-service endpoint overrides keyed by service name
    /// (`codepipeline`, `geo-places`). These win over `endpoint_url`.
    pub endpoints: BTreeMap<String, String>,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// Appended to the User-Agent header.
    pub user_agent_suffix: Option<String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            region: None,
            profile: None,
            endpoint_url: None,
            endpoints: BTreeMap::new(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            user_agent_suffix: None,
        }
    }
}

/// One layer of overrides. Unset fields leave the layer below untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsOverride {
    pub region: Option<String>,
    pub profile: Option<String>,
    pub endpoint_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

impl SettingsOverride {
    /// Read the environment layer through `lookup`.
    pub fn from_env_with<F>(lookup: F) -> AwsResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let request_timeout_secs = match non_empty("AWSOP_REQUEST_TIMEOUT_SECS") {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|e| {
                AwsError::config(&format!(
                    "AWSOP_REQUEST_TIMEOUT_SECS must be a whole number of seconds: {}",
                    e
                ))
            })?),
            None => None,
        };
        Ok(Self {
            region: non_empty("AWS_REGION").or_else(|| non_empty("AWS_DEFAULT_REGION")),
            profile: non_empty("AWS_PROFILE"),
            endpoint_url: non_empty("AWS_ENDPOINT_URL"),
            request_timeout_secs,
        })
    }

    pub fn from_env() -> AwsResult<Self> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }
}

impl ClientSettings {
    /// `<config dir>/awsop/config.yaml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("awsop").join("config.yaml"))
    }

    pub fn from_file(path: &Path) -> AwsResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AwsError::config(&format!("cannot read {}: {}", path.display(), e))
        })?;
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&raw)
            .map_err(|e| AwsError::config(&format!("invalid config {}: {}", path.display(), e)))
    }

    /// Defaults plus the config file. An explicit path must exist; the
    /// default path is optional.
    pub fn load(explicit: Option<&Path>) -> AwsResult<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => {
                log::debug!("loading config from {}", path.display());
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn apply(&mut self, layer: SettingsOverride) {
        if layer.region.is_some() {
            self.region = layer.region;
        }
        if layer.profile.is_some() {
            self.profile = layer.profile;
        }
        if layer.endpoint_url.is_some() {
            self.endpoint_url = layer.endpoint_url;
        }
        if let Some(secs) = layer.request_timeout_secs {
            self.request_timeout_secs = secs;
        }
    }

    pub fn validate(&self) -> AwsResult<()> {
        if let Some(ref region) = self.region {
            if region.trim().is_empty() {
                return Err(AwsError::config("region must not be empty"));
            }
            if !AwsRegion::new(region).is_valid() {
                log::warn!("region '{}' is not a known AWS region", region);
            }
        }
        if let Some(ref url) = self.endpoint_url {
            validate_endpoint("endpoint_url", url)?;
        }
        for (service, url) in &self.endpoints {
            validate_endpoint(&format!("endpoints.{}", service), url)?;
        }
        if self.request_timeout_secs == 0 {
            return Err(AwsError::config("request_timeout_secs must be greater than 0"));
        }
        if self.connect_timeout_secs == 0 {
            return Err(AwsError::config("connect_timeout_secs must be greater than 0"));
        }
        Ok(())
    }

    /// Base URL for a service: per-service override, global override, then
    /// the regional endpoint.
    pub fn endpoint_for(&self, service: &str, endpoint_prefix: &str, region: &AwsRegion) -> String {
        self.endpoints
            .get(service)
            .or(self.endpoint_url.as_ref())
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| region.endpoint(endpoint_prefix))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

fn validate_endpoint(field: &str, raw: &str) -> AwsResult<()> {
    let parsed = url::Url::parse(raw)
        .map_err(|e| AwsError::config(&format!("{} '{}' is not a URL: {}", field, raw, e)))?;
    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(()),
        _ => Err(AwsError::config(&format!(
            "{} '{}' must be an http(s) URL with a host",
            field, raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn region_endpoint_standard() {
        let r = AwsRegion::new("us-east-1");
        assert_eq!(
            r.endpoint("codepipeline"),
            "https://codepipeline.us-east-1.amazonaws.com"
        );
        assert_eq!(
            r.endpoint("places.geo"),
            "https://places.geo.us-east-1.amazonaws.com"
        );
    }

    #[test]
    fn region_endpoint_china() {
        let r = AwsRegion::new("cn-north-1");
        assert_eq!(
            r.endpoint("codepipeline"),
            "https://codepipeline.cn-north-1.amazonaws.com.cn"
        );
    }

    #[test]
    fn region_is_valid() {
        assert!(AwsRegion::new("eu-west-1").is_valid());
        assert!(!AwsRegion::new("mars-central-1").is_valid());
    }

    #[test]
    fn env_layer_prefers_aws_region() {
        let env = HashMap::from([
            ("AWS_REGION", "eu-west-1"),
            ("AWS_DEFAULT_REGION", "us-west-2"),
            ("AWS_PROFILE", "ci"),
            ("AWSOP_REQUEST_TIMEOUT_SECS", "5"),
        ]);
        let layer =
            SettingsOverride::from_env_with(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(layer.region.as_deref(), Some("eu-west-1"));
        assert_eq!(layer.profile.as_deref(), Some("ci"));
        assert_eq!(layer.request_timeout_secs, Some(5));
    }

    #[test]
    fn env_layer_falls_back_to_default_region() {
        let env = HashMap::from([("AWS_REGION", ""), ("AWS_DEFAULT_REGION", "us-west-2")]);
        let layer =
            SettingsOverride::from_env_with(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(layer.region.as_deref(), Some("us-west-2"));
    }

    #[test]
    fn env_layer_rejects_bad_timeout() {
        let env = HashMap::from([("AWSOP_REQUEST_TIMEOUT_SECS", "soon")]);
        let err =
            SettingsOverride::from_env_with(|k| env.get(k).map(|v| v.to_string())).unwrap_err();
        assert_eq!(err.code, "ConfigError");
    }

    #[test]
    fn later_layers_win() {
        let mut settings = ClientSettings {
            region: Some("us-east-1".into()),
            profile: Some("file".into()),
            ..Default::default()
        };
        settings.apply(SettingsOverride {
            region: Some("eu-central-1".into()),
            ..Default::default()
        });
        assert_eq!(settings.region.as_deref(), Some("eu-central-1"));
        assert_eq!(settings.profile.as_deref(), Some("file"));
    }

    #[test]
    fn loads_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "region: ap-southeast-2\nendpoints:\n  geo-places: http://localhost:4566/\nrequest_timeout_secs: 12"
        )
        .unwrap();
        let settings = ClientSettings::load(Some(file.path())).unwrap();
        assert_eq!(settings.region.as_deref(), Some("ap-southeast-2"));
        assert_eq!(settings.request_timeout_secs, 12);
        assert_eq!(settings.connect_timeout_secs, DEFAULT_CONNECT_TIMEOUT_SECS);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClientSettings::load(Some(&dir.path().join("nope.yaml"))).unwrap_err();
        assert_eq!(err.code, "ConfigError");
    }

    #[test]
    fn validate_rejects_empty_region_and_bad_endpoint() {
        let empty = ClientSettings {
            region: Some("  ".into()),
            ..Default::default()
        };
        assert!(empty.validate().is_err());

        let ftp = ClientSettings {
            endpoint_url: Some("ftp://example.com".into()),
            ..Default::default()
        };
        assert!(ftp.validate().is_err());
    }

    #[test]
    fn validate_allows_unknown_region() {
        let settings = ClientSettings {
            region: Some("local-1".into()),
            ..Default::default()
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn endpoint_resolution_order() {
        let region = AwsRegion::new("us-east-1");
        let mut settings = ClientSettings::default();
        assert_eq!(
            settings.endpoint_for("codepipeline", "codepipeline", &region),
            "https://codepipeline.us-east-1.amazonaws.com"
        );
        settings.endpoint_url = Some("http://localhost:4566/".into());
        assert_eq!(
            settings.endpoint_for("codepipeline", "codepipeline", &region),
            "http://localhost:4566"
        );
        settings
            .endpoints
            .insert("codepipeline".into(), "http://127.0.0.1:9000".into());
        assert_eq!(
            settings.endpoint_for("codepipeline", "codepipeline", &region),
            "http://127.0.0.1:9000"
        );
        assert_eq!(
            settings.endpoint_for("geo-places", "places.geo", &region),
            "http://localhost:4566"
        );
    }
}
