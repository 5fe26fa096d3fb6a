use super::error::Error;

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::{provider::SharedCredentialsProvider, Credentials};
use tokio::time::Duration;

/// Any credentials are accepted by dynamodb-local.
const ACCESS_KEY_ID: &str = "localDb";
const SECRET_ACCESS_KEY: &str = "randomAnyString";

/// Settings read once at startup to decide whether and where to poll.
#[derive(Debug, Clone)]
pub struct SandboxConfig {
    enabled: bool,
    port: Option<u16>,
    region: String,
    interval: Duration,
}

impl SandboxConfig {
    pub fn new() -> Self {
        Self {
            enabled: false,
            port: None,
            region: "us-west-2".to_string(),
            interval: Duration::from_secs(2),
        }
    }

    /// Turn polling on. It is off by default: the local tables are only available when
    /// an external dynamodb-local instance is used.
    pub fn enabled(self, enabled: bool) -> Self {
        Self { enabled, ..self }
    }

    /// Set the port dynamodb-local listens on.
    pub fn port(self, port: Option<u16>) -> Self {
        Self { port, ..self }
    }

    pub fn region(self, region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            ..self
        }
    }

    pub fn interval(self, interval: Duration) -> Self {
        Self { interval, ..self }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn tick_interval(&self) -> Duration {
        self.interval
    }

    pub fn endpoint_url(&self) -> Result<String, Error> {
        self.port
            .map(|port| format!("http://localhost:{port}"))
            .ok_or_else(|| Error::Configuration("no port is set for the local tables".into()))
    }

    /// Build the AWS SDK configuration targeting the local endpoint.
    pub fn sdk_config(&self) -> Result<SdkConfig, Error> {
        let creds = Credentials::from_keys(ACCESS_KEY_ID, SECRET_ACCESS_KEY, None);

        Ok(SdkConfig::builder()
            .endpoint_url(self.endpoint_url()?)
            .credentials_provider(SharedCredentialsProvider::new(creds))
            .behavior_version(BehaviorVersion::latest())
            .region(Some(Region::new(self.region.clone())))
            .build())
    }
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self::new()
    }
}
