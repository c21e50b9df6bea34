//! Bucket connection configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use url::{Host, Url};

use crate::credentials::Credentials;
use crate::error::{Error, Result};

/// Default region of the bucket.
pub const DEFAULT_REGION: &str = "ap-south-1";

/// Default endpoint of the object store.
pub const DEFAULT_ENDPOINT: &str = "https://ap-south-1.linodeobjects.com";

/// Default bucket name.
pub const DEFAULT_BUCKET: &str = "www";

/// Default timeout for live listing requests: 30 seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for one S3-compatible bucket.
///
/// Every field is optional on the command line and in the environment.
/// Without both an access key and a secret key the facade never goes live
/// and answers from its fallback table.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct BucketConfig {
    /// Access key identifier
    #[cfg_attr(feature = "config", arg(long = "s3-access-key", env = "S3_ACCESS_KEY"))]
    #[serde(default)]
    pub access_key: Option<String>,

    /// Secret access key
    #[cfg_attr(
        feature = "config",
        arg(long = "s3-secret-key", env = "S3_SECRET_KEY", hide_env_values = true)
    )]
    #[serde(default, skip_serializing)]
    pub secret_key: Option<String>,

    /// Session token for temporary credentials
    #[cfg_attr(
        feature = "config",
        arg(long = "s3-session-token", env = "S3_SESSION_TOKEN", hide_env_values = true)
    )]
    #[serde(default, skip_serializing)]
    pub session_token: Option<String>,

    /// Region used in the request signature
    #[cfg_attr(
        feature = "config",
        arg(long = "s3-region", env = "S3_REGION", default_value = DEFAULT_REGION)
    )]
    #[serde(default = "default_region")]
    pub region: String,

    /// Object store endpoint, including the scheme
    #[cfg_attr(
        feature = "config",
        arg(long = "s3-endpoint", env = "S3_ENDPOINT", default_value = DEFAULT_ENDPOINT)
    )]
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Bucket name
    #[cfg_attr(
        feature = "config",
        arg(long = "s3-bucket", env = "S3_BUCKET", default_value = DEFAULT_BUCKET)
    )]
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// HTTP request timeout in seconds
    #[cfg_attr(
        feature = "config",
        arg(long = "http-timeout", env = "HTTP_TIMEOUT", default_value = "30")
    )]
    #[serde(default = "default_timeout_secs")]
    pub http_timeout: u64,

    /// User-Agent header to send with requests
    #[cfg_attr(
        feature = "config",
        arg(long = "http-user-agent", env = "HTTP_USER_AGENT")
    )]
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_bucket() -> String {
    DEFAULT_BUCKET.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for BucketConfig {
    fn default() -> Self {
        Self {
            access_key: None,
            secret_key: None,
            session_token: None,
            region: default_region(),
            endpoint: default_endpoint(),
            bucket: default_bucket(),
            http_timeout: default_timeout_secs(),
            user_agent: None,
        }
    }
}

impl BucketConfig {
    /// Creates a configuration for the given endpoint and bucket.
    pub fn new(endpoint: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            bucket: bucket.into(),
            ..Self::default()
        }
    }

    /// Sets the access credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    /// Sets the region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Sets the timeout in seconds.
    #[must_use]
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.http_timeout = timeout_secs;
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Returns the credentials when both keys are present and non-empty.
    pub fn credentials(&self) -> Option<Credentials> {
        let access_key = self.access_key.as_deref().filter(|k| !k.is_empty())?;
        let secret_key = self.secret_key.as_deref().filter(|k| !k.is_empty())?;

        let credentials = Credentials::new(access_key, secret_key);
        Some(match self.session_token.as_deref().filter(|t| !t.is_empty()) {
            Some(token) => credentials.with_session_token(token),
            None => credentials,
        })
    }

    /// Returns whether live requests can be signed.
    pub fn has_credentials(&self) -> bool {
        self.credentials().is_some()
    }

    /// Returns the effective timeout, using default if zero.
    pub fn effective_timeout(&self) -> Duration {
        if self.http_timeout == 0 {
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        } else {
            Duration::from_secs(self.http_timeout)
        }
    }

    /// Returns the effective user agent, using default if not set.
    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .filter(|ua| !ua.is_empty())
            .unwrap_or_else(|| format!("bucketview/{}", env!("CARGO_PKG_VERSION")))
    }

    /// Returns the endpoint without a trailing slash.
    pub fn endpoint_trimmed(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }

    /// Returns the public retrieval URL of a key: `{endpoint}/{bucket}/{key}`.
    pub fn url_for(&self, key: &str) -> String {
        format!("{}/{}/{}", self.endpoint_trimmed(), self.bucket, key)
    }

    /// Returns the URL listing requests are sent to.
    ///
    /// Named hosts get the virtual-hosted form `{scheme}://{bucket}.{host}/`.
    /// IP literals and `localhost` cannot carry a bucket subdomain, so they
    /// get the path-style form `{endpoint}/{bucket}/`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the endpoint is not an absolute
    /// http(s) URL with a host.
    pub fn bucket_url(&self) -> Result<Url> {
        let endpoint = Url::parse(self.endpoint_trimmed())?;

        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(Error::configuration().with_message(format!(
                "unsupported endpoint scheme '{}'",
                endpoint.scheme()
            )));
        }

        let host = endpoint.host().ok_or_else(|| {
            Error::configuration().with_message("endpoint must include a hostname")
        })?;

        let mut url = endpoint.clone();
        url.set_query(None);
        match host {
            Host::Domain(domain) if domain != "localhost" => {
                url.set_host(Some(&format!("{}.{domain}", self.bucket)))?;
                url.set_path("/");
            }
            _ => {
                let base = endpoint.path().trim_end_matches('/');
                url.set_path(&format!("{base}/{}/", self.bucket));
            }
        }
        Ok(url)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the bucket name is empty or the
    /// endpoint cannot be turned into a bucket URL.
    pub fn validate(&self) -> Result<()> {
        if self.bucket.is_empty() {
            return Err(Error::configuration().with_message("bucket cannot be empty"));
        }
        if self.region.is_empty() {
            return Err(Error::configuration().with_message("region cannot be empty"));
        }
        self.bucket_url()?;
        Ok(())
    }
}

impl std::fmt::Debug for BucketConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BucketConfig")
            .field("endpoint", &self.endpoint)
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("has_credentials", &self.has_credentials())
            .field("http_timeout", &self.http_timeout)
            .finish_non_exhaustive()
    }
}
