//! Signed list-objects-v2 client.

use std::sync::Arc;
use std::time::Instant;

use jiff::Timestamp;
use reqwest::Client;
use url::Url;

use super::response::{parse_listing, status_error};
use super::signing::{Signer, canonical_query};
use super::TRACING_TARGET;
use crate::config::BucketConfig;
use crate::error::{Error, Result};
use crate::provider::ListingProvider;
use crate::types::{ListingRequest, ListingResult, ServiceHealth};

/// Inner client that holds the HTTP client, signer and resolved bucket URL.
struct S3ClientInner {
    http: Client,
    config: BucketConfig,
    signer: Signer,
    bucket_url: Url,
}

/// Live listing client for one S3-compatible bucket.
///
/// Every request is a bodiless `GET` against the virtual-hosted bucket URL,
/// signed with AWS Signature Version 4.
///
/// # Examples
///
/// ```rust,ignore
/// use bucketview_object::reqwest::S3Client;
/// use bucketview_object::{BucketConfig, ListingProvider, ListingRequest};
///
/// let config = BucketConfig::default().with_credentials("AKIA...", "secret");
/// let client = S3Client::new(config)?;
/// let page = client.list_objects(&ListingRequest::new("pic/", 100)).await?;
/// ```
#[derive(Clone)]
pub struct S3Client {
    inner: Arc<S3ClientInner>,
}

impl std::fmt::Debug for S3Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Client")
            .field("config", &self.inner.config)
            .field("bucket_url", &self.inner.bucket_url.as_str())
            .finish_non_exhaustive()
    }
}

impl S3Client {
    /// Creates a client for the configured bucket.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when credentials are missing or the
    /// endpoint is unusable, and a transport error when the HTTP client
    /// cannot be built.
    pub fn new(config: BucketConfig) -> Result<Self> {
        config.validate()?;

        let credentials = config.credentials().ok_or_else(|| {
            Error::configuration().with_message("live listing requires an access key and a secret key")
        })?;

        let timeout = config.effective_timeout();
        let user_agent = config.effective_user_agent();
        let bucket_url = config.bucket_url()?;

        tracing::debug!(
            target: TRACING_TARGET,
            timeout_ms = timeout.as_millis(),
            bucket_url = %bucket_url,
            access_key = %credentials.access_key_masked(),
            "Creating S3 client"
        );

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(&user_agent)
            .build()?;

        let signer = Signer::new(credentials, config.region.clone());
        let inner = S3ClientInner {
            http,
            config,
            signer,
            bucket_url,
        };

        tracing::info!(
            target: TRACING_TARGET,
            "S3 client created successfully"
        );

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &BucketConfig {
        &self.inner.config
    }

    /// Gets the virtual-hosted bucket URL requests are sent to.
    pub fn bucket_url(&self) -> &Url {
        &self.inner.bucket_url
    }

    /// Builds the signed URL query for a listing request.
    fn query_pairs(request: &ListingRequest) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("list-type", "2".to_string()),
            ("max-keys", request.max_keys.to_string()),
        ];
        if !request.prefix.is_empty() {
            pairs.push(("prefix", request.prefix.clone()));
        }
        if let Some(token) = request.continuation_token.as_deref().filter(|t| !t.is_empty()) {
            pairs.push(("continuation-token", token.to_string()));
        }
        pairs
    }

    /// Returns the `host` header value the server will see.
    fn host_header(url: &Url) -> Result<String> {
        let host = url
            .host_str()
            .ok_or_else(|| Error::configuration().with_message("bucket URL has no host"))?;
        Ok(match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl ListingProvider for S3Client {
    async fn list_objects(&self, request: &ListingRequest) -> Result<ListingResult> {
        request.validate()?;

        tracing::debug!(
            target: TRACING_TARGET,
            prefix = %request.prefix,
            max_keys = request.max_keys,
            continued = request.continuation_token.is_some(),
            "Listing objects"
        );

        let pairs = Self::query_pairs(request);
        let query: Vec<(&str, &str)> = pairs.iter().map(|(k, v)| (*k, v.as_str())).collect();

        let mut url = self.inner.bucket_url.clone();
        let host = Self::host_header(&url)?;
        let signed = self
            .inner
            .signer
            .sign("GET", &host, url.path(), &query, Timestamp::now())?;
        url.set_query(Some(&canonical_query(&query)));

        let mut http_request = self.inner.http.get(url.as_str());
        for (name, value) in signed.to_pairs() {
            http_request = http_request.header(name, value);
        }

        let started = Instant::now();
        let response = http_request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                target: TRACING_TARGET,
                status = status.as_u16(),
                prefix = %request.prefix,
                "List request rejected"
            );
            return Err(status_error(status.as_u16(), &body));
        }

        let result = parse_listing(&body, &self.inner.config, request)?;

        tracing::debug!(
            target: TRACING_TARGET,
            prefix = %request.prefix,
            total_count = result.total_count,
            has_more = result.has_more,
            elapsed_ms = started.elapsed().as_millis(),
            "Listing completed"
        );

        Ok(result)
    }

    async fn health_check(&self) -> Result<ServiceHealth> {
        let started = Instant::now();
        let request = ListingRequest::new("", 1);

        Ok(match self.list_objects(&request).await {
            Ok(_) => ServiceHealth::healthy().with_response_time(started.elapsed()),
            Err(err) => ServiceHealth::unhealthy(err.reason()).with_response_time(started.elapsed()),
        })
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::DateTime;
    use jiff::tz::TimeZone;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use super::*;
    use crate::credentials::Credentials;
    use crate::{DEFAULT_REGION, ErrorKind, ListingService};

    const LISTING_BODY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ListBucketResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
  <Name>www</Name>
  <Prefix>pic/</Prefix>
  <IsTruncated>false</IsTruncated>
  <Contents>
    <Key>pic/logo.png</Key>
    <LastModified>2024-01-14T15:20:00.000Z</LastModified>
    <ETag>&quot;def456&quot;</ETag>
    <Size>15432</Size>
    <StorageClass>STANDARD</StorageClass>
  </Contents>
</ListBucketResult>"#;

    const DENIED_BODY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Error><Code>AccessDenied</Code><Message>Access Denied</Message></Error>"#;

    const MALFORMED_BODY: &str = "<ListBucketResult><Contents><Size>oops</Size>";

    fn config() -> BucketConfig {
        BucketConfig::default().with_credentials("AKIAEXAMPLE", "secret")
    }

    /// Serves one canned response on a local port and returns the raw request.
    async fn serve_once(status: &str, body: &str) -> (BucketConfig, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/xml\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let read = socket.read(&mut chunk).await.unwrap();
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..read]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&request).into_owned()
        });

        let config = BucketConfig::new(format!("http://{addr}"), "www")
            .with_credentials("AKIAEXAMPLE", "secret");
        (config, handle)
    }

    fn header<'a>(request: &'a str, name: &str) -> Option<&'a str> {
        request.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.eq_ignore_ascii_case(name).then(|| value.trim())
        })
    }

    #[test]
    fn test_client_creation() {
        let client = S3Client::new(config()).unwrap();
        assert_eq!(
            client.bucket_url().as_str(),
            "https://www.ap-south-1.linodeobjects.com/"
        );
        assert_eq!(client.config().bucket, "www");
    }

    #[test]
    fn test_client_requires_credentials() {
        let err = S3Client::new(BucketConfig::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_query_pairs() {
        let request = ListingRequest::new("pic/", 50);
        let pairs = S3Client::query_pairs(&request);
        assert_eq!(
            pairs,
            [
                ("list-type", "2".to_string()),
                ("max-keys", "50".to_string()),
                ("prefix", "pic/".to_string()),
            ]
        );

        let root = ListingRequest::new("", 100).with_continuation_token("abc");
        let pairs = S3Client::query_pairs(&root);
        assert!(pairs.iter().all(|(k, _)| *k != "prefix"));
        assert!(pairs.contains(&("continuation-token", "abc".to_string())));
    }

    #[test]
    fn test_host_header_keeps_port() {
        let url = Url::parse("http://www.localhost:9000/").unwrap();
        assert_eq!(S3Client::host_header(&url).unwrap(), "www.localhost:9000");

        let url = Url::parse("https://www.ap-south-1.linodeobjects.com/").unwrap();
        assert_eq!(
            S3Client::host_header(&url).unwrap(),
            "www.ap-south-1.linodeobjects.com"
        );
    }

    #[tokio::test]
    async fn test_invalid_request_fails_before_sending() {
        let client = S3Client::new(config()).unwrap();
        let err = client
            .list_objects(&ListingRequest::new("", 0))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_list_objects_sends_signed_request() {
        let (config, server) = serve_once("200 OK", LISTING_BODY).await;
        let client = S3Client::new(config.clone()).unwrap();

        let page = client
            .list_objects(&ListingRequest::new("pic/", 100))
            .await
            .unwrap();
        assert_eq!(page.total_count, 1);
        assert_eq!(page.entries[0].key, "pic/logo.png");
        assert_eq!(page.entries[0].etag, "def456");
        assert!(!page.has_more);

        let request = server.await.unwrap();
        let request_line = request.lines().next().unwrap_or_default();
        assert_eq!(
            request_line,
            "GET /www/?list-type=2&max-keys=100&prefix=pic%2F HTTP/1.1"
        );

        let host = header(&request, "host").unwrap();
        assert_eq!(host, S3Client::host_header(client.bucket_url()).unwrap());
        assert_eq!(
            header(&request, "x-amz-content-sha256"),
            Some("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855")
        );

        let amz_date = header(&request, "x-amz-date").unwrap();
        let timestamp = DateTime::strptime("%Y%m%dT%H%M%SZ", amz_date)
            .unwrap()
            .to_zoned(TimeZone::UTC)
            .unwrap()
            .timestamp();
        let expected = Signer::new(Credentials::new("AKIAEXAMPLE", "secret"), DEFAULT_REGION)
            .sign(
                "GET",
                host,
                "/www/",
                &[("list-type", "2"), ("max-keys", "100"), ("prefix", "pic/")],
                timestamp,
            )
            .unwrap();
        assert_eq!(header(&request, "authorization"), Some(expected.authorization.as_str()));
    }

    #[tokio::test]
    async fn test_rejected_request_is_transport_error() {
        let (config, server) = serve_once("403 Forbidden", DENIED_BODY).await;
        let client = S3Client::new(config).unwrap();

        let err = client
            .list_objects(&ListingRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Transport);
        assert_eq!(err.reason(), "HTTP 403: AccessDenied: Access Denied");

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /www/?list-type=2&max-keys=100 HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let (config, server) = serve_once("200 OK", MALFORMED_BODY).await;
        let client = S3Client::new(config).unwrap();

        let err = client
            .list_objects(&ListingRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Parse);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_service_degrades_on_malformed_body() {
        let (config, server) = serve_once("200 OK", MALFORMED_BODY).await;
        let service = ListingService::from_config(config);
        assert!(service.is_live());

        let page = service.list("pic/", 100).await.unwrap();
        assert_eq!(page.total_count, 4);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_service_degrades_on_rejection() {
        let (config, server) = serve_once("403 Forbidden", DENIED_BODY).await;
        let service = ListingService::from_config(config);

        let page = service.list("", 100).await.unwrap();
        assert_eq!(page.total_count, 6);
        server.await.unwrap();
    }
}
