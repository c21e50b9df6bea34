//! AWS Signature Version 4 request signing.
//!
//! Only what a bodiless `GET` needs: the payload hash is always the hash of
//! the empty string and the signed headers are `host`, `x-amz-content-sha256`,
//! `x-amz-date` and, for temporary credentials, `x-amz-security-token`.

use hmac::{Hmac, Mac};
use jiff::Timestamp;
use jiff::tz::TimeZone;
use sha2::{Digest, Sha256};

use crate::credentials::Credentials;
use crate::error::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

/// Signing algorithm identifier.
pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Service name used in the credential scope.
pub const SERVICE: &str = "s3";

/// Hex SHA-256 of the empty payload.
pub const EMPTY_PAYLOAD_SHA256: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Headers that carry a request signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    /// Value of the `Authorization` header.
    pub authorization: String,
    /// Value of the `x-amz-date` header.
    pub amz_date: String,
    /// Value of the `x-amz-content-sha256` header.
    pub content_sha256: String,
    /// Value of the `x-amz-security-token` header, for temporary credentials.
    pub security_token: Option<String>,
}

impl SignedHeaders {
    /// Returns the headers as name/value pairs ready to attach to a request.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("authorization", self.authorization.clone()),
            ("x-amz-date", self.amz_date.clone()),
            ("x-amz-content-sha256", self.content_sha256.clone()),
        ];
        if let Some(token) = &self.security_token {
            pairs.push(("x-amz-security-token", token.clone()));
        }
        pairs
    }
}

/// Signs requests for one region with one set of credentials.
#[derive(Debug, Clone)]
pub struct Signer {
    credentials: Credentials,
    region: String,
}

impl Signer {
    /// Creates a signer for the given credentials and region.
    pub fn new(credentials: Credentials, region: impl Into<String>) -> Self {
        Self {
            credentials,
            region: region.into(),
        }
    }

    /// Returns the credentials used by this signer.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Signs a bodiless request at the given instant.
    ///
    /// `query` holds raw, unencoded pairs; they are encoded and sorted here.
    ///
    /// # Errors
    ///
    /// Returns a signing error if a MAC cannot be keyed.
    pub fn sign(
        &self,
        method: &str,
        host: &str,
        path: &str,
        query: &[(&str, &str)],
        timestamp: Timestamp,
    ) -> Result<SignedHeaders> {
        let zoned = timestamp.to_zoned(TimeZone::UTC);
        let amz_date = zoned.strftime("%Y%m%dT%H%M%SZ").to_string();
        let date_stamp = zoned.strftime("%Y%m%d").to_string();

        let mut headers = vec![
            ("host", host.to_string()),
            ("x-amz-content-sha256", EMPTY_PAYLOAD_SHA256.to_string()),
            ("x-amz-date", amz_date.clone()),
        ];
        if let Some(token) = self.credentials.session_token() {
            headers.push(("x-amz-security-token", token.to_string()));
        }
        headers.sort_by(|a, b| a.0.cmp(b.0));

        let signed_headers = headers
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(";");

        let canonical = canonical_request(method, path, query, &headers, &signed_headers);
        let scope = format!("{date_stamp}/{}/{SERVICE}/aws4_request", self.region);
        let to_sign = string_to_sign(&amz_date, &scope, &canonical);

        let key = signing_key(
            self.credentials.secret_key(),
            &date_stamp,
            &self.region,
            SERVICE,
        )?;
        let signature = hex::encode(hmac(&key, to_sign.as_bytes())?);

        let authorization = format!(
            "{ALGORITHM} Credential={}/{scope}, SignedHeaders={signed_headers}, Signature={signature}",
            self.credentials.access_key()
        );

        Ok(SignedHeaders {
            authorization,
            amz_date,
            content_sha256: EMPTY_PAYLOAD_SHA256.to_string(),
            security_token: self.credentials.session_token().map(str::to_string),
        })
    }
}

/// Encodes and sorts query pairs into the canonical query string.
pub fn canonical_query(query: &[(&str, &str)]) -> String {
    let mut encoded: Vec<(String, String)> = query
        .iter()
        .map(|(k, v)| {
            (
                urlencoding::encode(k).into_owned(),
                urlencoding::encode(v).into_owned(),
            )
        })
        .collect();
    encoded.sort();

    encoded
        .into_iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

fn canonical_request(
    method: &str,
    path: &str,
    query: &[(&str, &str)],
    headers: &[(&str, String)],
    signed_headers: &str,
) -> String {
    let canonical_headers: String = headers
        .iter()
        .map(|(name, value)| format!("{name}:{}\n", value.trim()))
        .collect();

    format!(
        "{method}\n{path}\n{}\n{canonical_headers}\n{signed_headers}\n{EMPTY_PAYLOAD_SHA256}",
        canonical_query(query)
    )
}

fn string_to_sign(amz_date: &str, scope: &str, canonical_request: &str) -> String {
    let hashed = hex::encode(Sha256::digest(canonical_request.as_bytes()));
    format!("{ALGORITHM}\n{amz_date}\n{scope}\n{hashed}")
}

fn signing_key(secret: &str, date_stamp: &str, region: &str, service: &str) -> Result<Vec<u8>> {
    let k_date = hmac(format!("AWS4{secret}").as_bytes(), date_stamp.as_bytes())?;
    let k_region = hmac(&k_date, region.as_bytes())?;
    let k_service = hmac(&k_region, service.as_bytes())?;
    hmac(&k_service, b"aws4_request")
}

fn hmac(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|err| Error::signing().with_message(format!("cannot key HMAC-SHA256: {err}")))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}
