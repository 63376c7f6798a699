use super::credentials::Credentials;
use anyhow::{anyhow, Context, Result};
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;
use url::Url;

type HmacSha256 = Hmac<Sha256>;

const SIGNATURE_ALGORITHM: &str = "hmac-sha256";
const SIGNED_HEADERS: &str = "host date request-line";

/// A signed connection target, derived once per session
#[derive(Debug, Clone)]
pub struct ConnectionRequest {
    /// Host that was signed (includes `:port` when the endpoint has one)
    pub host: String,

    /// RFC-1123 timestamp that was signed
    pub date: String,

    /// Form-encoded `authorization`, `date` and `host` parameters
    pub query: String,

    /// Endpoint URL with the signed query appended
    pub url: Url,
}

/// Format a timestamp the way HTTP `Date` headers do
/// (e.g. "Tue, 14 May 2024 08:30:00 GMT")
pub fn rfc1123(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Base64 HMAC-SHA256 over `host`, `date` and the request line, newline-joined
pub fn signature(api_secret: &str, host: &str, date: &str, path: &str) -> Result<String> {
    let origin = format!("host: {}\ndate: {}\nGET {} HTTP/1.1", host, date, path);

    let mut mac = HmacSha256::new_from_slice(api_secret.as_bytes())
        .map_err(|e| anyhow!("Invalid HMAC key: {}", e))?;
    mac.update(origin.as_bytes());

    Ok(base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}

/// Build the signed connection URL for `endpoint` at time `now`
pub fn sign_url(
    endpoint: &Url,
    credentials: &Credentials,
    now: DateTime<Utc>,
) -> Result<ConnectionRequest> {
    let host = match (endpoint.host_str(), endpoint.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => anyhow::bail!("Endpoint URL has no host: {}", endpoint),
    };
    let date = rfc1123(now);

    let signature = signature(&credentials.api_secret, &host, &date, endpoint.path())
        .context("Failed to sign connection request")?;

    let authorization_origin = format!(
        "api_key=\"{}\", algorithm=\"{}\", headers=\"{}\", signature=\"{}\"",
        credentials.api_key, SIGNATURE_ALGORITHM, SIGNED_HEADERS, signature
    );
    let authorization =
        base64::engine::general_purpose::STANDARD.encode(authorization_origin.as_bytes());

    let mut url = endpoint.clone();
    url.query_pairs_mut()
        .clear()
        .append_pair("authorization", &authorization)
        .append_pair("date", &date)
        .append_pair("host", &host);

    let query = url.query().unwrap_or_default().to_string();

    debug!("Signed connection request for {} at {}", host, date);

    Ok(ConnectionRequest {
        host,
        date,
        query,
        url,
    })
}
