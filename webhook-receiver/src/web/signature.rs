//! GitHub webhook signature verification.
//!
//! GitHub signs each delivery with HMAC-SHA256 over the raw request body and
//! sends the hex digest in `X-Hub-Signature-256` as `sha256=<hex>`. Older
//! senders only provide the HMAC-SHA1 `X-Hub-Signature` header (`sha1=<hex>`),
//! which is accepted when the SHA-256 header is absent.
//! Reference: https://docs.github.com/en/webhooks/using-webhooks/validating-webhook-deliveries

use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::Sha256;
use thiserror::Error;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;
type HmacSha1 = Hmac<Sha1>;

const SHA256_PREFIX: &str = "sha256=";
const SHA1_PREFIX: &str = "sha1=";

/// Reasons a delivery fails signature verification.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("missing signature header")]
    Missing,

    #[error("malformed signature header")]
    Malformed,

    #[error("signature does not match body")]
    Mismatch,

    #[error("unusable signing secret")]
    InvalidKey,
}

/// A signature header value, tagged with its algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signature<'a> {
    /// `X-Hub-Signature-256`
    Sha256(&'a str),
    /// `X-Hub-Signature`
    Sha1(&'a str),
}

impl<'a> Signature<'a> {
    /// Pick the strongest signature the request carries.
    pub fn from_headers(sha256: Option<&'a str>, sha1: Option<&'a str>) -> Option<Self> {
        sha256.map(Signature::Sha256).or(sha1.map(Signature::Sha1))
    }

    fn algorithm(&self) -> &'static str {
        match self {
            Signature::Sha256(_) => "sha256",
            Signature::Sha1(_) => "sha1",
        }
    }

    /// Decoded digest bytes, or `None` if the value is not `<prefix><hex>`.
    fn digest(&self) -> Option<Vec<u8>> {
        let (value, prefix) = match self {
            Signature::Sha256(v) => (v, SHA256_PREFIX),
            Signature::Sha1(v) => (v, SHA1_PREFIX),
        };
        value
            .trim()
            .strip_prefix(prefix)
            .and_then(|digest| hex::decode(digest).ok())
    }
}

/// Verify a GitHub webhook signature.
///
/// # Arguments
///
/// * `secret` - The shared webhook secret
/// * `body` - The raw request body, exactly as received
/// * `signature` - The signature header the request carried, if any
pub fn verify_signature(
    secret: &str,
    body: &[u8],
    signature: Option<Signature<'_>>,
) -> Result<(), SignatureError> {
    let signature = signature.ok_or_else(|| {
        warn!("github_signature_missing");
        SignatureError::Missing
    })?;

    let expected = signature.digest().ok_or_else(|| {
        warn!(algorithm = signature.algorithm(), "github_signature_malformed");
        SignatureError::Malformed
    })?;

    let invalid_key = |_| {
        warn!("github_signature_invalid_key");
        SignatureError::InvalidKey
    };

    // verify_slice compares in constant time
    let verified = match signature {
        Signature::Sha256(_) => {
            let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(invalid_key)?;
            mac.update(body);
            mac.verify_slice(&expected)
        }
        Signature::Sha1(_) => {
            let mut mac = HmacSha1::new_from_slice(secret.as_bytes()).map_err(invalid_key)?;
            mac.update(body);
            mac.verify_slice(&expected)
        }
    };

    verified.map_err(|_| {
        warn!(
            algorithm = signature.algorithm(),
            body_length = body.len(),
            digest_length = expected.len(),
            "github_signature_mismatch"
        );
        SignatureError::Mismatch
    })
}

/// Compute the `X-Hub-Signature-256` header value for `body`.
pub fn sign(secret: &str, body: &[u8]) -> Result<String, SignatureError> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::InvalidKey)?;
    mac.update(body);
    Ok(format!(
        "{}{}",
        SHA256_PREFIX,
        hex::encode(mac.finalize().into_bytes())
    ))
}

/// Check if signature verification is enabled.
pub fn is_signature_verification_enabled(secret: &Option<String>) -> bool {
    secret
        .as_ref()
        .map(|k| !k.trim().is_empty())
        .unwrap_or(false)
}
