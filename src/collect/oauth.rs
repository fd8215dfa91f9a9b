// src/collect/oauth.rs
//! OAuth 1.0a (HMAC-SHA1) request signing for user-context calls.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use rand::distr::Alphanumeric;
use rand::Rng;
use sha1::Sha1;

use crate::config::Credentials;

type HmacSha1 = Hmac<Sha1>;

/// RFC 3986 percent-encoding (unreserved characters stay as-is).
fn encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

pub fn generate_nonce() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Compute the base64 HMAC-SHA1 signature over method, base URL and all request params
/// (query/body params plus the `oauth_*` protocol params, without `oauth_signature`).
pub fn signature(
    method: &str,
    url: &str,
    params: &[(&str, &str)],
    consumer_secret: &str,
    token_secret: &str,
) -> String {
    let mut encoded: Vec<(String, String)> =
        params.iter().map(|(k, v)| (encode(k), encode(v))).collect();
    encoded.sort();

    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let base = format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        encode(url),
        encode(&param_string)
    );
    let key = format!("{}&{}", encode(consumer_secret), encode(token_secret));

    // HMAC accepts keys of any length.
    let mut mac = HmacSha1::new_from_slice(key.as_bytes()).expect("hmac takes any key size");
    mac.update(base.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Build the `Authorization` header value for one request.
pub fn authorization_header(
    method: &str,
    url: &str,
    query: &[(&str, &str)],
    creds: &Credentials,
    nonce: &str,
    timestamp: i64,
) -> String {
    let timestamp = timestamp.to_string();
    let oauth: [(&str, &str); 6] = [
        ("oauth_consumer_key", creds.consumer_key.as_str()),
        ("oauth_nonce", nonce),
        ("oauth_signature_method", "HMAC-SHA1"),
        ("oauth_timestamp", timestamp.as_str()),
        ("oauth_token", creds.access_token.as_str()),
        ("oauth_version", "1.0"),
    ];

    let mut all: Vec<(&str, &str)> = query.to_vec();
    all.extend_from_slice(&oauth);
    let sig = signature(
        method,
        url,
        &all,
        &creds.consumer_secret,
        &creds.access_token_secret,
    );

    let mut parts: Vec<String> = oauth
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
        .collect();
    parts.push(format!("oauth_signature=\"{}\"", encode(&sig)));
    parts.sort();
    format!("OAuth {}", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_credentials() -> Credentials {
        Credentials {
            consumer_key: "xvz1evFS4wEEPTGEFPHBog".into(),
            consumer_secret: "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw".into(),
            access_token: "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb".into(),
            access_token_secret: "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE".into(),
        }
    }

    // Published reference vector for signing a status update.
    #[test]
    fn signature_matches_reference_vector() {
        let creds = reference_credentials();
        let params = [
            ("status", "Hello Ladies + Gentlemen, a signed OAuth request!"),
            ("include_entities", "true"),
            ("oauth_consumer_key", creds.consumer_key.as_str()),
            ("oauth_nonce", "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg"),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", "1318622958"),
            ("oauth_token", creds.access_token.as_str()),
            ("oauth_version", "1.0"),
        ];
        let sig = signature(
            "POST",
            "https://api.twitter.com/1.1/statuses/update.json",
            &params,
            &creds.consumer_secret,
            &creds.access_token_secret,
        );
        assert_eq!(sig, "hCtSmYh+iHYCEqBWrE7C7hYmtUk=");
    }

    #[test]
    fn header_carries_all_protocol_params() {
        let creds = reference_credentials();
        let h = authorization_header(
            "GET",
            "https://api.twitter.com/1.1/search/tweets.json",
            &[("q", "#covid")],
            &creds,
            "abc",
            1_700_000_000,
        );
        assert!(h.starts_with("OAuth "));
        for key in [
            "oauth_consumer_key",
            "oauth_nonce=\"abc\"",
            "oauth_signature=",
            "oauth_timestamp=\"1700000000\"",
            "oauth_version=\"1.0\"",
        ] {
            assert!(h.contains(key), "missing {key} in {h}");
        }
        // query params are signed but not placed in the header
        assert!(!h.contains("q="));
    }

    #[test]
    fn nonce_is_alphanumeric() {
        let n = generate_nonce();
        assert_eq!(n.len(), 32);
        assert!(n.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
