//! OAuth 1.0a (HMAC-SHA1) request signing for user-context APIs.
//!
//! Query parameters on the request URL are folded into the signature base
//! string, so callers must sign the final URL they intend to send.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Url;
use sha1::Sha1;
use std::fmt;

use crate::HttpError;

type HmacSha1 = Hmac<Sha1>;

/// RFC 3986 unreserved characters are the only ones left as-is.
const RFC3986: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";

/// Consumer + access token pair for a user-context OAuth 1.0a client.
///
/// ```
/// use tagrank_http::OAuth1Credentials;
///
/// let creds = OAuth1Credentials::new("ck", "cs", "at", "ats");
/// assert_eq!(creds.consumer_key(), "ck");
/// assert!(!format!("{creds:?}").contains("cs"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct OAuth1Credentials {
    consumer_key: String,
    consumer_secret: String,
    access_token: String,
    access_token_secret: String,
}

impl fmt::Debug for OAuth1Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth1Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("access_token", &"<redacted>")
            .field("access_token_secret", &"<redacted>")
            .finish()
    }
}

impl OAuth1Credentials {
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        access_token: impl Into<String>,
        access_token_secret: impl Into<String>,
    ) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            access_token: access_token.into(),
            access_token_secret: access_token_secret.into(),
        }
    }

    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    /// Build the `Authorization` header value for `method url` with a fresh
    /// nonce and the current timestamp.
    pub fn authorization_header(&self, method: &str, url: &Url) -> Result<String, HttpError> {
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        let timestamp = chrono::Utc::now().timestamp();
        self.authorization_header_with(method, url, &[], &nonce, timestamp)
    }

    /// Deterministic variant of [`Self::authorization_header`]; `extra` carries
    /// form-encoded body parameters that must also be signed.
    pub fn authorization_header_with(
        &self,
        method: &str,
        url: &Url,
        extra: &[(&str, &str)],
        nonce: &str,
        timestamp: i64,
    ) -> Result<String, HttpError> {
        let timestamp = timestamp.to_string();
        let mut oauth_params: Vec<(&str, &str)> = vec![
            ("oauth_consumer_key", self.consumer_key.as_str()),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", SIGNATURE_METHOD),
            ("oauth_timestamp", timestamp.as_str()),
            ("oauth_token", self.access_token.as_str()),
            ("oauth_version", OAUTH_VERSION),
        ];

        let base = signature_base_string(method, url, &oauth_params, extra);
        let signature = self.sign(&base)?;
        oauth_params.push(("oauth_signature", signature.as_str()));
        oauth_params.sort();

        let fields = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!("OAuth {fields}"))
    }

    fn sign(&self, base: &str) -> Result<String, HttpError> {
        let key = format!(
            "{}&{}",
            encode(&self.consumer_secret),
            encode(&self.access_token_secret)
        );
        let mut mac = HmacSha1::new_from_slice(key.as_bytes())
            .map_err(|e| HttpError::Build(format!("oauth signing key rejected: {e}")))?;
        mac.update(base.as_bytes());
        Ok(BASE64.encode(mac.finalize().into_bytes()))
    }
}

/// `METHOD&enc(base_url)&enc(sorted_params)` as defined by RFC 5849 §3.4.1.
pub fn signature_base_string(
    method: &str,
    url: &Url,
    oauth_params: &[(&str, &str)],
    extra: &[(&str, &str)],
) -> String {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (encode(&k), encode(&v)))
        .chain(
            oauth_params
                .iter()
                .chain(extra.iter())
                .map(|(k, v)| (encode(k), encode(v))),
        )
        .collect();
    pairs.sort();

    let param_string = pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        encode(&base_url(url)),
        encode(&param_string)
    )
}

fn base_url(url: &Url) -> String {
    let port = url.port().map(|p| format!(":{p}")).unwrap_or_default();
    format!(
        "{}://{}{}{}",
        url.scheme(),
        url.host_str().unwrap_or_default(),
        port,
        url.path()
    )
}

fn encode(raw: &str) -> String {
    utf8_percent_encode(raw, RFC3986).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Worked example from the Twitter developer docs ("Creating a signature").
    fn docs_credentials() -> OAuth1Credentials {
        OAuth1Credentials::new(
            "xvz1evFS4wEEPTGEFPHBog",
            "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw",
            "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb",
            "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE",
        )
    }

    const DOCS_NONCE: &str = "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg";
    const DOCS_TIMESTAMP: &str = "1318622958";
    const DOCS_STATUS: &str = "Hello Ladies + Gentlemen, a signed OAuth request!";

    fn docs_url() -> Url {
        Url::parse("https://api.twitter.com/1.1/statuses/update.json?include_entities=true")
            .unwrap()
    }

    #[test]
    fn base_string_matches_documented_example() {
        let creds = docs_credentials();
        let oauth = [
            ("oauth_consumer_key", creds.consumer_key()),
            ("oauth_nonce", DOCS_NONCE),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", DOCS_TIMESTAMP),
            ("oauth_token", "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb"),
            ("oauth_version", "1.0"),
        ];
        let base = signature_base_string("post", &docs_url(), &oauth, &[("status", DOCS_STATUS)]);
        assert_eq!(
            base,
            "POST&https%3A%2F%2Fapi.twitter.com%2F1.1%2Fstatuses%2Fupdate.json&\
             include_entities%3Dtrue%26oauth_consumer_key%3Dxvz1evFS4wEEPTGEFPHBog%26\
             oauth_nonce%3DkYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg%26\
             oauth_signature_method%3DHMAC-SHA1%26oauth_timestamp%3D1318622958%26\
             oauth_token%3D370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb%26\
             oauth_version%3D1.0%26status%3DHello%2520Ladies%2520%252B%2520Gentlemen\
             %252C%2520a%2520signed%2520OAuth%2520request%2521"
        );
    }

    #[test]
    fn signature_matches_documented_example() {
        let header = docs_credentials()
            .authorization_header_with(
                "POST",
                &docs_url(),
                &[("status", DOCS_STATUS)],
                DOCS_NONCE,
                1318622958,
            )
            .unwrap();
        assert!(
            header.contains("oauth_signature=\"hCtSmYh%2BiHYCEqBWrE7C7hYmtUk%3D\""),
            "unexpected header: {header}"
        );
    }

    #[test]
    fn header_lists_every_oauth_field_sorted() {
        let url = Url::parse("https://api.twitter.com/1.1/search/tweets.json?q=%23sre").unwrap();
        let header = docs_credentials()
            .authorization_header_with("GET", &url, &[], "abc", 1)
            .unwrap();
        assert!(header.starts_with("OAuth oauth_consumer_key=\"xvz1evFS4wEEPTGEFPHBog\", "));
        let keys: Vec<&str> = header
            .trim_start_matches("OAuth ")
            .split(", ")
            .map(|kv| kv.split('=').next().unwrap())
            .collect();
        assert_eq!(
            keys,
            [
                "oauth_consumer_key",
                "oauth_nonce",
                "oauth_signature",
                "oauth_signature_method",
                "oauth_timestamp",
                "oauth_token",
                "oauth_version",
            ]
        );
    }

    #[test]
    fn percent_encoded_query_is_signed_decoded_then_reencoded() {
        let url = Url::parse(
            "https://api.twitter.com/1.1/search/tweets.json?q=%23devops&src=typed_query&count=10",
        )
        .unwrap();
        let base = signature_base_string("GET", &url, &[], &[]);
        assert!(base.ends_with("&count%3D10%26q%3D%2523devops%26src%3Dtyped_query"));
    }

    #[test]
    fn non_default_port_is_kept_in_base_url() {
        let url = Url::parse("http://127.0.0.1:8080/1.1/search/tweets.json").unwrap();
        assert_eq!(base_url(&url), "http://127.0.0.1:8080/1.1/search/tweets.json");
        let url = Url::parse("https://API.Twitter.com:443/1.1/x.json").unwrap();
        assert_eq!(base_url(&url), "https://api.twitter.com/1.1/x.json");
    }

    #[test]
    fn fresh_headers_use_distinct_nonces() {
        let creds = docs_credentials();
        let url = docs_url();
        let a = creds.authorization_header("GET", &url).unwrap();
        let b = creds.authorization_header("GET", &url).unwrap();
        assert_ne!(a, b);
    }
}
