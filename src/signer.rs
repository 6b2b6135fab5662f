//! HMAC-SHA1 request signing.
//!
//! A signed request carries seven descriptive fields plus a signature:
//!
//! ```text
//! client, hash=sha1, method, nonce, resource, timestamp, version, signature
//! ```
//!
//! The signature is the lower-case hex HMAC-SHA1, keyed with the client
//! secret, of the seven other fields sorted by name and encoded as a query
//! string. The nonce is fresh per call and must come back in the response.

use std::time::{SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha1::Sha1;

use crate::config::Credentials;
use crate::transport::Params;

type HmacSha1 = Hmac<Sha1>;

/// Hash algorithm tag sent in the `hash` field
pub const HASH_ALGORITHM: &str = "sha1";

/// Number of decimal digits in a nonce
pub const NONCE_LENGTH: usize = 10;

/// Signed descriptor for a single request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureEnvelope {
    pub client: String,
    pub hash: String,
    pub method: String,
    pub nonce: String,
    pub resource: String,
    pub timestamp: u64,
    pub version: String,
    pub signature: String,
}

impl SignatureEnvelope {
    /// The fields covered by the signature, in canonical (sorted) order.
    pub fn unsigned_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("client", self.client.clone()),
            ("hash", self.hash.clone()),
            ("method", self.method.clone()),
            ("nonce", self.nonce.clone()),
            ("resource", self.resource.clone()),
            ("timestamp", self.timestamp.to_string()),
            ("version", self.version.clone()),
        ]
    }

    /// All eight fields, ready to merge into a request payload.
    pub fn to_params(&self) -> Params {
        let mut params: Params = self
            .unsigned_params()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        params.insert("signature".to_string(), self.signature.clone());
        params
    }
}

/// Request signer bound to one set of credentials and a protocol version.
///
/// # Example
///
/// ```
/// use veridu_client::{Credentials, Signer};
///
/// let signer = Signer::new(Credentials::new("key", "secret"), "0.3");
/// let envelope = signer.sign("get", "https://api.veridu.com/0.3/session");
///
/// assert_eq!(envelope.method, "GET");
/// assert_eq!(envelope.nonce.len(), 10);
/// assert_eq!(envelope.signature.len(), 40);
/// ```
#[derive(Debug, Clone)]
pub struct Signer {
    credentials: Credentials,
    version: String,
}

impl Signer {
    /// Create a new signer.
    pub fn new(credentials: Credentials, version: impl Into<String>) -> Self {
        Self {
            credentials,
            version: version.into(),
        }
    }

    /// Client key the signatures are issued for.
    pub fn client_key(&self) -> &str {
        self.credentials.key()
    }

    /// Sign a request with a fresh nonce and the current time.
    ///
    /// `resource_url` is the fully-qualified URL the signature is scoped to.
    pub fn sign(&self, method: &str, resource_url: &str) -> SignatureEnvelope {
        self.sign_with(method, resource_url, generate_nonce(), unix_timestamp())
    }

    /// Sign a request with an explicit nonce and timestamp.
    pub fn sign_with(
        &self,
        method: &str,
        resource_url: &str,
        nonce: String,
        timestamp: u64,
    ) -> SignatureEnvelope {
        let mut envelope = SignatureEnvelope {
            client: self.credentials.key().to_string(),
            hash: HASH_ALGORITHM.to_string(),
            method: method.to_uppercase(),
            nonce,
            resource: resource_url.to_string(),
            timestamp,
            version: self.version.clone(),
            signature: String::new(),
        };

        let payload = canonical_query(envelope.unsigned_params());
        envelope.signature = compute_signature(self.credentials.secret(), &payload);
        envelope
    }
}

/// Generate a nonce of ten independently chosen decimal digits.
pub fn generate_nonce() -> String {
    let mut rng = rand::thread_rng();
    (0..NONCE_LENGTH)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// Encode key/value pairs as a query string, sorted by key.
///
/// Keys and values are percent-encoded leaving `A-Z a-z 0-9 - _ . ~` intact,
/// with spaces written as `+`.
pub fn canonical_query<K, V, I>(pairs: I) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
    I: IntoIterator<Item = (K, V)>,
{
    let mut pairs: Vec<(K, V)> = pairs.into_iter().collect();
    pairs.sort_by(|a, b| a.0.as_ref().cmp(b.0.as_ref()));

    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", form_encode(k.as_ref()), form_encode(v.as_ref())))
        .collect::<Vec<_>>()
        .join("&")
}

fn form_encode(s: &str) -> String {
    urlencoding::encode(s).replace("%20", "+")
}

/// Lower-case hex HMAC-SHA1 of `payload` keyed with `secret`.
pub fn compute_signature(secret: &[u8], payload: &str) -> String {
    let mut mac = HmacSha1::new_from_slice(secret).expect("HMAC can take any size");
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Current Unix time in seconds.
fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
