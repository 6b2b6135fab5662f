//! Rust client for the Veridu identity verification API
//!
//! Every call goes through one of two paths:
//! - [`VeriduClient::fetch`] sends a plain request and validates the
//!   response envelope.
//! - [`VeriduClient::signed_fetch`] additionally signs the request with an
//!   HMAC-SHA1 [`SignatureEnvelope`] and requires the response to echo the
//!   request nonce.
//!
//! ```text
//! caller ──► Signer ──► VeriduClient (gateway) ──► Transport ──► API
//!                              │
//!                              ▼
//!                   envelope::validate / verify_nonce
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use veridu_client::{Credentials, Method, VeriduClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = VeriduClient::new(Credentials::new("client-key", "client-secret"))?;
//!
//! // Create a session with a signed call, then attach it to later requests
//! let response = client.signed_fetch(Method::Post, "session/limited", None).await?;
//! if let Some(token) = response.get("token").and_then(|t| t.as_str()) {
//!     client.set_session(token);
//! }
//!
//! let details = client.fetch(Method::Get, "user/details", None).await?;
//! # let _ = details;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod signer;
pub mod transport;

// Re-export main types
pub use client::VeriduClient;
pub use config::{ApiConfig, Credentials};
pub use envelope::JsonObject;
pub use error::{Result, VeriduError};
pub use signer::{SignatureEnvelope, Signer};
pub use transport::{
    HttpRequest, HttpResponse, Method, MockTransport, Params, ReqwestTransport, Transport,
};
