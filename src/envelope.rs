//! Response envelope validation.
//!
//! Every response body is a JSON object with a boolean `status`:
//!
//! ```text
//! {"status": true, "nonce": "<echo>", ...payload}
//! {"status": false, "error": {"type": "<code>", "message": "<text>"}}
//! ```

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{Result, VeriduError};

/// Parsed JSON object returned to callers
pub type JsonObject = Map<String, Value>;

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(rename = "type")]
    error_type: String,
    message: String,
}

/// Validate a raw response body and return the parsed object.
pub fn validate(body: &str) -> Result<JsonObject> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        warn!("Response is not JSON: {}", e);
        VeriduError::InvalidFormat(body.to_string())
    })?;

    let Value::Object(object) = value else {
        warn!("Response is not a JSON object");
        return Err(VeriduError::InvalidResponse(body.to_string()));
    };

    match object.get("status") {
        Some(Value::Bool(true)) => Ok(object),
        Some(Value::Bool(false)) => {
            let detail = object
                .get("error")
                .cloned()
                .and_then(|e| serde_json::from_value::<ErrorDetail>(e).ok())
                .ok_or_else(|| {
                    warn!("Failed response without error detail");
                    VeriduError::InvalidResponse(body.to_string())
                })?;
            warn!(
                error_type = %detail.error_type,
                "API error: {}", detail.message
            );
            Err(VeriduError::Api {
                error_type: detail.error_type,
                message: detail.message,
            })
        }
        Some(_) => {
            warn!("Response status is not a boolean");
            Err(VeriduError::InvalidResponse(body.to_string()))
        }
        None => {
            warn!("Response has no status field");
            Err(VeriduError::InvalidResponse(body.to_string()))
        }
    }
}

/// Check the echoed nonce and strip it from the payload.
pub fn verify_nonce(mut object: JsonObject, expected: &str) -> Result<JsonObject> {
    match object.remove("nonce") {
        Some(Value::String(nonce)) if nonce == expected => Ok(object),
        received => {
            warn!(
                received = received.is_some(),
                "Response nonce does not match request"
            );
            Err(VeriduError::NonceMismatch)
        }
    }
}
