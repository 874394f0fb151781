//! Bearer token claim decoding.
//!
//! The token is treated as opaque except for its middle segment, which is a
//! base64url-encoded JSON object. The signature is never checked here; the
//! backend is the authority and the claims only tell the client who it is.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde_json::Value;

use super::{error::DecodeError, value_object::UserId};

/// Claims the client cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    /// `sub`
    pub subject: UserId,
    /// `exp`, seconds since the Unix epoch
    pub expires_at: Option<i64>,
    /// `iss`
    pub issuer: Option<String>,
}

/// Decode the claims segment of `token`.
///
/// `sub` may be encoded as a JSON number or as a numeric string.
pub fn decode_claims(token: &str) -> Result<Claims, DecodeError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 || segments[1].is_empty() {
        return Err(DecodeError::MalformedToken);
    }

    let payload = URL_SAFE_NO_PAD
        .decode(segments[1].trim_end_matches('='))
        .map_err(|e| DecodeError::Base64(e.to_string()))?;

    let claims: Value =
        serde_json::from_slice(&payload).map_err(|e| DecodeError::Json(e.to_string()))?;
    let Value::Object(claims) = claims else {
        return Err(DecodeError::Json("not an object".to_string()));
    };

    let subject = match claims.get("sub") {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .map(UserId::new)
    .ok_or(DecodeError::MissingSubject)?;

    Ok(Claims {
        subject,
        expires_at: claims.get("exp").and_then(Value::as_i64),
        issuer: claims.get("iss").and_then(Value::as_str).map(str::to_string),
    })
}

#[cfg(test)]
pub(crate) fn make_token(claims: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims);
    format!("{}.{}.signature", header, payload)
}
