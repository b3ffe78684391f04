//! Token endpoint payloads.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Body of `POST {token_url}` with `grant_type=refresh_token`.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshRequest<'a> {
    pub grant_type: &'static str,
    pub refresh_token: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<&'a str>,
}

impl<'a> RefreshRequest<'a> {
    pub fn new(refresh_token: &'a str, client_id: Option<&'a str>) -> Self {
        Self {
            grant_type: "refresh_token",
            refresh_token,
            client_id,
        }
    }
}

/// Response from the token endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Absent when the server does not rotate refresh tokens.
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>, // may be absent; decode from JWT
}

impl TokenResponse {
    /// Seconds until expiry: `expires_in`, else the JWT `exp` claim, else `default`.
    pub fn lifetime(&self, default: u64) -> u64 {
        self.expires_in
            .or_else(|| get_jwt_expires_in(&self.access_token))
            .unwrap_or(default)
    }
}

#[derive(Deserialize)]
struct JwtClaims {
    exp: i64,
}

/// Extract the expiration time from a JWT access token.
///
/// Returns the number of seconds until the token expires (zero if already
/// past), or None if the token is not a JWT with an `exp` claim.
pub fn get_jwt_expires_in(access_token: &str) -> Option<u64> {
    let parts: Vec<&str> = access_token.split('.').collect();
    let payload = URL_SAFE_NO_PAD.decode(parts.get(1)?).ok()?;
    let claims: JwtClaims = serde_json::from_slice(&payload).ok()?;
    let now = chrono::Utc::now().timestamp();
    Some(claims.exp.saturating_sub(now).max(0) as u64)
}
