//! Session token issuing and verification.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use common::{AppError, AppResult, JwtConfig};
use domain::MAX_TOKEN_EXPIRY_MINUTES;

/// JWT claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Approved role of the account; absent when nothing was granted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub iss: String,
    pub aud: String,
    pub exp: i64,
}

/// A freshly signed token and the instant it stops being valid.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies HS256 session tokens with a fixed key.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
    default_expiry_minutes: i64,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("default_expiry_minutes", &self.default_expiry_minutes)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            default_expiry_minutes: config.default_expiry_minutes,
        }
    }

    /// Sign a token for `role` that expires `expiry_minutes` from now.
    pub fn issue(&self, role: Option<&str>, expiry_minutes: Option<i64>) -> AppResult<IssuedToken> {
        let minutes = expiry_minutes.unwrap_or(self.default_expiry_minutes);
        if minutes <= 0 {
            return Err(AppError::bad_request("Token timeout must be positive"));
        }
        if minutes > MAX_TOKEN_EXPIRY_MINUTES {
            return Err(AppError::bad_request("Token timeout is too large"));
        }

        let expires_at = Duration::try_minutes(minutes)
            .and_then(|d| Utc::now().checked_add_signed(d))
            .ok_or_else(|| AppError::bad_request("Token timeout is too large"))?;
        let claims = Claims {
            role: role.map(str::to_string),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("failed to sign token: {}", e)))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Check signature, expiry, issuer and audience of `token`.
    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(token_data.claims)
    }
}
