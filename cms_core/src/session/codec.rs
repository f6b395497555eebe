use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// What the session cookie actually carries: an optional signed-in username
/// and a one-shot flash message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Issue time, informational only. Sessions do not expire.
    #[serde(default)]
    pub iat: i64,
}

/// Signs and verifies session cookies with HS256. The cookie value is an
/// opaque token; the browser cannot read or forge its contents.
#[derive(Clone)]
pub struct SessionCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    cookie_name: String,
}

impl SessionCodec {
    pub fn new(secret: &str, cookie_name: impl Into<String>) -> Result<Self, AppError> {
        if secret.len() < 32 {
            return Err(AppError::Session(
                "session secret must be at least 32 characters long".to_string(),
            ));
        }

        // Session cookies carry no `exp` claim.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            cookie_name: cookie_name.into(),
        })
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn encode(&self, claims: &SessionClaims) -> Result<String, AppError> {
        let mut claims = claims.clone();
        claims.iat = Utc::now().timestamp();

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Session(format!("failed to encode session cookie: {}", e)))
    }

    pub fn decode(&self, token: &str) -> Result<SessionClaims, AppError> {
        decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::Session(format!("invalid session cookie: {}", e)))
    }
}
