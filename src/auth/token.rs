use jwt_simple::prelude::*;

use crate::app::AppError;

/// Sessions expire 7 days after issuance.
pub const SESSION_TTL_DAYS: u64 = 7;

#[derive(Serialize, Deserialize)]
struct SessionClaims {
    user_id: String,
}

/// Signing/verification key for session tokens. Issued tokens carry
/// the user id as a custom claim; callers treat the token as opaque.
#[derive(Clone)]
pub struct TokenKeys {
    key: HS256Key,
}

impl TokenKeys {
    pub fn from_secret(secret: &str) -> TokenKeys {
        TokenKeys {
            key: HS256Key::from_bytes(secret.as_bytes()),
        }
    }

    pub fn issue(&self, user_id: &str) -> Result<String, AppError> {
        let claims = Claims::with_custom_claims(
            SessionClaims {
                user_id: user_id.to_string(),
            },
            Duration::from_days(SESSION_TTL_DAYS),
        );

        self.key
            .authenticate(claims)
            .map_err(|err| AppError::Unexpected(format!("Could not sign session token: {}", err)))
    }

    /// Returns the user id the token was issued for. Malformed,
    /// expired and wrongly-signed tokens are all rejected the same way.
    pub fn verify(&self, token: &str) -> Result<String, AppError> {
        let claims = self
            .key
            .verify_token::<SessionClaims>(token, None)
            .map_err(|_| AppError::Unauthenticated)?;

        Ok(claims.custom.user_id)
    }
}
