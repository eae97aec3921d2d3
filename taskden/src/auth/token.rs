use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::clock::{Clock, SystemClock};
use std::sync::Arc;

use super::error::TokenError;

/// Claims carried by a session token. Self-contained: verification needs
/// nothing beyond the signing secret.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued-at, seconds since epoch
    pub iat: i64,
    /// Expiry, seconds since epoch
    pub exp: i64,
}

/// A freshly signed token together with its expiry.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Outcome of inspecting a presented token that passed signature checks.
#[derive(Debug, Clone, Copy)]
pub struct RefreshDecision {
    pub refresh: bool,
    pub expires_at: DateTime<Utc>,
}

/// When a signature-valid token should be reissued.
#[derive(Debug, Clone, Copy)]
pub enum RefreshPolicy {
    /// Refresh once remaining validity has dropped to `fraction` of the
    /// validity window or less.
    Threshold { fraction: f64 },
    /// Refresh only within `grace` of expiry (or after it). Reproduces the
    /// historical behavior where sessions renewed only once already lapsed.
    OnExpiry { grace: Duration },
}

impl RefreshPolicy {
    pub const DEFAULT_FRACTION: f64 = 0.2;

    pub fn legacy() -> Self {
        RefreshPolicy::OnExpiry {
            grace: Duration::seconds(30),
        }
    }
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        RefreshPolicy::Threshold {
            fraction: Self::DEFAULT_FRACTION,
        }
    }
}

/// Issues and verifies signed, time-bounded session tokens (HS256).
///
/// The signing secret is loaded once at construction and never rotated
/// mid-process.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    secret_configured: bool,
    validity: Duration,
    policy: RefreshPolicy,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(secret: &str, validity: Duration, policy: RefreshPolicy) -> Self {
        Self::with_clock(secret, validity, policy, Arc::new(SystemClock))
    }

    pub fn with_clock(
        secret: &str,
        validity: Duration,
        policy: RefreshPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            secret_configured: !secret.is_empty(),
            validity,
            policy,
            clock,
        }
    }

    /// Sign a new token for `subject`, valid for the configured window.
    ///
    /// An unconfigured secret is a startup error and surfaces here, at
    /// first use.
    pub fn issue(&self, subject: &str) -> Result<IssuedToken, TokenError> {
        if !self.secret_configured {
            return Err(TokenError::MissingSecret);
        }

        let now = self.clock.now();
        let expires_at = now + self.validity;
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Decide whether a presented token warrants reissuing.
    ///
    /// The signature must check out; a garbled or tampered token is
    /// `TokenError::Invalid`. Expiry itself is not grounds for rejection
    /// here; an expired but authentic token is exactly the one that needs
    /// refreshing.
    pub fn should_refresh(&self, token: &str) -> Result<RefreshDecision, TokenError> {
        let claims = self.decode(token)?;
        let expires_at = DateTime::from_timestamp(claims.exp, 0).ok_or(TokenError::Invalid)?;
        let remaining = expires_at - self.clock.now();

        let refresh = match self.policy {
            RefreshPolicy::Threshold { fraction } => {
                remaining <= threshold_duration(self.validity, fraction)
            }
            RefreshPolicy::OnExpiry { grace } => remaining <= grace,
        };

        Ok(RefreshDecision {
            refresh,
            expires_at,
        })
    }

    /// True iff the token parses, the signature matches, and it has not
    /// expired yet.
    pub fn validate(&self, token: &str) -> bool {
        match self.decode(token) {
            Ok(claims) => self.clock.now().timestamp() < claims.exp,
            Err(_) => false,
        }
    }

    // Signature-checked decode with expiry validation disabled: expiry is
    // judged against the injected clock by the callers above.
    fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::Invalid)
    }
}

// The fraction is clamped so an out-of-range value degrades to "refresh
// at expiry" or "refresh always" instead of a nonsensical threshold.
fn threshold_duration(window: Duration, fraction: f64) -> Duration {
    Duration::seconds((window.num_seconds() as f64 * fraction.clamp(0.0, 1.0)) as i64)
}
