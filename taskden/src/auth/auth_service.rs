use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::error::{AuthError, StoreError};
use super::models::{AuthResult, Credentials, User};
use super::password::{hash_password, verify_password};
use super::repository::AccountStore;
use super::sled_repository::SledAccountStore;
use super::token::{RefreshPolicy, TokenService};

/// Orchestrates signup and login against the account store and token
/// service. Holds no per-request state; safe to share across requests.
pub struct AuthService {
    store: Arc<dyn AccountStore>,
    tokens: Arc<TokenService>,
    store_timeout: Duration,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn AccountStore>,
        tokens: Arc<TokenService>,
        store_timeout: Duration,
    ) -> Self {
        Self {
            store,
            tokens,
            store_timeout,
        }
    }

    /// Wire the service from process configuration: sled store under the
    /// configured data directory, threshold refresh policy.
    pub fn from_config(config: &shared::Config) -> Result<Self, AuthError> {
        let store = SledAccountStore::new(Path::new(&config.data_dir).join("accounts.sled"))?;
        let tokens = TokenService::new(
            &config.secret_key,
            config.token_ttl(),
            RefreshPolicy::Threshold {
                fraction: config.refresh_fraction,
            },
        );

        Ok(Self::new(
            Arc::new(store),
            Arc::new(tokens),
            config.store_timeout,
        ))
    }

    /// Register a new account and issue its first session token.
    pub async fn sign_up(
        &self,
        credentials: Credentials,
        display_name: Option<String>,
    ) -> Result<AuthResult, AuthError> {
        let password = match credentials.password.as_deref() {
            Some(p) if !p.is_empty() => p.to_string(),
            _ => return Err(AuthError::MissingPassword),
        };
        let email = match credentials.email.as_deref() {
            Some(e) if !e.is_empty() => e.to_string(),
            _ => return Err(AuthError::InvalidInput("email is required".to_string())),
        };

        let count = self.bounded(self.store.count_by_email(&email)).await?;
        if count > 0 {
            return Err(AuthError::DuplicateAccount);
        }

        // argon2 is deliberately slow, keep it off the async executor
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))??;

        let user = User::new(email, display_name, password_hash);

        let user = match self.bounded(self.store.insert(user)).await {
            Ok(user) => user,
            // Lost the race to a concurrent signup claiming the same email
            Err(StoreError::Duplicate) => return Err(AuthError::DuplicateAccount),
            Err(err) => return Err(err.into()),
        };

        debug!(user_id = %user.id, "account created");

        let issued = self.tokens.issue(&user.id)?;
        let display_name = user.display_name().to_string();

        Ok(AuthResult {
            user_id: user.id,
            display_name,
            token: Some(issued.token),
            expires_at: issued.expires_at,
        })
    }

    /// Authenticate an existing account and refresh its session token if
    /// the one presented by the caller is near (or past) expiry.
    ///
    /// Unknown email, store failure, and wrong password all surface as the
    /// same `InvalidCredentials` so nothing leaks about which field was
    /// wrong or whether the account exists.
    pub async fn login(
        &self,
        credentials: Credentials,
        presented_token: Option<&str>,
    ) -> Result<AuthResult, AuthError> {
        let email = credentials.email.as_deref().unwrap_or_default();

        let found = match self.bounded(self.store.find_by_email(email)).await {
            Ok(Some(user)) => user,
            Ok(None) => return Err(AuthError::InvalidCredentials),
            Err(err) => {
                warn!(error = %err, "account lookup failed during login");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let password = match credentials.password {
            Some(p) if !p.is_empty() => p,
            _ => return Err(AuthError::MissingPassword),
        };

        let stored_hash = found.password_hash.clone();
        let password_valid =
            tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
                .await
                .map_err(|e| AuthError::Hashing(e.to_string()))?;
        if !password_valid {
            debug!("password verification failed");
            return Err(AuthError::InvalidCredentials);
        }

        // Integrity check on the stored record
        if found.email.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        match presented_token {
            // No session presented: the caller needs a token either way
            None => self.issue_result(&found),
            Some(token) => {
                let decision = self.tokens.should_refresh(token)?;
                if decision.refresh {
                    self.issue_result(&found)
                } else {
                    // Session still fresh: re-emit identity fields with the
                    // existing expiry so non-token cookies can be reset
                    Ok(AuthResult {
                        user_id: found.id.clone(),
                        display_name: found.display_name().to_string(),
                        token: None,
                        expires_at: decision.expires_at,
                    })
                }
            }
        }
    }

    fn issue_result(&self, user: &User) -> Result<AuthResult, AuthError> {
        let issued = self.tokens.issue(&user.id)?;
        Ok(AuthResult {
            user_id: user.id.clone(),
            display_name: user.display_name().to_string(),
            token: Some(issued.token),
            expires_at: issued.expires_at,
        })
    }

    async fn bounded<T>(
        &self,
        fut: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        match tokio::time::timeout(self.store_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout),
        }
    }
}
