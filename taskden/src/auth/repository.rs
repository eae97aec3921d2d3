use async_trait::async_trait;

use super::error::StoreError;
use super::models::User;

/// Persistence contract for user accounts.
///
/// Email uniqueness must be enforced by the implementation: `insert` has to
/// fail with `StoreError::Duplicate` when the email is already claimed, even
/// under concurrent inserts. The service layer's existence check alone
/// cannot close that race.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Number of accounts registered under this email (0 or 1 in practice)
    async fn count_by_email(&self, email: &str) -> Result<u64, StoreError>;

    /// Find an account by email; `Ok(None)` means not found, distinct from
    /// a store failure
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Insert a new account, claiming its email atomically
    async fn insert(&self, user: User) -> Result<User, StoreError>;
}
