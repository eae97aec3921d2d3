use async_trait::async_trait;
use sled::Db;
use std::path::Path;

use super::error::StoreError;
use super::models::User;
use super::repository::AccountStore;

const USERS_TREE: &str = "users";
const USERS_BY_EMAIL_TREE: &str = "users_by_email";

#[derive(Clone)]
pub struct SledAccountStore {
    db: Db,
}

impl SledAccountStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    fn users_tree(&self) -> Result<sled::Tree, StoreError> {
        Ok(self.db.open_tree(USERS_TREE)?)
    }

    fn email_tree(&self) -> Result<sled::Tree, StoreError> {
        Ok(self.db.open_tree(USERS_BY_EMAIL_TREE)?)
    }
}

#[async_trait]
impl AccountStore for SledAccountStore {
    async fn count_by_email(&self, email: &str) -> Result<u64, StoreError> {
        let email_tree = self.email_tree()?;
        Ok(u64::from(email_tree.contains_key(email.as_bytes())?))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let email_tree = self.email_tree()?;
        let users_tree = self.users_tree()?;

        // First, get the user ID from the email index
        if let Some(user_id) = email_tree.get(email.as_bytes())? {
            // Then get the user by ID
            if let Some(user_data) = users_tree.get(&user_id)? {
                let user: User = serde_json::from_slice(&user_data)?;
                return Ok(Some(user));
            }
        }

        Ok(None)
    }

    async fn insert(&self, user: User) -> Result<User, StoreError> {
        let users_tree = self.users_tree()?;
        let email_tree = self.email_tree()?;

        let user_json = serde_json::to_vec(&user)?;

        // Write the record before claiming the email. An interruption
        // between the two writes then leaves at worst an unreachable
        // record, never an email claimed with nothing behind it.
        users_tree.insert(user.id.as_bytes(), user_json)?;

        // compare_and_swap succeeds only when no one else holds the key,
        // which is what serializes concurrent signups.
        let claimed = email_tree.compare_and_swap(
            user.email.as_bytes(),
            None as Option<&[u8]>,
            Some(user.id.as_bytes()),
        );

        match claimed {
            Ok(Ok(())) => Ok(user),
            Ok(Err(_)) => {
                // Lost the race: drop the now-unreachable record
                users_tree.remove(user.id.as_bytes())?;
                Err(StoreError::Duplicate)
            }
            Err(err) => {
                let _ = users_tree.remove(user.id.as_bytes());
                Err(err.into())
            }
        }
    }
}
