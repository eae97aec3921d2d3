use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("password is required")]
    MissingPassword,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("an account with this email already exists")]
    DuplicateAccount,

    #[error("email or password is incorrect")]
    InvalidCredentials,

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("token error: {0}")]
    Token(#[from] TokenError),

    #[error("password hashing error: {0}")]
    Hashing(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store call timed out")]
    Timeout,

    #[error("record already exists")]
    Duplicate,

    #[error("storage error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<sled::Error> for StoreError {
    fn from(err: sled::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid token")]
    Invalid,

    #[error("signing secret is not configured")]
    MissingSecret,

    #[error("token signing failed: {0}")]
    Signing(String),
}
