// Public API
pub mod auth_service;
pub mod error;
pub mod models;
pub mod password;
pub mod repository;
pub mod session;
pub mod sled_repository;
pub mod token;

// Re-export commonly used types
pub use auth_service::AuthService;
pub use error::{AuthError, StoreError, TokenError};
pub use models::{AuthResult, Credentials, User};
pub use repository::AccountStore;
pub use session::SessionValidator;
pub use sled_repository::SledAccountStore;
pub use token::{Claims, IssuedToken, RefreshDecision, RefreshPolicy, TokenService};
