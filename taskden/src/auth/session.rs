use std::sync::Arc;

use super::token::TokenService;

/// Gate for authenticated-only views: is this bearer token good right now?
pub struct SessionValidator {
    tokens: Arc<TokenService>,
}

impl SessionValidator {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }

    /// True iff a token was presented, its signature checks out, and it has
    /// not expired. No side effects.
    pub fn validate(&self, token: Option<&str>) -> bool {
        match token {
            Some(token) => self.tokens.validate(token),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::RefreshPolicy;
    use chrono::{DateTime, Duration, Utc};
    use shared::clock::Clock;
    use std::sync::Mutex;

    #[derive(Clone)]
    struct FixedClock(Arc<Mutex<DateTime<Utc>>>);

    impl FixedClock {
        fn starting_now() -> Self {
            Self(Arc::new(Mutex::new(Utc::now())))
        }

        fn advance(&self, by: Duration) {
            let mut now = self.0.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    #[test]
    fn test_validates_fresh_token() {
        let tokens = Arc::new(TokenService::new(
            "test-secret",
            Duration::hours(1),
            RefreshPolicy::default(),
        ));
        let validator = SessionValidator::new(tokens.clone());

        let issued = tokens.issue("user-1").unwrap();
        assert!(validator.validate(Some(&issued.token)));
    }

    #[test]
    fn test_rejects_absent_and_garbage_tokens() {
        let tokens = Arc::new(TokenService::new(
            "test-secret",
            Duration::hours(1),
            RefreshPolicy::default(),
        ));
        let validator = SessionValidator::new(tokens);

        assert!(!validator.validate(None));
        assert!(!validator.validate(Some("not-a-token")));
    }

    #[test]
    fn test_rejects_expired_token() {
        let clock = FixedClock::starting_now();
        let tokens = Arc::new(TokenService::with_clock(
            "test-secret",
            Duration::hours(1),
            RefreshPolicy::default(),
            Arc::new(clock.clone()),
        ));
        let validator = SessionValidator::new(tokens.clone());

        let issued = tokens.issue("user-1").unwrap();
        assert!(validator.validate(Some(&issued.token)));

        clock.advance(Duration::hours(2));
        assert!(!validator.validate(Some(&issued.token)));
    }
}
