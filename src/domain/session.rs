use crate::domain::model::UserId;
use crate::domain::ports::IdentityProvider;
use crate::utils::error::{RatingError, Result};

/// Environment variable consulted when no user is given on the command line.
pub const ENV_USER_VAR: &str = "PROF_RATES_USER";

/// Per-call credential. Nothing about the caller is kept in process-wide state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<UserId>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn authenticated(user: UserId) -> Self {
        Self { user: Some(user) }
    }

    /// Builds a session from an explicit username, falling back to `PROF_RATES_USER`.
    /// Blank values yield an anonymous session.
    pub fn resolve(explicit: Option<&str>) -> Self {
        let name = explicit
            .map(str::to_string)
            .or_else(|| std::env::var(ENV_USER_VAR).ok());

        match name.as_deref().map(UserId::parse) {
            Some(Ok(user)) => Self::authenticated(user),
            _ => Self::anonymous(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

impl IdentityProvider for Session {
    fn current_user(&self) -> Result<UserId> {
        self.user.clone().ok_or(RatingError::Unauthenticated)
    }
}
