//! Explicit calendar credentials.
//!
//! A token is handed to whichever client performs the fetch; nothing here is
//! stored in process-wide state.

use std::fmt;

use crate::error::{CalendarError, Result};

/// Environment variable read by [`AccessToken::from_env_default`].
pub const DEFAULT_TOKEN_ENV: &str = "GOOGLE_ACCESS_TOKEN";

/// An OAuth bearer token for a calendar API.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Read a token from the environment variable `var`.
    ///
    /// # Errors
    /// `MissingCredential` if the variable is unset or blank.
    pub fn from_env(var: &str) -> Result<Self> {
        match std::env::var(var) {
            Ok(value) if !value.trim().is_empty() => Ok(Self(value.trim().to_string())),
            _ => Err(CalendarError::MissingCredential(format!(
                "environment variable {} is not set",
                var
            ))),
        }
    }

    pub fn from_env_default() -> Result<Self> {
        Self::from_env(DEFAULT_TOKEN_ENV)
    }

    /// Value for an `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_secret() {
        let token = AccessToken::new("ya29.secret-value");
        let printed = format!("{:?}", token);
        assert!(!printed.contains("secret"));
    }

    #[test]
    fn bearer_header_value() {
        assert_eq!(AccessToken::new("abc").bearer(), "Bearer abc");
    }

    #[test]
    fn missing_env_var_is_an_error() {
        let err = AccessToken::from_env("MEETUP_CALENDAR_TEST_UNSET_TOKEN").unwrap_err();
        assert!(matches!(err, CalendarError::MissingCredential(_)));
    }
}
