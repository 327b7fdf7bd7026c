use std::fmt;

use super::wire::{RawCaseManagerPerformance, RawDashboardStats, RawTeamPerformance};

/// Credential handed to the data source on every call. There is no
/// ambient session: whoever drives the service must supply the token
/// explicitly each time.
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    /// Accept a raw token, rejecting blank values.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Parse an `Authorization` header value of the form `Bearer <token>`.
    pub fn from_bearer_header(header: &str) -> Option<Self> {
        let rest = header.trim().strip_prefix("Bearer ")?;
        Self::new(rest)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Tokens never reach logs in clear text.
        f.write_str("AccessToken(..)")
    }
}

/// Failures surfaced by a data source. None of these are fatal; callers
/// report them as a degraded view and wait for a user-triggered reload.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("upstream rejected the access token")]
    Denied,
    #[error("upstream unavailable: {0}")]
    Unavailable(String),
    #[error("malformed upstream payload: {0}")]
    Malformed(String),
}

/// The external data-access collaborator. Implementations own transport
/// and serialization; the analytics core only sees decoded raw records.
pub trait PerformanceSource: Send + Sync {
    fn case_manager_performance(
        &self,
        token: &AccessToken,
    ) -> Result<Vec<RawCaseManagerPerformance>, SourceError>;

    fn team_performance(&self, token: &AccessToken)
        -> Result<Vec<RawTeamPerformance>, SourceError>;

    fn dashboard_stats(&self, token: &AccessToken) -> Result<RawDashboardStats, SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_header_parsing() {
        let token = AccessToken::from_bearer_header("Bearer abc123").expect("valid");
        assert_eq!(token.as_str(), "abc123");

        assert!(AccessToken::from_bearer_header("Bearer    ").is_none());
        assert!(AccessToken::from_bearer_header("Basic abc123").is_none());
        assert!(AccessToken::new("").is_none());
    }

    #[test]
    fn debug_output_redacts_the_token() {
        let token = AccessToken::new("super-secret").expect("valid");
        assert_eq!(format!("{token:?}"), "AccessToken(..)");
    }
}
