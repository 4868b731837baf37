//! Persisted CLI profile: the chosen scope and API.

pub mod storage;

use serde::{Deserialize, Serialize};

use recsync_core::ScopeKey;

/// What the CLI remembers between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// The e-mail address records are scoped to.
    #[serde(default)]
    pub scope: ScopeKey,

    /// Record API base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api: Option<String>,
}

/// Check that `email` looks like an e-mail address.
///
/// Accepts `local@domain.tld` with no whitespace and exactly one `@`.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && tld.len() >= 2,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape() {
        assert!(is_valid_email("alice@example.com"));
        assert!(is_valid_email("a.b+c@mail.example.org"));
        assert!(!is_valid_email("alice"));
        assert!(!is_valid_email("alice@example"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("a@b@example.com"));
        assert!(!is_valid_email("alice @example.com"));
        assert!(!is_valid_email("alice@.com"));
    }

    #[test]
    fn empty_profile_round_trip() {
        let profile: Profile = serde_json::from_str("{}").unwrap();
        assert!(profile.scope.is_empty());
        assert_eq!(profile.api, None);
    }
}
