//! JWT Claims Structure and Authorization Helpers
//!
//! This module defines the JwtClaims structure that the server gate stores in request
//! extensions after a token has been verified.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Verified principal attached to an inbound call
///
/// Derived from `crypto_core::jwt::Claims` once the codec has accepted the token.
/// Fields are public for direct access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Username of the caller
    pub username: String,

    /// Role compared against the access policy
    pub role: String,

    /// Expiration timestamp (Unix timestamp)
    pub exp: i64,
}

impl JwtClaims {
    /// Create JwtClaims from the codec's verified claims
    pub fn from_validated_claims(claims: &crypto_core::jwt::Claims) -> Self {
        Self {
            username: claims.username.clone(),
            role: claims.role.clone(),
            exp: claims.exp,
        }
    }

    /// Whether the caller's role is any member of `roles` (exact, case-sensitive match)
    pub fn has_any_role(&self, roles: &HashSet<String>) -> bool {
        roles.contains(&self.role)
    }

    /// Absolute expiry of the token the claims came from
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: &str) -> JwtClaims {
        JwtClaims {
            username: "testuser".to_string(),
            role: role.to_string(),
            exp: 1234571490,
        }
    }

    #[test]
    fn test_from_validated_claims() {
        let crypto_claims = crypto_core::jwt::Claims {
            username: "testuser".to_string(),
            role: "admin".to_string(),
            iat: 1234567890,
            exp: 1234571490,
        };

        let jwt_claims = JwtClaims::from_validated_claims(&crypto_claims);

        assert_eq!(jwt_claims.username, "testuser");
        assert_eq!(jwt_claims.role, "admin");
        assert_eq!(jwt_claims.exp, 1234571490);
    }

    #[test]
    fn test_has_any_role() {
        let roles: HashSet<String> = ["admin", "user"].iter().map(|r| r.to_string()).collect();

        assert!(claims("user").has_any_role(&roles));
        assert!(!claims("guest").has_any_role(&roles));
        assert!(!claims("user").has_any_role(&HashSet::new()));
        assert!(!claims("Admin").has_any_role(&roles));
        assert!(!claims("user ").has_any_role(&roles));
    }
}
