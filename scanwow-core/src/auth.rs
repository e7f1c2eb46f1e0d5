//! Bearer token verification.
//!
//! The configured secret is compared in constant time with respect to its
//! content. Inputs of differing length short-circuit to [`Verdict::Mismatch`],
//! which leaks the secret's length but nothing else.

use std::fmt;

use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::error::AuthError;

/// The only accepted authorization scheme.
pub const BEARER_SCHEME: &str = "Bearer";

/// The shared secret callers must present.
///
/// Wiped from memory on drop. Never printed by `Debug`.
#[derive(Clone)]
pub struct Credential(Zeroizing<Vec<u8>>);

impl Credential {
    /// Build a credential from configuration. Empty secrets count as unconfigured.
    pub fn new(secret: impl Into<Vec<u8>>) -> Option<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            None
        } else {
            Some(Self(Zeroizing::new(secret)))
        }
    }

    /// Constant-time comparison against a presented token.
    pub fn matches(&self, presented: &[u8]) -> bool {
        self.0.as_slice().ct_eq(presented).into()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&"[REDACTED]").finish()
    }
}

/// Outcome of checking an `Authorization` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Authorized,
    MissingHeader,
    MalformedHeader,
    SecretUnconfigured,
    Mismatch,
}

impl Verdict {
    pub fn into_result(self) -> Result<(), AuthError> {
        match self {
            Verdict::Authorized => Ok(()),
            Verdict::MissingHeader => Err(AuthError::MissingHeader),
            Verdict::MalformedHeader => Err(AuthError::MalformedHeader),
            Verdict::SecretUnconfigured => Err(AuthError::SecretUnconfigured),
            Verdict::Mismatch => Err(AuthError::Mismatch),
        }
    }
}

/// Check a raw `Authorization` header value against the configured secret.
///
/// An unconfigured secret wins over every header problem so that a broken
/// deployment answers the same way for all callers.
pub fn verify(header: Option<&[u8]>, secret: Option<&Credential>) -> Verdict {
    let Some(secret) = secret else {
        return Verdict::SecretUnconfigured;
    };

    let Some(header) = header else {
        return Verdict::MissingHeader;
    };

    let Some(token) = bearer_token(header) else {
        return Verdict::MalformedHeader;
    };

    if secret.matches(token) {
        Verdict::Authorized
    } else {
        tracing::warn!(presented_len = token.len(), "Invalid token attempt");
        Verdict::Mismatch
    }
}

/// Split `Bearer <token>` into its token. Exactly one space, non-empty token.
fn bearer_token(header: &[u8]) -> Option<&[u8]> {
    let value = std::str::from_utf8(header).ok()?;
    let mut parts = value.split(' ');
    let scheme = parts.next()?;
    let token = parts.next()?;

    if parts.next().is_some() || scheme != BEARER_SCHEME || token.is_empty() {
        return None;
    }

    Some(token.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret() -> Credential {
        Credential::new("secret123").unwrap()
    }

    fn header(value: &str) -> Option<&[u8]> {
        Some(value.as_bytes())
    }

    #[test]
    fn test_matching_token_is_authorized() {
        let verdict = verify(header("Bearer secret123"), Some(&secret()));
        assert_eq!(verdict, Verdict::Authorized);
        assert!(verdict.into_result().is_ok());
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(verify(None, Some(&secret())), Verdict::MissingHeader);
    }

    #[test]
    fn test_unconfigured_secret_wins() {
        assert_eq!(verify(None, None), Verdict::SecretUnconfigured);
        assert_eq!(
            verify(header("Bearer secret123"), None),
            Verdict::SecretUnconfigured
        );
        assert_eq!(
            verify(header("garbage"), None).into_result(),
            Err(AuthError::SecretUnconfigured)
        );
    }

    #[test]
    fn test_empty_secret_is_unconfigured() {
        assert!(Credential::new("").is_none());
    }

    #[test]
    fn test_malformed_headers() {
        let s = secret();
        for value in [
            "secret123",
            "Basic secret123",
            "bearer secret123",
            "Bearer",
            "Bearer ",
            "Bearer  secret123",
            "Bearer secret123 extra",
            "Bearer\tsecret123",
        ] {
            assert_eq!(
                verify(header(value), Some(&s)),
                Verdict::MalformedHeader,
                "header {value:?}"
            );
        }

        let not_utf8: &[u8] = &[0xff, 0xfe, 0x20, 0x41];
        assert_eq!(verify(Some(not_utf8), Some(&s)), Verdict::MalformedHeader);
    }

    #[test]
    fn test_wrong_token_is_mismatch() {
        let s = secret();
        assert_eq!(verify(header("Bearer secret124"), Some(&s)), Verdict::Mismatch);
        assert_eq!(
            verify(header("Bearer wrong"), Some(&s)).into_result(),
            Err(AuthError::Mismatch)
        );
    }

    #[test]
    fn test_length_mismatch_is_mismatch() {
        let s = secret();
        assert_eq!(verify(header("Bearer s"), Some(&s)), Verdict::Mismatch);
        assert_eq!(verify(header("Bearer secret12"), Some(&s)), Verdict::Mismatch);
        assert_eq!(
            verify(header("Bearer secret123secret123"), Some(&s)),
            Verdict::Mismatch
        );
    }

    #[test]
    fn test_debug_is_redacted() {
        let rendered = format!("{:?}", secret());
        assert!(!rendered.contains("secret123"));
        assert!(rendered.contains("REDACTED"));
    }
}
