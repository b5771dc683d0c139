//! Core types for secret retrieval.

use std::fmt;
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::SecretsError;

/// Selector identifying a concrete backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum SourceType {
    /// The process environment.
    #[serde(alias = "env")]
    Environment,
}

impl SourceType {
    /// Returns the canonical name of the backend.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Environment => "environment",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = SecretsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "environment" | "env" => Ok(Self::Environment),
            other => Err(SecretsError::UnsupportedBackend(other.to_owned())),
        }
    }
}

/// A secret value with automatic memory zeroisation.
///
/// The value is stored as a `SecretString` which prevents accidental logging
/// and ensures memory is zeroed when dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretValue {
    #[zeroize(skip)]
    inner: SecretString,
}

impl SecretValue {
    /// Creates a new secret value from a string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            inner: SecretString::from(value.into()),
        }
    }

    /// Exposes the secret value for use.
    ///
    /// The returned reference should not be logged or stored.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.inner.expose_secret()
    }

    /// Returns the length of the secret value in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.expose_secret().len()
    }

    /// Returns true if the secret value is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.expose_secret().is_empty()
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl PartialEq for SecretValue {
    /// Constant-time comparison.
    fn eq(&self, other: &Self) -> bool {
        let self_bytes = self.inner.expose_secret().as_bytes();
        let other_bytes = other.inner.expose_secret().as_bytes();

        if self_bytes.len() != other_bytes.len() {
            return false;
        }

        self_bytes.ct_eq(other_bytes).into()
    }
}

impl Eq for SecretValue {}

impl From<String> for SecretValue {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecretValue {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn source_type_parses_names_and_aliases() {
        assert_eq!(
            "environment".parse::<SourceType>().unwrap(),
            SourceType::Environment
        );
        assert_eq!("env".parse::<SourceType>().unwrap(), SourceType::Environment);
        assert_eq!(
            " Environment ".parse::<SourceType>().unwrap(),
            SourceType::Environment
        );
    }

    #[test]
    fn source_type_rejects_unknown() {
        let err = "vault".parse::<SourceType>().unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Unsupported);
        assert_eq!(err.to_string(), "unsupported secrets backend: vault");
    }

    #[test]
    fn source_type_display_round_trips() {
        let ty = SourceType::Environment;
        assert_eq!(ty.to_string(), "environment");
        assert_eq!(ty.to_string().parse::<SourceType>().unwrap(), ty);
    }

    #[test]
    fn secret_value_redacted_debug() {
        let value = SecretValue::new("super-secret");
        let debug = format!("{value:?}");
        assert_eq!(debug, "[REDACTED]");
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn secret_value_expose() {
        let value = SecretValue::from("super-secret");
        assert_eq!(value.expose(), "super-secret");
        assert_eq!(value.len(), 12);
    }

    #[test]
    fn secret_value_uses_constant_time_comparison() {
        let value1 = SecretValue::new("correct_password_12345");
        let value2 = SecretValue::new("correct_password_12345");
        assert_eq!(value1, value2);

        let value3 = SecretValue::new("wrong_password__12345");
        assert_ne!(value1, value3);

        let value4 = SecretValue::new("short");
        assert_ne!(value1, value4);

        let empty1 = SecretValue::new("");
        let empty2 = SecretValue::new("");
        assert_eq!(empty1, empty2);
        assert_ne!(empty1, value1);
    }

    #[test]
    fn secret_value_empty_string() {
        let empty = SecretValue::new(String::new());
        assert!(empty.is_empty());
        assert_eq!(empty.len(), 0);
        assert_eq!(empty.expose(), "");
    }

    #[test]
    fn secret_value_special_characters() {
        let control = SecretValue::new("line1\nline2\ttab\rreturn\0null");
        assert!(control.expose().contains('\n'));
        assert!(control.expose().contains('\0'));

        let special = SecretValue::new("quote\"backslash\\percent%underscore_");
        assert_eq!(special.expose(), "quote\"backslash\\percent%underscore_");
    }
}
