use std::fmt;

use thiserror::Error;

/// Full fingerprint of the key authorized to sign challenges for a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn new(fingerprint: &str) -> Result<Self, FingerprintError> {
        if fingerprint.is_empty() {
            return Err(FingerprintError::Empty);
        }
        if fingerprint.chars().any(char::is_whitespace) {
            return Err(FingerprintError::Whitespace);
        }
        Ok(Self(fingerprint.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether a signature's reported fingerprint is covered by this key.
    ///
    /// Containment, not equality, and in this direction only: the trusted
    /// fingerprint must contain the reported one as a substring. Engines may
    /// report a short key id instead of the full fingerprint, and a short id
    /// is a suffix of the full fingerprint it belongs to.
    pub fn covers(&self, reported: &str) -> bool {
        !reported.is_empty() && self.0.contains(reported)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FingerprintError {
    #[error("fingerprint must not be empty")]
    Empty,

    #[error("fingerprint must not contain whitespace")]
    Whitespace,
}
