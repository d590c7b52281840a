use std::fmt;

use rand::distr::Alphanumeric;
use rand::Rng;
use thiserror::Error;

/// Length of the random nonce, in alphanumeric characters
pub const NONCE_LENGTH: usize = 30;

/// The rotating challenge a medium's signature must cover
///
/// Serialized form is `"<machineId> <nonce>"`, the exact byte sequence the
/// user's key must sign, with no trailing newline. The machine id is bound
/// at enrollment and never changes; only the nonce rotates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    machine_id: String,
    nonce: String,
}

impl Challenge {
    /// Build a challenge from its two components
    pub fn new(machine_id: &str, nonce: &str) -> Result<Self, ChallengeError> {
        if machine_id.is_empty() {
            return Err(ChallengeError::Empty);
        }
        if machine_id.chars().any(char::is_whitespace) {
            return Err(ChallengeError::MachineIdWhitespace);
        }
        if nonce.is_empty() {
            return Err(ChallengeError::MissingNonce);
        }
        Ok(Self {
            machine_id: machine_id.to_string(),
            nonce: nonce.to_string(),
        })
    }

    /// Enrollment-time challenge: the given machine id with a fresh nonce
    pub fn initial(machine_id: &str) -> Result<Self, ChallengeError> {
        Self::new(machine_id, &fresh_nonce())
    }

    /// Parse the single-line serialized form
    pub fn parse(line: &str) -> Result<Self, ChallengeError> {
        let line = line.trim_end_matches(['\n', '\r']);
        let mut tokens = line.split_whitespace();
        let machine_id = tokens.next().filter(|t| !t.is_empty());
        let nonce = tokens.next();
        match (machine_id, nonce) {
            (None, _) => Err(ChallengeError::Empty),
            (Some(_), None) => Err(ChallengeError::MissingNonce),
            (Some(machine_id), Some(nonce)) => {
                if tokens.next().is_some() {
                    return Err(ChallengeError::TrailingContent);
                }
                Self::new(machine_id, nonce)
            }
        }
    }

    pub fn machine_id(&self) -> &str {
        &self.machine_id
    }

    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    /// The next candidate: same machine id, fresh random nonce
    ///
    /// Called once per attempt regardless of outcome; a rejected attempt
    /// simply discards the result.
    pub fn advance(&self) -> Self {
        Self {
            machine_id: self.machine_id.clone(),
            nonce: fresh_nonce(),
        }
    }
}

impl fmt::Display for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.machine_id, self.nonce)
    }
}

fn fresh_nonce() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LENGTH)
        .map(char::from)
        .collect()
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeError {
    #[error("challenge line is empty")]
    Empty,

    #[error("machine id must not contain whitespace")]
    MachineIdWhitespace,

    #[error("challenge line carries no nonce")]
    MissingNonce,

    #[error("challenge line carries more than two tokens")]
    TrailingContent,
}
