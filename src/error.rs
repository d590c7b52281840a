//! Error types for the lastresort library
//!
//! Errors are organized hierarchically and use thiserror for
//! implementation. The authentication flow catches every one of these at
//! its boundary and flattens it to a three-way outcome; nothing here is
//! allowed to escape `authenticate` as a panic.

use thiserror::Error;

/// Result type alias for lastresort operations
pub type LastResortResult<T> = Result<T, LastResortError>;

/// Top-level error type for all lastresort operations
#[derive(Error, Debug)]
pub enum LastResortError {
    /// Per-user configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Durable challenge-state errors
    #[error("challenge state error: {0}")]
    State(#[from] StateError),

    /// Removable-medium errors
    #[error("removable medium error: {0}")]
    Medium(#[from] MediumError),

    /// Signature-service errors
    #[error("signature service error: {0}")]
    Service(#[from] ServiceError),

    /// The factor was invoked without an interactive prompt channel
    #[error("an interactive prompt is required; refusing to run silently")]
    NonInteractive,

    /// The prompt exchange was abandoned before completion
    #[error("prompt exchange abandoned: {reason}")]
    PromptAborted { reason: String },

    /// The presented signature does not prove possession of the current
    /// challenge. Deliberately cause-free: callers must not be able to
    /// tell a wrong key from a stale nonce.
    #[error("presented signature does not prove possession of the current challenge")]
    ProofRejected,
}

/// Per-user configuration record errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No configuration record for this user; the factor is not enrolled
    #[error("no configuration found at {path}")]
    Missing { path: String },

    /// The record exists but does not carry the two expected tokens
    #[error("malformed configuration: {reason}")]
    Malformed { reason: String },

    /// Fingerprint token failed validation
    #[error("invalid trusted fingerprint: {0}")]
    Fingerprint(#[from] crate::model::FingerprintError),
}

/// Durable challenge-state record errors
#[derive(Error, Debug)]
pub enum StateError {
    /// The record cannot be opened for combined read/write access
    #[error("cannot open challenge state {path}: {source}")]
    Unavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Another attempt holds the exclusive lock on the record
    #[error("challenge state {path} is locked by a concurrent attempt")]
    Busy { path: String },

    /// The record's first line is not a challenge
    #[error("malformed challenge state: {0}")]
    Malformed(#[from] crate::model::ChallengeError),

    /// Rewriting the record on success failed; the attempt must not be
    /// granted, since an unadvanced nonce reopens the replay window
    #[error("cannot persist rotated challenge: {source}")]
    Persist {
        #[source]
        source: std::io::Error,
    },
}

/// Removable-medium errors
#[derive(Error, Debug)]
pub enum MediumError {
    /// No signature file under the mount point
    #[error("signature file {file_name} not found under {mount_point}")]
    NotFound {
        mount_point: String,
        file_name: String,
    },

    /// The located signature file could not be read
    #[error("cannot read signature file {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Signature-service errors
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Engine construction or configuration failed
    #[error("engine unavailable: {reason}")]
    Engine { reason: String },

    /// Zero or more than one key matched the trusted fingerprint
    #[error("key lookup for {fingerprint} failed: {reason}")]
    KeyLookup { fingerprint: String, reason: String },

    /// The engine reported an error while verifying a signed message
    #[error("verification failed: {reason}")]
    Verification { reason: String },

    /// The engine reported an error while producing a signature
    #[error("signing failed: {reason}")]
    Signing { reason: String },
}
