mod challenge;
mod fingerprint;
mod outcome;
mod trust_config;

pub use challenge::{Challenge, ChallengeError, NONCE_LENGTH};
pub use fingerprint::{Fingerprint, FingerprintError};
pub use outcome::AuthOutcome;
pub use trust_config::TrustConfig;
