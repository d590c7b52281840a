//! Last-resort possession factor
//!
//! Proof that the user holds a removable medium carrying a fresh OpenPGP
//! signature over the current `"<machineId> <nonce>"` challenge. Every
//! successful attempt ratchets the nonce forward, so a captured signature
//! cannot be replayed; an attacker who can copy old signed files but holds
//! no private key never produces a fresh proof.
//!
//! The crate is laid out hexagonally: `ports` defines the engine and
//! prompt boundaries, `adapters` binds them to GnuPG and the terminal,
//! and `use_cases::authenticate` runs the flow. Hosts embedding the factor
//! call [`authenticate`] with a [`UserContext`] and their own prompt
//! channel.

pub mod adapters;
pub mod api;
pub mod error;
pub mod locator;
mod logic;
pub mod model;
pub mod ports;
pub mod state;
pub mod use_cases;

// Re-export commonly used types
pub use error::{LastResortError, LastResortResult};
pub use model::{AuthOutcome, Challenge, Fingerprint, TrustConfig};
pub use use_cases::UserContext;

// Re-export public API
pub use api::authenticate;
