//! Ports (traits) for the authentication core
//!
//! These traits define the capabilities the core depends on - the
//! signature-verification service and the interactive prompt channel. They
//! represent ports in hexagonal architecture: the core depends on these
//! abstractions, not concrete implementations.
//!
//! The traits are engine agnostic - they define what operations can be
//! performed, not how they are implemented.

mod prompt;
mod signature_service;

pub use prompt::Prompt;
pub use signature_service::{
    KeyLookup, MessageSigner, MessageVerifier, SignatureRecord, SignatureService, TrustedKey,
    Verification,
};
