//! Signature-service traits - the OpenPGP engine boundary
//!
//! The engine is a black box: the core never inspects key material beyond
//! fingerprints and validity flags.

use crate::error::LastResortResult;
use crate::model::Fingerprint;

/// A key resolved through the engine's keyring
///
/// Carries only the full fingerprint the engine reports for it; the key
/// material itself stays inside the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedKey {
    pub fingerprint: Fingerprint,
}

/// One per-signature verification record from the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureRecord {
    /// The engine's summary judgment that the signature is
    /// cryptographically valid and chains to a non-revoked key
    pub valid: bool,
    /// Fingerprint the engine reports for the signer; may be a short key
    /// id rather than the full fingerprint
    pub fingerprint: String,
}

/// Result of verifying a self-contained signed message
///
/// Transient per attempt; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    /// The plaintext embedded in the signed message, read to completion
    pub plaintext: Vec<u8>,
    /// Per-signature verification records, in engine order
    pub signatures: Vec<SignatureRecord>,
}

/// Capability to resolve the single key a fingerprint designates
pub trait KeyLookup {
    /// Look up the key object for a fingerprint
    ///
    /// # Errors
    ///
    /// Fails if zero or more than one key matches; the calling attempt
    /// treats this as authentication failure, not a crash.
    fn lookup_key(&mut self, fingerprint: &Fingerprint) -> LastResortResult<TrustedKey>;
}

/// Capability to verify a self-contained signed message
pub trait MessageVerifier {
    /// Verify a signed blob carrying its own plaintext
    ///
    /// # Errors
    ///
    /// Returns an error when the engine cannot process the blob at all;
    /// a processable blob with bad signatures comes back as records whose
    /// validity flag is unset.
    fn verify_signed_message(&mut self, signed_blob: &[u8]) -> LastResortResult<Verification>;
}

/// Capability to produce a signed message
///
/// Enrollment and medium-resync tooling only; the authentication flow
/// itself never signs.
pub trait MessageSigner {
    fn sign_message(
        &mut self,
        plaintext: &[u8],
        signer: &Fingerprint,
    ) -> LastResortResult<Vec<u8>>;
}

/// Combined trait for the full engine capability set
pub trait SignatureService: KeyLookup + MessageVerifier + MessageSigner {}

// Blanket implementation for types that implement all capability traits
impl<T> SignatureService for T where T: KeyLookup + MessageVerifier + MessageSigner {}
