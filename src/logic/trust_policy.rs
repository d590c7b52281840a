//! Trust policy - does a presented signature prove possession?
//!
//! The single accept/reject decision of the factor. Every failure path
//! collapses to `false`: the caller cannot tell a lookup failure from a bad
//! signature from a stale plaintext, which keeps the denial outcome free of
//! oracle information.

use tracing::warn;

use crate::model::Fingerprint;
use crate::ports::{KeyLookup, MessageVerifier};

/// Decide whether a signed blob proves possession of the expected plaintext
///
/// Accepts on the first verification record for which all of:
/// - the engine's validity flag is set,
/// - the trusted key's full fingerprint covers the record's reported
///   fingerprint (substring containment, tolerating short key ids),
/// - the extracted plaintext is byte-for-byte the expected challenge.
pub fn signature_proves_possession<S>(
    service: &mut S,
    expected_plaintext: &str,
    signed_blob: &[u8],
    trusted_fingerprint: &Fingerprint,
) -> bool
where
    S: KeyLookup + MessageVerifier,
{
    let key = match service.lookup_key(trusted_fingerprint) {
        Ok(key) => key,
        Err(err) => {
            warn!("trusted key lookup failed: {err}");
            return false;
        }
    };

    let verification = match service.verify_signed_message(signed_blob) {
        Ok(verification) => verification,
        Err(err) => {
            warn!("verification failed: {err}");
            return false;
        }
    };

    if verification.plaintext.is_empty() {
        warn!("signed message carried no plaintext");
        return false;
    }

    for record in &verification.signatures {
        if record.valid
            && key.fingerprint.covers(&record.fingerprint)
            && verification.plaintext == expected_plaintext.as_bytes()
        {
            return true;
        }
    }

    warn!("no signature matched the trusted key over the expected plaintext");
    false
}
