//! GnuPG implementation of the signature-service ports
//!
//! This module binds the signature-service traits to the system's OpenPGP
//! engine through the gpgme crate. The engine runs against the user's own
//! keyring under a configurable home directory.

use std::path::Path;

use gpgme::{Context, Protocol, SignMode, SignatureSummary};
use tracing::debug;

use crate::error::{LastResortError, LastResortResult, ServiceError};
use crate::model::Fingerprint;
use crate::ports::{
    KeyLookup, MessageSigner, MessageVerifier, SignatureRecord, TrustedKey, Verification,
};

/// Signature service backed by the GnuPG engine
///
/// Holds one engine context for the attempt's lifetime; the context is
/// released when the service is dropped.
pub struct GpgmeSignatureService {
    ctx: Context,
}

impl GpgmeSignatureService {
    /// Create an engine context over the given GnuPG home directory
    pub fn new(gnupg_home: &Path) -> LastResortResult<Self> {
        let home = gnupg_home.to_str().ok_or_else(|| {
            LastResortError::Service(ServiceError::Engine {
                reason: format!("GnuPG home {} is not valid UTF-8", gnupg_home.display()),
            })
        })?;

        let mut ctx = Context::from_protocol(Protocol::OpenPgp).map_err(|err| {
            LastResortError::Service(ServiceError::Engine {
                reason: format!("cannot create OpenPGP context: {err}"),
            })
        })?;
        ctx.set_engine_home_dir(home).map_err(|err| {
            LastResortError::Service(ServiceError::Engine {
                reason: format!("cannot set engine home {home}: {err}"),
            })
        })?;

        debug!(home, "OpenPGP engine context created");
        Ok(Self { ctx })
    }
}

impl KeyLookup for GpgmeSignatureService {
    fn lookup_key(&mut self, fingerprint: &Fingerprint) -> LastResortResult<TrustedKey> {
        // get_key resolves exactly one key; zero or ambiguous matches come
        // back as engine errors
        let key = self.ctx.get_key(fingerprint.as_str()).map_err(|err| {
            LastResortError::Service(ServiceError::KeyLookup {
                fingerprint: fingerprint.to_string(),
                reason: err.to_string(),
            })
        })?;

        let full = key.fingerprint().map_err(|_| {
            LastResortError::Service(ServiceError::KeyLookup {
                fingerprint: fingerprint.to_string(),
                reason: "engine reported a non-UTF-8 fingerprint".to_string(),
            })
        })?;
        let fingerprint = Fingerprint::new(full).map_err(|err| {
            LastResortError::Service(ServiceError::KeyLookup {
                fingerprint: full.to_string(),
                reason: err.to_string(),
            })
        })?;

        Ok(TrustedKey { fingerprint })
    }
}

impl MessageVerifier for GpgmeSignatureService {
    fn verify_signed_message(&mut self, signed_blob: &[u8]) -> LastResortResult<Verification> {
        // The message carries its own plaintext; the engine extracts it
        // into the output buffer while checking the signatures.
        let mut plaintext = Vec::new();
        let result = self
            .ctx
            .verify_opaque(signed_blob, &mut plaintext)
            .map_err(|err| {
                LastResortError::Service(ServiceError::Verification {
                    reason: err.to_string(),
                })
            })?;

        let signatures = result
            .signatures()
            .map(|sig| SignatureRecord {
                valid: sig.summary().contains(SignatureSummary::VALID),
                fingerprint: sig.fingerprint().unwrap_or_default().to_string(),
            })
            .collect();

        Ok(Verification {
            plaintext,
            signatures,
        })
    }
}

impl MessageSigner for GpgmeSignatureService {
    fn sign_message(
        &mut self,
        plaintext: &[u8],
        signer: &Fingerprint,
    ) -> LastResortResult<Vec<u8>> {
        let key = self.ctx.get_key(signer.as_str()).map_err(|err| {
            LastResortError::Service(ServiceError::KeyLookup {
                fingerprint: signer.to_string(),
                reason: err.to_string(),
            })
        })?;

        self.ctx.clear_signers();
        self.ctx.add_signer(&key).map_err(|err| {
            LastResortError::Service(ServiceError::Signing {
                reason: err.to_string(),
            })
        })?;

        let mut signed = Vec::new();
        self.ctx
            .sign(SignMode::Normal, plaintext, &mut signed)
            .map_err(|err| {
                LastResortError::Service(ServiceError::Signing {
                    reason: err.to_string(),
                })
            })?;
        self.ctx.clear_signers();

        Ok(signed)
    }
}
