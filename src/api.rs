//! Public API - default wiring of the authentication flow
//!
//! Binds the flow to the GnuPG engine adapter. Callers supplying their own
//! service implementation use `use_cases::authenticate` directly.

use tracing::warn;

use crate::adapters::GpgmeSignatureService;
use crate::model::AuthOutcome;
use crate::ports::Prompt;
use crate::use_cases::{self, UserContext};

/// Run one authentication attempt with the system's OpenPGP engine
///
/// An engine that cannot be constructed fails closed: the attempt is
/// denied, never granted and never crashed.
pub fn authenticate(ctx: &UserContext, prompt: &mut impl Prompt) -> AuthOutcome {
    let mut service = match GpgmeSignatureService::new(&ctx.gnupg_home) {
        Ok(service) => service,
        Err(err) => {
            warn!("signature engine unavailable: {err}");
            return AuthOutcome::Denied;
        }
    };
    use_cases::authenticate(&mut service, prompt, ctx)
}
