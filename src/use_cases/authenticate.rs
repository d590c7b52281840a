//! Authenticate use case - one full proof-of-possession attempt
//!
//! Orchestrates the attempt as an ordered chain: config, locked state,
//! candidate, prompt, medium, trust policy, commit. Every step before the
//! commit is read-only; a failure anywhere leaves the durable record
//! byte-identical to its pre-attempt value.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{ConfigError, LastResortError, LastResortResult, MediumError, StateError};
use crate::locator::{find_signature_file, SIGNATURE_FILE_NAME};
use crate::logic::signature_proves_possession;
use crate::model::{AuthOutcome, Challenge, Fingerprint, TrustConfig};
use crate::ports::{KeyLookup, MessageVerifier, Prompt};
use crate::state::ChallengeState;

/// Per-attempt invocation context supplied by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    pub config_path: PathBuf,
    pub state_path: PathBuf,
    pub gnupg_home: PathBuf,
    /// Whether the host allows a conversational prompt; this factor cannot
    /// run silently
    pub interactive: bool,
}

impl UserContext {
    /// Conventional dotfile layout under a user's home directory
    pub fn for_home(home: &Path) -> Self {
        Self {
            config_path: home.join(".lastresort_conf"),
            state_path: home.join(".lastresort_rollingstate"),
            gnupg_home: home.join(".gnupg"),
            interactive: true,
        }
    }
}

/// Run one authentication attempt against the given service and prompt
///
/// Never panics and never lets an error escape: every failure is flattened
/// to `Denied`, except operator-side problems (no enrollment, unusable
/// state record), which map to `Unavailable`.
pub fn authenticate<S, P>(service: &mut S, prompt: &mut P, ctx: &UserContext) -> AuthOutcome
where
    S: KeyLookup + MessageVerifier,
    P: Prompt,
{
    match run_attempt(service, prompt, ctx) {
        Ok(()) => {
            info!("challenge signature accepted; record rotated");
            AuthOutcome::Granted
        }
        Err(err) => {
            warn!("authentication attempt failed: {err}");
            outcome_for(&err)
        }
    }
}

fn run_attempt<S, P>(service: &mut S, prompt: &mut P, ctx: &UserContext) -> LastResortResult<()>
where
    S: KeyLookup + MessageVerifier,
    P: Prompt,
{
    let config = TrustConfig::load(&ctx.config_path)?;
    let mut state = ChallengeState::open(&ctx.state_path)?;

    // The plaintext the medium must be signing is the pre-rotation record;
    // the candidate is only held for a possible commit.
    let current_line = state.current().to_string();
    let candidate = state.next_candidate();

    if !ctx.interactive {
        return Err(LastResortError::NonInteractive);
    }

    // One blocking round-trip; the response content is unused.
    let _response = prompt.present(&challenge_prompt(
        &current_line,
        config.trusted_fingerprint(),
    ))?;

    let sig_path = find_signature_file(config.mount_point(), SIGNATURE_FILE_NAME).ok_or_else(
        || MediumError::NotFound {
            mount_point: config.mount_point().display().to_string(),
            file_name: SIGNATURE_FILE_NAME.to_string(),
        },
    )?;
    let signed_blob = fs::read(&sig_path).map_err(|source| MediumError::Unreadable {
        path: sig_path.display().to_string(),
        source,
    })?;

    if !signature_proves_possession(
        service,
        &current_line,
        &signed_blob,
        config.trusted_fingerprint(),
    ) {
        return Err(LastResortError::ProofRejected);
    }

    // Durable record first - it is the authoritative copy. The medium copy
    // is best-effort: a failure past this point must not flip an
    // already-granted outcome, it only leaves the medium stale.
    state.commit(&candidate)?;
    if let Err(err) = refresh_medium_copy(&sig_path, &candidate) {
        warn!(
            path = %sig_path.display(),
            "cannot write carry-forward copy to medium: {err}"
        );
    } else {
        debug!(path = %sig_path.display(), "carry-forward copy written to medium");
    }

    Ok(())
}

/// The human-facing challenge text, presented exactly once per attempt
///
/// Layout is load-bearing for operators and tooling: file name on the
/// first line, the exact challenge on the third, the fingerprint on the
/// fifth.
fn challenge_prompt(current_line: &str, trusted: &Fingerprint) -> String {
    format!(
        "Please insert USB drive with {SIGNATURE_FILE_NAME}\n\
         Containing signature of the following (NO NEWLINE):\n\
         {current_line}\n\
         by key corresponding to fingerprint:\n\
         {trusted}\n\
         Upon success {SIGNATURE_FILE_NAME} will ratchet forward.\n"
    )
}

/// Leave the next required plaintext on the medium for the user
fn refresh_medium_copy(sig_path: &Path, candidate: &Challenge) -> io::Result<()> {
    fs::write(sig_path, format!("{candidate}\n"))
}

fn outcome_for(err: &LastResortError) -> AuthOutcome {
    match err {
        LastResortError::Config(ConfigError::Missing { .. }) => AuthOutcome::Unavailable,
        // A concurrent attempt holds the lock: "try again", not an
        // enrollment problem.
        LastResortError::State(StateError::Busy { .. }) => AuthOutcome::Denied,
        // A record that cannot be read or advanced must not grant access;
        // an unadvanced nonce reopens the replay window.
        LastResortError::State(_) => AuthOutcome::Unavailable,
        _ => AuthOutcome::Denied,
    }
}
