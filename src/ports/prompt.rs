//! Prompt trait - the interactive channel to the user

use crate::error::LastResortResult;

/// Capability to exchange one prompt round-trip with the user
///
/// The flow presents the challenge text exactly once per attempt. The
/// response content is informational only; the proof travels on the
/// removable medium, not through this channel.
pub trait Prompt {
    /// Present text to the user and block until they respond
    ///
    /// # Errors
    ///
    /// Returns an error if the exchange is abandoned before completion; the
    /// attempt must then resolve to a denial with no state advanced.
    fn present(&mut self, text: &str) -> LastResortResult<String>;
}
