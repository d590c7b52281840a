//! Adapters - concrete implementations of ports (traits)

mod gpgme_service;
mod stdio_prompt;

#[cfg(test)]
pub mod fake_service;

// Re-export for convenience
pub use gpgme_service::GpgmeSignatureService;
pub use stdio_prompt::StdioPrompt;

#[cfg(test)]
pub use stdio_prompt::{AbortingPrompt, ScriptedPrompt};
