//! Terminal prompt adapter, plus scripted prompts for tests

use std::io::{self, BufRead, Write};

use crate::error::{LastResortError, LastResortResult};
use crate::ports::Prompt;

/// Prompt over the process's own stdin/stdout
///
/// Used by the companion binary; a host framework supplies its own channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdioPrompt;

impl Prompt for StdioPrompt {
    fn present(&mut self, text: &str) -> LastResortResult<String> {
        let aborted = |err: io::Error| LastResortError::PromptAborted {
            reason: err.to_string(),
        };

        let mut stdout = io::stdout();
        stdout
            .write_all(text.as_bytes())
            .and_then(|()| stdout.flush())
            .map_err(aborted)?;

        let mut response = String::new();
        let read = io::stdin().lock().read_line(&mut response).map_err(aborted)?;
        if read == 0 {
            return Err(LastResortError::PromptAborted {
                reason: "end of input".to_string(),
            });
        }
        Ok(response.trim_end().to_string())
    }
}

/// Test prompt with an explicit transcript collector
///
/// Presented texts accumulate on the instance itself, so a test inspects
/// its own collector instead of process-wide state.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompt {
    pub transcript: Vec<String>,
}

#[cfg(test)]
impl ScriptedPrompt {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl Prompt for ScriptedPrompt {
    fn present(&mut self, text: &str) -> LastResortResult<String> {
        self.transcript.push(text.to_string());
        Ok("notneeded".to_string())
    }
}

/// Test prompt simulating a user abandoning the exchange
#[cfg(test)]
#[derive(Debug, Clone, Copy, Default)]
pub struct AbortingPrompt;

#[cfg(test)]
impl Prompt for AbortingPrompt {
    fn present(&mut self, _text: &str) -> LastResortResult<String> {
        Err(LastResortError::PromptAborted {
            reason: "user abandoned the exchange".to_string(),
        })
    }
}
