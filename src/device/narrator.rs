//! Spoken announcements.
//!
//! `LogNarrator` only records what would have been said. `CommandNarrator`
//! pipes the text to an external text-to-speech program (e.g. `espeak`) on
//! the tokio runtime, so a slow or hung speaker never stalls the key loop.

use std::process::Stdio;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::process::Command;

/// How long a TTS process may run before it is killed.
pub const DEFAULT_NARRATION_TIMEOUT: Duration = Duration::from_secs(15);

pub trait Narrator: Send {
    fn narrate(&self, text: &str);
}

/// Writes announcements to the log.
pub struct LogNarrator;

impl Narrator for LogNarrator {
    fn narrate(&self, text: &str) {
        info!("Narration: {}", text);
    }
}

/// Speaks announcements with an external program. The text is passed as the
/// last argument.
pub struct CommandNarrator {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandNarrator {
    /// Build from a command line such as `"espeak -s 140"`.
    /// Returns `None` for a blank command line.
    pub fn from_command_line(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
            timeout: DEFAULT_NARRATION_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Narrator for CommandNarrator {
    fn narrate(&self, text: &str) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("No async runtime available, narration dropped: {}", text);
            return;
        };

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let program = self.program.clone();
        let timeout = self.timeout;
        runtime.spawn(async move {
            let mut child = match command.spawn() {
                Ok(child) => child,
                Err(e) => {
                    warn!("Failed to start narrator '{}': {}", program, e);
                    return;
                }
            };
            match tokio::time::timeout(timeout, child.wait()).await {
                Ok(Ok(status)) if status.success() => debug!("Narrator '{}' finished", program),
                Ok(Ok(status)) => warn!("Narrator '{}' exited with {}", program, status),
                Ok(Err(e)) => warn!("Narrator '{}' failed: {}", program, e),
                Err(_) => warn!(
                    "Narrator '{}' timed out after {}s",
                    program,
                    timeout.as_secs()
                ),
            }
        });
    }
}
