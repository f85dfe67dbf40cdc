//! Concrete launchers

use std::process::{Command, Stdio};

use smslaunch_core::{Launcher, SmsUri};

/// Opens URIs with an external program such as `xdg-open` or `open`
#[derive(Debug, Clone)]
pub struct CommandLauncher {
    program: String,
}

impl CommandLauncher {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Launcher for CommandLauncher {
    fn launch(&self, uri: &SmsUri) {
        let spawned = Command::new(&self.program)
            .arg(uri.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match spawned {
            Ok(mut child) => {
                tracing::debug!(program = %self.program, uri = %uri, "Opened messaging app");
                // Reap the opener without blocking the caller
                std::thread::spawn(move || {
                    if let Err(e) = child.wait() {
                        tracing::warn!(error = %e, "Opener did not exit cleanly");
                    }
                });
            }
            Err(e) => {
                tracing::warn!(program = %self.program, error = %e, "Failed to open messaging app");
            }
        }
    }
}

/// Prints URIs instead of opening them
#[derive(Debug, Clone, Copy, Default)]
pub struct PrintLauncher;

impl Launcher for PrintLauncher {
    fn launch(&self, uri: &SmsUri) {
        tracing::info!(uri = %uri, "Dry run hand-off");
        println!("{}", uri);
    }
}
