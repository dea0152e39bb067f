//! Best-effort environment preparation before touching workbook files.
//!
//! A running spreadsheet application can hold an exclusive lock on the
//! workbook. [`ProcessTerminator`] tries to close it by executable name; it
//! never fails and may also close unrelated instances of the same program.

use std::process::{Command, Stdio};
use std::time::Duration;
use tracing::debug;

pub trait EnvironmentPreparer {
    /// Prepare the environment. Must not panic or fail.
    fn prepare(&self);
}

/// Does nothing (tests, platforms without the mechanism, `--no-kill`)
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEnvironment;

impl EnvironmentPreparer for NoopEnvironment {
    fn prepare(&self) {}
}

/// Terminates every process with a given executable name, then waits
#[derive(Debug, Clone)]
pub struct ProcessTerminator {
    image_name: String,
    settle: Duration,
}

impl ProcessTerminator {
    pub const DEFAULT_IMAGE: &'static str = "EXCEL.EXE";

    pub fn new(image_name: impl Into<String>, settle: Duration) -> Self {
        Self {
            image_name: image_name.into(),
            settle,
        }
    }

    /// Command that kills the processes on this platform
    fn kill_command(&self) -> Command {
        if cfg!(windows) {
            let mut cmd = Command::new("taskkill");
            cmd.args(["/F", "/IM", &self.image_name]);
            cmd
        } else {
            // pkill matches the process name without the Windows extension
            let stem = self
                .image_name
                .rsplit_once('.')
                .map(|(stem, _)| stem)
                .unwrap_or(&self.image_name);
            let mut cmd = Command::new("pkill");
            cmd.args(["-x", stem]);
            cmd
        }
    }
}

impl Default for ProcessTerminator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_IMAGE, Duration::from_secs(2))
    }
}

impl EnvironmentPreparer for ProcessTerminator {
    fn prepare(&self) {
        let result = self
            .kill_command()
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        match result {
            Ok(status) => debug!(
                process = %self.image_name,
                code = ?status.code(),
                "process termination finished"
            ),
            Err(e) => debug!(process = %self.image_name, "process termination unavailable: {}", e),
        }
        if !self.settle.is_zero() {
            std::thread::sleep(self.settle);
        }
    }
}
