//! Command runner - executes rendered command lines off the dispatch path.
//!
//! The dispatch engine queues `CommandRequest`s into a bounded channel; a
//! single worker task consumes them and runs each line through the platform
//! shell. MIDI delivery is never blocked on a command spawn, and a runaway
//! command is killed after a timeout.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::dispatch::CommandRequest;
use crate::error::CommandError;

/// Depth of the queue between the dispatch engine and the worker. A full
/// queue drops commands instead of stalling MIDI delivery.
pub const COMMAND_QUEUE_DEPTH: usize = 64;

/// Default bound on how long a triggered command may run.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Executes one complete command line.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, line: &str) -> Result<(), CommandError>;
}

/// Runs command lines through the platform command interpreter
/// (`sh -c` / `cmd /C`), bounded by a timeout.
pub struct ShellRunner {
    timeout: Duration,
}

impl ShellRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND_TIMEOUT)
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, line: &str) -> Result<(), CommandError> {
        let mut command = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(line);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(line);
            c
        };
        // The timeout drops the status future; make sure the child dies too.
        command.kill_on_drop(true);

        let status = match tokio::time::timeout(self.timeout, command.status()).await {
            Ok(Ok(status)) => status,
            Ok(Err(source)) => {
                return Err(CommandError::Spawn {
                    line: line.to_string(),
                    source,
                })
            }
            Err(_) => {
                return Err(CommandError::TimedOut {
                    line: line.to_string(),
                    timeout: self.timeout,
                })
            }
        };

        if status.success() {
            Ok(())
        } else {
            Err(CommandError::Failed {
                line: line.to_string(),
                status,
            })
        }
    }
}

/// Logs command lines instead of executing them (`--dry-run`).
pub struct LogRunner;

#[async_trait]
impl CommandRunner for LogRunner {
    async fn run(&self, line: &str) -> Result<(), CommandError> {
        info!("dry-run: {}", line);
        Ok(())
    }
}

/// Worker loop consuming the command queue.
///
/// Runs until every sender is dropped, draining what is left. Command
/// failures are logged and never stop the loop.
pub async fn run_worker(mut rx: mpsc::Receiver<CommandRequest>, runner: Arc<dyn CommandRunner>) {
    while let Some(request) = rx.recv().await {
        debug!("running '{}' for {}", request.line, request.control.token());
        if let Err(err) = runner.run(&request.line).await {
            warn!("{}", err);
        }
    }
    debug!("command worker stopped");
}
