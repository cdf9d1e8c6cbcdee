//! Per-session FIFO command queue.
//!
//! Every session owns a fresh queue. Commands are named asynchronous
//! units of work executed strictly in enqueue order once the session is
//! active; a failing command stops the drain and leaves the remainder
//! queued.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;

use wd_runtime::Result;

type CommandFuture = Pin<Box<dyn Future<Output = Result<()>> + Send>>;
type CommandFn = Box<dyn FnOnce() -> CommandFuture + Send>;

struct QueuedCommand {
    name: String,
    run: CommandFn,
}

/// FIFO execution queue for automation commands.
#[derive(Default)]
pub struct CommandQueue {
    commands: VecDeque<QueuedCommand>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues a named command at the tail.
    pub fn add<F, Fut>(&mut self, name: impl Into<String>, command: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.commands.push_back(QueuedCommand {
            name: name.into(),
            run: Box::new(move || Box::pin(command())),
        });
    }

    /// Number of commands waiting.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Runs queued commands in order until the queue empties or a command
    /// fails. On failure the error surfaces and unexecuted commands stay
    /// queued.
    pub async fn run(&mut self) -> Result<()> {
        while let Some(command) = self.commands.pop_front() {
            tracing::debug!(name = %command.name, "running queued command");
            if let Err(err) = (command.run)().await {
                tracing::debug!(name = %command.name, error = %err, "queued command failed");
                return Err(err);
            }
        }
        Ok(())
    }

    /// Drops all pending commands.
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl std::fmt::Debug for CommandQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandQueue")
            .field("pending", &self.commands.len())
            .finish()
    }
}
