//! Recording transport for unit tests.

use std::collections::VecDeque;
use std::future;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::protocol::Command;

use super::Transport;

/// Canned answer for the next command.
pub(crate) enum Reply {
    /// Answer with a result value.
    Value(Value),
    /// Answer with an error.
    Error(Error),
    /// Never answer.
    Hang,
}

/// Transport that records commands and replays canned answers.
///
/// When the queue is empty every command answers `null`.
#[derive(Default)]
pub(crate) struct RecordingTransport {
    commands: Mutex<Vec<Command>>,
    timeouts: Mutex<Vec<Option<Duration>>>,
    replies: Mutex<VecDeque<Reply>>,
}

impl RecordingTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queues a successful answer.
    pub(crate) fn reply(&self, value: Value) -> &Self {
        self.replies.lock().push_back(Reply::Value(value));
        self
    }

    /// Queues an error answer.
    pub(crate) fn fail(&self, error: Error) -> &Self {
        self.replies.lock().push_back(Reply::Error(error));
        self
    }

    /// Queues an answer that never arrives.
    pub(crate) fn hang(&self) -> &Self {
        self.replies.lock().push_back(Reply::Hang);
        self
    }

    /// Returns the commands sent so far.
    pub(crate) fn commands(&self) -> Vec<Command> {
        self.commands.lock().clone()
    }

    /// Returns the timeout passed with each command.
    pub(crate) fn timeouts(&self) -> Vec<Option<Duration>> {
        self.timeouts.lock().clone()
    }

    /// Returns the number of commands sent so far.
    pub(crate) fn sent(&self) -> usize {
        self.commands.lock().len()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, command: Command, timeout: Option<Duration>) -> Result<Value> {
        self.commands.lock().push(command);
        self.timeouts.lock().push(timeout);
        let reply = self.replies.lock().pop_front();

        match reply {
            Some(Reply::Value(value)) => Ok(value),
            Some(Reply::Error(error)) => Err(error),
            Some(Reply::Hang) => future::pending().await,
            None => Ok(Value::Null),
        }
    }
}
