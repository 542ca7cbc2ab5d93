//! JavaScript execution methods.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::browser::marshal::{ScriptArg, ScriptValue, decode_result, encode_args};
use crate::error::Result;
use crate::protocol::{Command, ScriptCommand};

use super::{Bounds, Session};

// ============================================================================
// ScriptCall
// ============================================================================

/// A script invocation with its arguments and bounds.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use remote_webdriver::ScriptCall;
///
/// let value = session
///     .run_script(
///         ScriptCall::new("return arguments[0] + arguments[1]")
///             .arg(1)
///             .arg(2)
///             .timeout(Duration::from_secs(1)),
///     )
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct ScriptCall {
    /// Function body.
    script: String,
    /// Arguments; `None` sends a single `null`.
    args: Option<Vec<ScriptArg>>,
    /// Run as an asynchronous script.
    asynchronous: bool,
    /// Bounds on the call.
    bounds: Bounds,
}

impl ScriptCall {
    /// Creates a synchronous call with no arguments.
    #[must_use]
    pub fn new(script: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            args: None,
            asynchronous: false,
            bounds: Bounds::default(),
        }
    }

    /// Appends one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<ScriptArg>) -> Self {
        self.args.get_or_insert_with(Vec::new).push(arg.into());
        self
    }

    /// Sets the full argument list, even if empty.
    #[must_use]
    pub fn args(mut self, args: impl IntoIterator<Item = ScriptArg>) -> Self {
        self.args = Some(args.into_iter().collect());
        self
    }

    /// Runs the script asynchronously; it completes by calling its last
    /// argument.
    #[must_use]
    pub fn asynchronous(mut self) -> Self {
        self.asynchronous = true;
        self
    }

    /// Bounds the call.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.bounds.timeout = Some(timeout);
        self
    }

    /// Aborts the call when `token` is cancelled.
    #[must_use]
    pub fn cancel_on(mut self, token: CancellationToken) -> Self {
        self.bounds.cancel = Some(token);
        self
    }
}

// ============================================================================
// Session - Script Execution
// ============================================================================

impl Session {
    /// Executes synchronous JavaScript in the page context.
    ///
    /// The script should use `return` to return a value.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let title = session.execute_script("return document.title", vec![]).await?;
    /// ```
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`](crate::Error::InvalidArgument) if an
    ///   argument cannot be encoded; nothing is sent
    /// - transport and remote errors
    pub async fn execute_script(&self, script: &str, args: Vec<ScriptArg>) -> Result<ScriptValue> {
        self.run_script(ScriptCall::new(script).args(args)).await
    }

    /// Executes asynchronous JavaScript in the page context.
    ///
    /// The script signals completion by calling its last argument.
    pub async fn execute_async_script(
        &self,
        script: &str,
        args: Vec<ScriptArg>,
    ) -> Result<ScriptValue> {
        self.run_script(ScriptCall::new(script).args(args).asynchronous())
            .await
    }

    /// Runs a configured script call.
    pub async fn run_script(&self, call: ScriptCall) -> Result<ScriptValue> {
        let ScriptCall {
            script,
            args,
            asynchronous,
            bounds,
        } = call;

        let args = encode_args(args.as_deref())?;
        debug!(script_len = script.len(), args = args.len(), asynchronous, "Executing script");

        let command = if asynchronous {
            Command::Script(ScriptCommand::ExecuteAsync { script, args })
        } else {
            Command::Script(ScriptCommand::Execute { script, args })
        };

        let raw = self.send_bounded(command, "script", &bounds).await?;
        Ok(decode_result(raw, self))
    }
}

// ============================================================================
// Tests
// ============================================================================
