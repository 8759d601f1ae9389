use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Output, Stdio};
use std::time::{Duration, Instant};

use crate::errors::CentralError;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Builder for constructing and executing external processes.
///
/// Provides a fluent API for setting program, arguments, environment variables,
/// working directory and an optional timeout.
pub struct CommandBuilder {
    program: String,
    args: Vec<String>,
    env: HashMap<String, String>,
    cwd: Option<String>,
    timeout: Option<Duration>,
}

impl CommandBuilder {
    /// Create a new builder for the given program.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: HashMap::new(),
            cwd: None,
            timeout: None,
        }
    }

    /// Append a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append multiple arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for the child process.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Set the working directory for the child process.
    pub fn cwd(mut self, dir: impl Into<String>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Kill the child if it has not exited after `timeout`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        for (k, v) in &self.env {
            cmd.env(k, v);
        }
        if let Some(ref dir) = self.cwd {
            cmd.current_dir(Path::new(dir));
        }
        cmd
    }

    /// Execute the command and return its output.
    ///
    /// Returns `Ok(None)` when a timeout was configured and the child had to
    /// be killed.
    pub fn exec(&self) -> Result<Option<Output>, CentralError> {
        let Some(timeout) = self.timeout else {
            return self.command().output().map(Some).map_err(CentralError::from);
        };

        let mut child = self
            .command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let deadline = Instant::now() + timeout;
        loop {
            let polled = child.try_wait().map_err(|e| CentralError::Process {
                message: format!("failed to poll `{}`: {e}", self.program),
            })?;
            if let Some(status) = polled {
                let (stdout, stderr) = drain(&mut child);
                return Ok(Some(Output {
                    status,
                    stdout,
                    stderr,
                }));
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                tracing::debug!(
                    "`{}` timed out after {}ms",
                    self.program,
                    timeout.as_millis()
                );
                return Ok(None);
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }

    /// Execute the command and return trimmed stdout when it exits successfully
    /// with non-empty output. Spawn failures, timeouts and non-zero exits all
    /// yield `None`.
    pub fn stdout_line(&self) -> Option<String> {
        let output = match self.exec() {
            Ok(Some(output)) => output,
            Ok(None) => return None,
            Err(e) => {
                tracing::debug!("`{}` could not run: {e}", self.program);
                return None;
            }
        };
        if !output.status.success() {
            return None;
        }
        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!text.is_empty()).then_some(text)
    }
}

fn drain(child: &mut Child) -> (Vec<u8>, Vec<u8>) {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    if let Some(mut out) = child.stdout.take() {
        let _ = out.read_to_end(&mut stdout);
    }
    if let Some(mut err) = child.stderr.take() {
        let _ = err.read_to_end(&mut stderr);
    }
    (stdout, stderr)
}
