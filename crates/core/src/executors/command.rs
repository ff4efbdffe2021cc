//! External program executor.
//!
//! Spawns the configured program with its arguments, exports each override
//! to the child as an `AGENT_*` environment variable, pipes the overrides
//! as JSON to stdin and captures stdout/stderr. The server's own
//! environment is never modified, so overrides cannot leak between jobs.

use std::process::Stdio;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;

use crate::agent::{Agent, AgentError};
use crate::overrides::{env_var_name, env_var_value, Overrides};

/// Maximum stdout or stderr size captured per stream (10 MiB).
const MAX_OUTPUT_BYTES: usize = 10 * 1024 * 1024;

/// Runs an external program once per invocation.
#[derive(Debug, Clone)]
pub struct CommandAgent {
    program: String,
    args: Vec<String>,
    working_directory: Option<String>,
}

impl CommandAgent {
    pub fn new(
        program: impl Into<String>,
        args: Vec<String>,
        working_directory: Option<String>,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            working_directory,
        }
    }

    fn build_command(&self, overrides: &Overrides) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        for (key, value) in overrides {
            cmd.env(env_var_name(key), env_var_value(value));
        }

        if let Some(dir) = &self.working_directory {
            cmd.current_dir(dir);
        }
        cmd
    }
}

#[async_trait]
impl Agent for CommandAgent {
    async fn run(&self, overrides: &Overrides) -> Result<Value, AgentError> {
        let mut child = self
            .build_command(overrides)
            .spawn()
            .map_err(AgentError::Spawn)?;
        let start = Instant::now();

        if let Some(mut stdin) = child.stdin.take() {
            let payload = serde_json::to_vec(overrides).unwrap_or_default();
            // The program may exit without reading stdin.
            let _ = stdin.write_all(&payload).await;
            drop(stdin);
        }

        let stdout_task = tokio::spawn(read_stream(child.stdout.take()));
        let stderr_task = tokio::spawn(read_stream(child.stderr.take()));

        let status = child.wait().await?;
        let stdout_bytes = stdout_task.await.unwrap_or_default();
        let stderr_bytes = stderr_task.await.unwrap_or_default();
        let stdout = String::from_utf8_lossy(&stdout_bytes).into_owned();
        let stderr = String::from_utf8_lossy(&stderr_bytes).into_owned();

        tracing::debug!(
            program = %self.program,
            exit_code = ?status.code(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Agent process exited",
        );

        match status.code() {
            Some(0) => Ok(serde_json::from_str(stdout.trim())
                .unwrap_or_else(|_| json!({ "stdout": stdout }))),
            Some(code) => Err(AgentError::NonZeroExit {
                code,
                stderr: stderr.trim().to_string(),
            }),
            None => Err(AgentError::Terminated),
        }
    }
}

/// Read a child stream to EOF, keeping at most [`MAX_OUTPUT_BYTES`].
///
/// Output past the cap is read and discarded rather than left in the pipe;
/// closing the pipe early would kill a chatty child with SIGPIPE.
async fn read_stream<R: AsyncRead + Unpin>(handle: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    let Some(mut h) = handle else {
        return buf;
    };

    let mut chunk = [0u8; 8192];
    let mut discarded = 0usize;
    loop {
        let n = match h.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        let keep = n.min(MAX_OUTPUT_BYTES - buf.len());
        buf.extend_from_slice(&chunk[..keep]);
        discarded += n - keep;
    }

    if discarded > 0 {
        tracing::warn!(
            kept = buf.len(),
            discarded,
            "Agent output exceeded capture limit; excess discarded",
        );
    }
    buf
}
