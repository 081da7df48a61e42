//! External command execution
//!
//! Commands are spawned from an argv array, never through a shell, so file
//! paths and generated tokens cannot be reinterpreted. Output is streamed to
//! the console while it is captured for the caller.

use crate::error::ScaffoldError;
use colored::Colorize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command as TokioCommand;
use tokio::sync::mpsc;
use tokio::time::timeout;

/// A single external program invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    /// Extra environment variables layered over the inherited environment
    pub env: Vec<(String, String)>,
}

impl Command {
    pub fn new(program: impl Into<String>, cwd: impl AsRef<Path>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.as_ref().to_path_buf(),
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Look up an environment override set on this command
    pub fn env_value(&self, key: &str) -> Option<&str> {
        self.env
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Quote a word for display the way a POSIX shell would need it
fn display_word(word: &str) -> String {
    let plain = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@%+,^~".contains(c));
    if plain {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.env {
            write!(f, "{}={} ", key, display_word(value))?;
        }
        write!(f, "{}", display_word(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", display_word(arg))?;
        }
        Ok(())
    }
}

/// Captured result of a command that exited successfully
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Combined stdout and stderr, one line per line received
    pub output: String,
    pub status: i32,
}

/// Runs external commands.
///
/// Implementations must treat any non-zero exit status as
/// [`ScaffoldError::CommandExecution`].
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    async fn run(&self, command: &Command) -> Result<CommandOutput, ScaffoldError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

/// Runs commands as real child processes
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    timeout: Option<Duration>,
    echo: bool,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessRunner {
    /// Runner without a timeout that echoes output to the console
    pub fn new() -> Self {
        Self {
            timeout: None,
            echo: true,
        }
    }

    /// Kill commands that run longer than `limit`
    pub fn with_timeout(mut self, limit: Option<Duration>) -> Self {
        self.timeout = limit;
        self
    }

    /// Toggle streaming of child output to the console
    pub fn echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }
}

impl CommandRunner for ProcessRunner {
    async fn run(&self, command: &Command) -> Result<CommandOutput, ScaffoldError> {
        let line = command.to_string();
        if self.echo {
            println!();
            println!("{} {}", "Running:".dimmed(), line.yellow());
        }

        let mut child = TokioCommand::new(&command.program)
            .args(&command.args)
            .current_dir(&command.cwd)
            .envs(command.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ScaffoldError::Spawn {
                command: line.clone(),
                source,
            })?;

        let (stdout, stderr) = match (child.stdout.take(), child.stderr.take()) {
            (Some(stdout), Some(stderr)) => (stdout, stderr),
            _ => {
                return Err(ScaffoldError::Spawn {
                    command: line,
                    source: std::io::Error::other("failed to capture child output"),
                })
            }
        };

        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(forward_lines(stdout, Stream::Stdout, tx.clone()));
        tokio::spawn(forward_lines(stderr, Stream::Stderr, tx));

        let echo = self.echo;
        // Dropping this future drops the child, which kills it
        let finished = async move {
            let output = collect_output(rx, echo).await;
            let status = child.wait().await;
            (output, status)
        };

        let (output, status) = match self.timeout {
            None => finished.await,
            Some(limit) => timeout(limit, finished).await.map_err(|_| {
                ScaffoldError::CommandTimedOut {
                    command: line.clone(),
                    seconds: limit.as_secs(),
                }
            })?,
        };

        let status = status?.code().unwrap_or(-1);
        if status != 0 {
            return Err(ScaffoldError::CommandExecution {
                command: line,
                status,
                output,
            });
        }

        Ok(CommandOutput { output, status })
    }
}

async fn forward_lines<S>(stream: S, source: Stream, tx: mpsc::UnboundedSender<(Stream, String)>)
where
    S: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf)
                    .trim_end_matches(['\n', '\r'])
                    .to_string();
                if tx.send((source, line)).is_err() {
                    break;
                }
            }
        }
    }
}

async fn collect_output(mut rx: mpsc::UnboundedReceiver<(Stream, String)>, echo: bool) -> String {
    let mut output = String::new();
    while let Some((source, line)) = rx.recv().await {
        if echo {
            match source {
                Stream::Stdout => println!("  {}", line),
                Stream::Stderr => eprintln!("  {}", line.yellow()),
            }
        }
        output.push_str(&line);
        output.push('\n');
    }
    output
}
