//! Running a build step with masked output.

use crate::error::{Result, SonarEnvError};
use crate::secrets::MaskingWriter;
use std::collections::HashMap;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Instant;

/// Result of running a build step.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Whether the step succeeded (exit code 0).
    pub success: bool,
}

/// Options for running a build step.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables (merged with the inherited environment).
    pub env: HashMap<String, String>,
}

/// Run `program` with `args`, copying its output through masking filters.
///
/// The program is spawned directly, not through a shell. Its stdout and
/// stderr are each copied on their own thread into `stdout` and `stderr`,
/// which are closed once the pipe ends so any trailing partial line is
/// still masked and emitted.
///
/// The command line carried by errors and debug events is masked with
/// the filters' maskers, since arguments often hold credentials.
///
/// # Errors
///
/// `CommandFailed` when the program cannot be spawned, `Io` when copying
/// output into either filter fails.
pub fn execute_masked<O, E>(
    program: &str,
    args: &[String],
    options: &CommandOptions,
    stdout: MaskingWriter<O>,
    stderr: MaskingWriter<E>,
) -> Result<CommandResult>
where
    O: Write + Send,
    E: Write + Send,
{
    let start = Instant::now();
    let command_line = stderr
        .masker()
        .mask(&stdout.masker().mask(&display_command(program, args)));

    let mut cmd = Command::new(program);
    cmd.args(args);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    cmd.envs(&options.env);
    cmd.stdin(Stdio::inherit());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    tracing::debug!(command = %command_line, "spawning build step");

    let mut child = cmd.spawn().map_err(|e| {
        tracing::debug!(error = %e, "spawn failed");
        SonarEnvError::CommandFailed {
            command: command_line.clone(),
            code: None,
        }
    })?;

    let child_stdout = child.stdout.take().ok_or_else(|| missing_pipe("stdout"))?;
    let child_stderr = child.stderr.take().ok_or_else(|| missing_pipe("stderr"))?;

    let (stdout_copy, stderr_copy) = thread::scope(|scope| {
        let stdout_handle = scope.spawn(move || pump(child_stdout, stdout));
        let stderr_handle = scope.spawn(move || pump(child_stderr, stderr));
        (join(stdout_handle), join(stderr_handle))
    });

    let status = child.wait().map_err(|_| SonarEnvError::CommandFailed {
        command: command_line.clone(),
        code: None,
    })?;

    stdout_copy?;
    stderr_copy?;

    tracing::debug!(
        command = %command_line,
        code = ?status.code(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "build step exited"
    );

    Ok(CommandResult {
        exit_code: status.code(),
        success: status.success(),
    })
}

/// Copy a child pipe into a masking filter, then close the filter.
fn pump<R: Read, W: Write>(mut source: R, mut sink: MaskingWriter<W>) -> io::Result<()> {
    io::copy(&mut source, &mut sink)?;
    sink.close()
}

fn join(handle: thread::ScopedJoinHandle<'_, io::Result<()>>) -> io::Result<()> {
    handle
        .join()
        .unwrap_or_else(|_| Err(io::Error::other("output copy thread panicked")))
}

fn missing_pipe(name: &str) -> SonarEnvError {
    SonarEnvError::Io(io::Error::other(format!("child {} was not captured", name)))
}

fn display_command(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}
