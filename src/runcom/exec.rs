//! External command execution

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Exit status and captured output of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("running {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} {arg} exited with {code}: {}", .program.display(), .stderr.trim())]
    Failed {
        program: PathBuf,
        arg: String,
        code: ExitCode,
        stderr: String,
    },
}

/// Exit code as reported in [`CommandError::Failed`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub Option<i32>);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(c) => write!(f, "code {}", c),
            None => f.write_str("signal"),
        }
    }
}

/// Spawns a program and waits for it to finish
///
/// Non-zero exit is reported through [`CommandOutput::code`], not as an error;
/// callers decide what a failed exit means for them.
pub trait CommandRunner {
    fn run(&self, program: &Path, args: &[&str]) -> Result<CommandOutput, CommandError>;
}

/// Runs commands as child processes of the current one
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, program: &Path, args: &[&str]) -> Result<CommandOutput, CommandError> {
        log::debug!("running {} {}", program.display(), args.join(" "));

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| CommandError::Spawn {
                program: program.to_path_buf(),
                source,
            })?;

        let out = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !out.stderr.is_empty() {
            log::debug!("{} stderr: {}", program.display(), out.stderr.trim_end());
        }

        Ok(out)
    }
}
