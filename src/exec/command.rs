// src/exec/command.rs

use std::fmt;
use std::process::Stdio;

use tokio::process::Command;

/// The program to keep running, plus its arguments.
///
/// An empty argv is the "null command": nothing is ever started.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSpec {
    argv: Vec<String>,
}

impl CommandSpec {
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            argv: argv.into_iter().map(Into::into).collect(),
        }
    }

    pub fn null() -> Self {
        Self::default()
    }

    pub fn is_null(&self) -> bool {
        self.argv.is_empty()
    }

    pub fn program(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }

    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or(&[])
    }

    /// Build the OS command: standard streams inherited from us, and the
    /// child made leader of a new process group so the whole group can be
    /// signalled at once.
    pub(crate) fn to_command(&self) -> Option<Command> {
        let program = self.program()?;
        let mut cmd = Command::new(program);
        cmd.args(self.args())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .process_group(0);
        Some(cmd)
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.argv.join(" "))
    }
}
