//! The process's primary input, output and error channels.

use std::io::{IsTerminal, Read, Write};

/// Standard streams as seen by a command. Tests substitute in-memory
/// buffers.
pub struct Console<'a> {
    stdin: Option<Box<dyn Read + Send>>,
    pub(crate) stdout: Box<dyn Write + 'a>,
    pub(crate) stderr: Box<dyn Write + 'a>,
    stdout_is_terminal: bool,
}

impl Console<'static> {
    /// The real standard streams of this process.
    pub fn from_process() -> Self {
        let stdout = std::io::stdout();
        let stdout_is_terminal = stdout.is_terminal();
        Self {
            stdin: Some(Box::new(std::io::stdin())),
            stdout: Box::new(stdout),
            stderr: Box::new(std::io::stderr()),
            stdout_is_terminal,
        }
    }
}

impl<'a> Console<'a> {
    /// Use the provided streams.
    pub fn new(
        stdin: impl Read + Send + 'static,
        stdout: impl Write + 'a,
        stderr: impl Write + 'a,
        stdout_is_terminal: bool,
    ) -> Self {
        Self {
            stdin: Some(Box::new(stdin)),
            stdout: Box::new(stdout),
            stderr: Box::new(stderr),
            stdout_is_terminal,
        }
    }

    /// Whether standard output is an interactive terminal.
    pub fn stdout_is_terminal(&self) -> bool {
        self.stdout_is_terminal
    }

    /// Take ownership of standard input; it can only be consumed once.
    pub(crate) fn take_stdin(&mut self) -> Box<dyn Read + Send> {
        self.stdin
            .take()
            .unwrap_or_else(|| Box::new(std::io::empty()))
    }
}

impl std::fmt::Debug for Console<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("stdin_taken", &self.stdin.is_none())
            .field("stdout_is_terminal", &self.stdout_is_terminal)
            .finish_non_exhaustive()
    }
}
