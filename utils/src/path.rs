use std::fmt::Display;

/// Helper to display a command line argument, typically a path, in error
/// messages.
#[derive(Debug)]
pub struct ShellQuoted<'a> {
    arg: &'a str,
}

impl<'a> Display for ShellQuoted<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self.arg;
        if s.chars()
            .all(|c| matches!(c, '/' | '.' | '-' | '_' | ':') || c.is_alphanumeric())
        {
            return f.write_str(s);
        }
        match shlex::try_quote(s) {
            Ok(quoted) => f.write_str(&quoted),
            // Only possible with embedded NUL
            Err(_) => write!(f, "{s:?}"),
        }
    }
}

impl<'a> ShellQuoted<'a> {
    /// Quote an argument in a way that it would be parsed by a default
    /// POSIX shell. If it is plain (no spaces or shell meta-characters),
    /// it will be exactly the same as the input.
    pub fn new<S: AsRef<str> + ?Sized>(arg: &'a S) -> ShellQuoted<'a> {
        ShellQuoted { arg: arg.as_ref() }
    }
}
