//! Line-oriented console I/O for the interactive menu.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

/// Prompts on `output` and reads answers line by line from `input`.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print one line.
    pub fn say(&mut self, text: impl AsRef<str>) -> Result<()> {
        writeln!(self.output, "{}", text.as_ref()).context("failed to write to console")
    }

    /// Print `prompt` and read one answer with surrounding whitespace trimmed.
    ///
    /// Bytes that are not valid UTF-8 are replaced rather than rejected, so
    /// a garbled line is just an unrecognized answer. Returns `None` once
    /// input is exhausted.
    pub fn read_input(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}").context("failed to write to console")?;
        self.output.flush().context("failed to flush console")?;

        let mut line = Vec::new();
        let n = self
            .input
            .read_until(b'\n', &mut line)
            .context("failed to read user input")?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&line).trim().to_string()))
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_trimmed_lines_then_none() {
        let mut console = Console::new(Cursor::new("  work \n\nlast"), Vec::new());
        assert_eq!(console.read_input("a: ").unwrap().as_deref(), Some("work"));
        assert_eq!(console.read_input("b: ").unwrap().as_deref(), Some(""));
        assert_eq!(console.read_input("c: ").unwrap().as_deref(), Some("last"));
        assert_eq!(console.read_input("d: ").unwrap(), None);

        let out = String::from_utf8(console.into_output()).unwrap();
        assert_eq!(out, "a: b: c: d: ");
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let mut console = Console::new(Cursor::new(&b"\xff\xfe\n 1 \n"[..]), Vec::new());
        assert_eq!(
            console.read_input("").unwrap().as_deref(),
            Some("\u{fffd}\u{fffd}")
        );
        assert_eq!(console.read_input("").unwrap().as_deref(), Some("1"));
        assert_eq!(console.read_input("").unwrap(), None);
    }

    #[test]
    fn say_appends_newline() {
        let mut console = Console::new(Cursor::new(""), Vec::new());
        console.say("hello").unwrap();
        console.say(format!("{}) {}", 1, "_work")).unwrap();
        assert_eq!(console.into_output(), b"hello\n1) _work\n");
    }
}
