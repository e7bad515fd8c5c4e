//! Asking the operator for a missing caption.

use std::io::{self, BufRead, Write};
use thiserror::Error;

/// Supplies caption text for an image which has none. Implementations may
/// block.
pub trait Prompt {
    fn caption(&mut self, file_name: &str) -> Result<String>;
}

/// A [`Prompt`] which writes a question to `output` and reads one line of
/// answer from `input`. The binary uses stdin and stderr.
pub struct LinePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        LinePrompt { input, output }
    }
}

impl LinePrompt<io::StdinLock<'static>, io::Stderr> {
    pub fn stdio() -> Self {
        LinePrompt::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> Prompt for LinePrompt<R, W> {
    /// Returns the line without its line terminator. An empty line is a valid
    /// (empty) caption; end of input is an error.
    fn caption(&mut self, file_name: &str) -> Result<String> {
        write!(self.output, "Caption for {}: ", file_name)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Error::EndOfInput);
        }
        let trimmed = line.trim_end_matches(&['\n', '\r'][..]).len();
        line.truncate(trimmed);
        Ok(line)
    }
}

/// The result of a prompt.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a failure to get an answer from the operator.
#[derive(Debug, Error)]
pub enum Error {
    /// Returned when input closes before a line is read.
    #[error("no caption entered (end of input)")]
    EndOfInput,

    /// Returned for I/O errors on the prompt streams.
    #[error("prompting for caption: {0}")]
    Io(#[from] io::Error),
}
