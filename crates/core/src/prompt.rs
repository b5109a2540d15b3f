//! Input seam for the interactive loops
//!
//! Authoring and validation block on the user. They do so through
//! [`Prompter`], which hands back one line at a time and resumes the loop
//! only when the line arrives.

use std::{
    fmt::{self, Display},
    io,
};

#[derive(Debug)]
pub enum PromptError {
    /// The input source ended before a valid answer was given
    Closed,
    Io(io::Error),
}

impl Display for PromptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptError::Closed => write!(f, "input closed"),
            PromptError::Io(error) => write!(f, "failed to read input: {error}"),
        }
    }
}

impl std::error::Error for PromptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PromptError::Closed => None,
            PromptError::Io(error) => Some(error),
        }
    }
}

impl From<io::Error> for PromptError {
    fn from(error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::UnexpectedEof => PromptError::Closed,
            _ => PromptError::Io(error),
        }
    }
}

/// Line-oriented source of user input
pub trait Prompter {
    /// Show `prompt` and return the next line of input, without its line ending
    fn ask(&mut self, prompt: &str) -> Result<String, PromptError>;

    /// Show a corrective or informational message
    fn tell(&mut self, message: &str);
}

impl<P: Prompter + ?Sized> Prompter for &mut P {
    fn ask(&mut self, prompt: &str) -> Result<String, PromptError> {
        (**self).ask(prompt)
    }

    fn tell(&mut self, message: &str) {
        (**self).tell(message)
    }
}
