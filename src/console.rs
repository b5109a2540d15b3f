use std::io::{self, BufRead, Write};

use finch_core::{PromptError, Prompter};

/// Line-based terminal front end
pub struct Console<R, W> {
    input: R,
    output: W,
}

/// The console the menus are written against
pub type Terminal<'io> = Console<Box<dyn BufRead + 'io>, Box<dyn Write + 'io>>;

impl Terminal<'static> {
    pub fn stdio() -> Self {
        Console::new(Box::new(io::stdin().lock()), Box::new(io::stdout()))
    }
}

#[cfg(test)]
impl<'io> Terminal<'io> {
    /// Console reading `input` and writing into `output`
    pub fn scripted(input: &'io str, output: &'io mut Vec<u8>) -> Self {
        let input: Box<dyn BufRead + 'io> = Box::new(input.as_bytes());
        let output: Box<dyn Write + 'io> = Box::new(output);

        Console::new(input, output)
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print one line. Terminal write failures are not worth aborting over.
    pub fn line(&mut self, text: impl AsRef<str>) {
        let _ = writeln!(self.output, "\t{}", text.as_ref());
    }

    pub fn blank(&mut self) {
        let _ = writeln!(self.output);
    }

    pub fn clear(&mut self) {
        let _ = write!(self.output, "\x1B[2J\x1B[1;1H");
        let _ = self.output.flush();
    }

    pub fn header(&mut self, title: &str) {
        self.clear();
        self.blank();
        let _ = writeln!(self.output, "\t\t{title}");
        self.blank();
    }

    pub fn pause(&mut self) -> Result<(), PromptError> {
        self.blank();
        self.ask("Press enter to continue.").map(drop)
    }

    pub fn pause_for_menu(&mut self, menu: &str) -> Result<(), PromptError> {
        self.blank();
        self.ask(&format!("Press enter to return to the {menu}."))
            .map(drop)
    }

    /// Ask for a menu letter, lowercased
    pub fn choice(&mut self) -> Result<String, PromptError> {
        self.ask("\tEnter Choice:")
            .map(|choice| choice.trim().to_lowercase())
    }
}

impl<R: BufRead, W: Write> Prompter for Console<R, W> {
    fn ask(&mut self, prompt: &str) -> Result<String, PromptError> {
        write!(self.output, "\t{prompt} ")?;
        self.output.flush()?;

        let mut line = String::new();

        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::Closed);
        }

        Ok(line.trim_end_matches(['\r', '\n']).to_owned())
    }

    fn tell(&mut self, message: &str) {
        self.line(message);
    }
}
