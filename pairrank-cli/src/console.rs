/// Blocking console oracle.
///
/// Shows the two items as `1)` / `2)` and reads one line per attempt from the
/// shared input stream until it gets something it understands.
use std::io::{self, BufRead, Write};

use pairrank_core::{DecisionOracle, OracleError};
use tracing::debug;

/// A recognised line of console input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    PreferA,
    PreferB,
    Quit,
}

/// Trimmed, case-insensitive. `None` means "ask again".
pub fn parse_answer(line: &str) -> Option<Answer> {
    match line.trim().to_lowercase().as_str() {
        "1" | "a" => Some(Answer::PreferA),
        "2" | "b" => Some(Answer::PreferB),
        "q" | "quit" | "exit" => Some(Answer::Quit),
        _ => None,
    }
}

pub struct ConsoleOracle<R, W> {
    input: R,
    output: W,
    asked: usize,
}

impl<R: BufRead, W: Write> ConsoleOracle<R, W> {
    pub fn new(input: R, output: W) -> Self {
        ConsoleOracle { input, output, asked: 0 }
    }

    fn show_pair(&mut self, a: &str, b: &str) -> io::Result<()> {
        writeln!(self.output, "Which do you prefer?")?;
        writeln!(self.output, "  1) {a}")?;
        writeln!(self.output, "  2) {b}")?;
        write!(self.output, "Enter 1 or 2 (or q to quit): ")?;
        self.output.flush()
    }

    fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "end of input"));
        }
        Ok(line)
    }
}

impl<R: BufRead, W: Write> DecisionOracle for ConsoleOracle<R, W> {
    fn prefer(&mut self, a: &str, b: &str) -> Result<bool, OracleError> {
        self.asked += 1;
        loop {
            self.show_pair(a, b).map_err(OracleError::failed)?;
            let line = self.read_line().map_err(OracleError::failed)?;
            match parse_answer(&line) {
                Some(Answer::PreferA) => return Ok(true),
                Some(Answer::PreferB) => return Ok(false),
                Some(Answer::Quit) => {
                    debug!(asked = self.asked, "quit requested at console");
                    return Err(OracleError::Cancelled);
                }
                None => {
                    writeln!(self.output, "Invalid input; please enter 1 or 2 (or q to quit).")
                        .map_err(OracleError::failed)?;
                }
            }
        }
    }
}
