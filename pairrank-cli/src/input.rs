/// Item acquisition: `--file`, positional arguments, or line-by-line capture.
///
/// Whatever the source, items come out trimmed and non-empty, in input order.
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read file {}: {source}", path.display())]
    File { path: PathBuf, source: io::Error },
    #[error("read error: {0}")]
    Read(#[from] io::Error),
    #[error("no items provided; exiting")]
    NoItems,
}

/// Where items come from. `--file` wins over positional arguments; with
/// neither, items are captured interactively.
#[derive(Debug, Clone, Copy)]
pub enum ItemSource<'a> {
    File(&'a Path),
    Args(&'a [String]),
    Interactive,
}

impl<'a> ItemSource<'a> {
    pub fn select(file: Option<&'a Path>, args: &'a [String]) -> Self {
        match file {
            Some(path) => ItemSource::File(path),
            None if !args.is_empty() => ItemSource::Args(args),
            None => ItemSource::Interactive,
        }
    }
}

/// Newline-delimited items; blank lines ignored.
pub fn parse_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|l| l.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// One item per non-empty argument.
pub fn from_args(args: &[String]) -> Vec<String> {
    args.iter()
        .map(|a| a.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Prompt for items one per line until a blank line.
///
/// End of input before the blank line is a read failure.
pub fn capture<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<Vec<String>, InputError> {
    writeln!(output, "Enter items to sort, one per line. Submit an empty line when done:")?;
    let mut items = Vec::new();
    loop {
        write!(output, "> ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "end of input").into());
        }
        let line = line.trim();
        if line.is_empty() {
            return Ok(items);
        }
        items.push(line.to_string());
    }
}

/// Load items from `source`. The interactive path reads from `input`, which
/// the console oracle keeps reading from afterwards.
pub fn load_items<R: BufRead, W: Write>(
    source: ItemSource<'_>,
    input: &mut R,
    output: &mut W,
) -> Result<Vec<String>, InputError> {
    let items = match source {
        ItemSource::File(path) => {
            let content = std::fs::read_to_string(path).map_err(|source| InputError::File {
                path: path.to_path_buf(),
                source,
            })?;
            parse_lines(&content)
        }
        ItemSource::Args(args) => from_args(args),
        ItemSource::Interactive => capture(input, output)?,
    };

    if items.is_empty() {
        return Err(InputError::NoItems);
    }
    Ok(items)
}
