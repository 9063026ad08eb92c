//! Command-line splitting.
//!
//! The splitter is deliberately small: the input is split on single spaces
//! and runs of pieces that open with `'` or `"` are merged back together
//! until a piece ends with the same quote. There is no escape handling, no
//! tab splitting, and no shell metacharacter support.
//!
//! ```
//! use cmdkit::split::tokenize;
//!
//! let tokens = tokenize("run --flag 'a b c' --other").unwrap();
//! assert_eq!(tokens, ["run", "--flag", "a b c", "--other"]);
//! ```

use crate::error::{Error, Result};

/// A command line split into a program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// Executable name or path (token 0)
    pub program: String,
    /// Remaining tokens
    pub args: Vec<String>,
}

enum State {
    Bare,
    Quoted { delimiter: char, block: String },
}

fn opening_quote(piece: &str) -> Option<char> {
    match piece.chars().next() {
        Some(c @ ('\'' | '"')) => Some(c),
        _ => None,
    }
}

/// Split a raw command line into tokens.
///
/// Pieces outside a quoted span are emitted unchanged, including the empty
/// pieces produced by consecutive spaces. Inside a span, spaces are kept
/// exactly as written. A piece such as `'abc'` that opens and closes on its
/// own yields `abc`. A strict "close only on a later piece" rule would
/// instead leave the span open and swallow the following pieces.
///
/// Returns [`Error::UnterminatedQuote`] if a span is still open at the end
/// of the input.
pub fn tokenize(raw: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut state = State::Bare;

    for piece in raw.split(' ') {
        state = match state {
            State::Bare => match opening_quote(piece) {
                Some(delimiter) => {
                    // quote characters are ASCII, so slicing past one byte is safe
                    let rest = &piece[1..];
                    match rest.strip_suffix(delimiter) {
                        Some(inner) => {
                            tokens.push(inner.to_string());
                            State::Bare
                        }
                        None => State::Quoted {
                            delimiter,
                            block: format!("{rest} "),
                        },
                    }
                }
                None => {
                    tokens.push(piece.to_string());
                    State::Bare
                }
            },
            State::Quoted {
                delimiter,
                mut block,
            } => match piece.strip_suffix(delimiter) {
                Some(inner) => {
                    block.push_str(inner);
                    tokens.push(block);
                    State::Bare
                }
                None => {
                    block.push_str(piece);
                    block.push(' ');
                    State::Quoted { delimiter, block }
                }
            },
        };
    }

    if let State::Quoted { delimiter, block } = state {
        return Err(Error::UnterminatedQuote {
            delimiter,
            fragment: format!("{delimiter}{}", block.trim_end_matches(' ')),
        });
    }

    Ok(tokens)
}

/// Split a raw command line into a program and arguments.
pub fn parse(raw: &str) -> Result<CommandLine> {
    let mut tokens = tokenize(raw)?.into_iter();
    let program = tokens
        .next()
        .filter(|p| !p.is_empty())
        .ok_or(Error::EmptyCommand)?;

    Ok(CommandLine {
        program,
        args: tokens.collect(),
    })
}
