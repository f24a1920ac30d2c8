//! Command lines: a name followed by typed arguments.
//!
//! A command line is split on spaces. The first token is the command name;
//! the rest are arguments, each classified as it is read:
//!
//! | Token             | Argument                 |
//! |-------------------|--------------------------|
//! | `42`, `-3`        | [`Arg::Integer`]         |
//! | `1.5`, `-2e3`     | [`Arg::Decimal`]         |
//! | `"two words"`     | [`Arg::Str`] (unescaped) |
//! | anything else     | [`Arg::Str`] (verbatim)  |
//!
//! Quoted strings understand `\"`, `\\`, `\n` and `\t`. A quoted token is
//! always a string, even when it looks like a number.
//!
//! Parsing knows nothing about buffers. Handlers pull typed values out with
//! [`Command::usize_arg`], [`Command::int_arg`] and [`Command::str_arg`],
//! which report missing or mistyped arguments by position.

use std::fmt;

use thiserror::Error;

/// Longest accepted command name, in bytes.
pub const MAX_NAME_LEN: usize = 32;

// ---------------------------------------------------------------------------
// Arg
// ---------------------------------------------------------------------------

/// A single typed argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Integer(i64),
    Decimal(f64),
    Str(String),
}

impl Arg {
    /// What kind of argument this is, for error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Decimal(_) => "decimal",
            Self::Str(_) => "string",
        }
    }

    /// Classify a bare (unquoted) token.
    fn classify(token: &str) -> Self {
        if let Ok(n) = token.parse::<i64>() {
            return Self::Integer(n);
        }
        // `f64::from_str` also takes "inf" and "nan"; only numerals count here.
        let numeric = token.bytes().any(|b| b.is_ascii_digit())
            && token
                .bytes()
                .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
        if numeric {
            if let Ok(x) = token.parse::<f64>() {
                return Self::Decimal(x);
            }
        }
        Self::Str(token.to_owned())
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Decimal(x) => write!(f, "{x}"),
            Self::Str(s) => write!(f, "{s:?}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A command line that could not be parsed, or an argument a handler
/// could not use.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("command name is {len} bytes, the limit is {MAX_NAME_LEN}")]
    NameTooLong { len: usize },

    #[error("command name cannot be quoted")]
    QuotedName,

    #[error("unterminated string starting at byte {start}")]
    UnterminatedQuote { start: usize },

    #[error("unknown escape \\{0} in string")]
    BadEscape(char),

    #[error("unexpected {0:?} after closing quote")]
    TrailingAfterQuote(char),

    #[error("{command}: missing argument {index}")]
    MissingArgument { command: String, index: usize },

    #[error("{command}: argument {index} should be {expected}, got {found}")]
    WrongType {
        command: String,
        index: usize,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{command}: argument {index} cannot be negative ({value})")]
    Negative {
        command: String,
        index: usize,
        value: i64,
    },

    #[error("unknown command: {0}")]
    Unknown(String),
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// A parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    name: String,
    args: Vec<Arg>,
}

impl Command {
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// Argument `index` (0-based, not counting the name), if present.
    #[inline]
    #[must_use]
    pub fn arg(&self, index: usize) -> Option<&Arg> {
        self.args.get(index)
    }

    /// Argument `index` as an integer.
    ///
    /// # Errors
    ///
    /// Missing, or not an [`Arg::Integer`].
    pub fn int_arg(&self, index: usize) -> Result<i64, CommandError> {
        match self.require(index)? {
            Arg::Integer(n) => Ok(*n),
            other => Err(self.wrong_type(index, "integer", other)),
        }
    }

    /// Argument `index` as a non-negative index or count.
    ///
    /// # Errors
    ///
    /// Missing, not an integer, or negative.
    pub fn usize_arg(&self, index: usize) -> Result<usize, CommandError> {
        let value = self.int_arg(index)?;
        usize::try_from(value).map_err(|_| CommandError::Negative {
            command: self.name.clone(),
            index,
            value,
        })
    }

    /// Argument `index` as a string.
    ///
    /// # Errors
    ///
    /// Missing, or not an [`Arg::Str`].
    pub fn str_arg(&self, index: usize) -> Result<&str, CommandError> {
        match self.require(index)? {
            Arg::Str(s) => Ok(s),
            other => Err(self.wrong_type(index, "string", other)),
        }
    }

    fn require(&self, index: usize) -> Result<&Arg, CommandError> {
        self.args.get(index).ok_or_else(|| CommandError::MissingArgument {
            command: self.name.clone(),
            index,
        })
    }

    fn wrong_type(&self, index: usize, expected: &'static str, found: &Arg) -> CommandError {
        CommandError::WrongType {
            command: self.name.clone(),
            index,
            expected,
            found: found.kind(),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// One token before classification.
enum Token {
    Bare(String),
    Quoted(String),
}

/// Parse a command line.
///
/// # Errors
///
/// An empty line, a quoted or over-long name, or a malformed string.
pub fn parse(line: &str) -> Result<Command, CommandError> {
    let mut tokens = tokenize(line)?.into_iter();

    let name = match tokens.next() {
        None => return Err(CommandError::Empty),
        Some(Token::Quoted(_)) => return Err(CommandError::QuotedName),
        Some(Token::Bare(name)) => name,
    };
    if name.len() > MAX_NAME_LEN {
        return Err(CommandError::NameTooLong { len: name.len() });
    }

    let args = tokens
        .map(|token| match token {
            Token::Bare(text) => Arg::classify(&text),
            Token::Quoted(text) => Arg::Str(text),
        })
        .collect();

    Ok(Command { name, args })
}

fn tokenize(line: &str) -> Result<Vec<Token>, CommandError> {
    let mut tokens = Vec::new();
    let mut chars = line.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c == '"' {
            chars.next();
            let mut text = String::new();
            let mut closed = false;
            while let Some((_, c)) = chars.next() {
                match c {
                    '"' => {
                        closed = true;
                        break;
                    }
                    '\\' => match chars.next() {
                        Some((_, '"')) => text.push('"'),
                        Some((_, '\\')) => text.push('\\'),
                        Some((_, 'n')) => text.push('\n'),
                        Some((_, 't')) => text.push('\t'),
                        Some((_, other)) => return Err(CommandError::BadEscape(other)),
                        None => break,
                    },
                    _ => text.push(c),
                }
            }
            if !closed {
                return Err(CommandError::UnterminatedQuote { start });
            }
            if let Some(&(_, next)) = chars.peek() {
                if !next.is_whitespace() {
                    return Err(CommandError::TrailingAfterQuote(next));
                }
            }
            tokens.push(Token::Quoted(text));
            continue;
        }

        let mut text = String::new();
        while let Some(&(_, c)) = chars.peek() {
            if c.is_whitespace() {
                break;
            }
            text.push(c);
            chars.next();
        }
        tokens.push(Token::Bare(text));
    }

    Ok(tokens)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
