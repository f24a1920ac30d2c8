//! Editor options: the `:set` system.
//!
//! Parses `:set` directives and applies them to an [`Options`] value that
//! the editor reads before every cursor follow and vertical move.
//!
//! # Supported syntax
//!
//! | Syntax           | Effect                        |
//! |------------------|-------------------------------|
//! | `set option`     | Enable boolean / show numeric |
//! | `set nooption`   | Disable boolean               |
//! | `set option!`    | Toggle boolean                |
//! | `set option?`    | Query current value           |
//! | `set option=N`   | Assign numeric value          |
//! | `set`            | Show changed options          |
//! | `set all`        | Show all options              |
//!
//! # Options
//!
//! | Full name       | Abbrev | Type    | Default |
//! |-----------------|--------|---------|---------|
//! | `tabstop`       | `ts`   | integer | 8       |
//! | `scrolloff`     | `so`   | integer | 3       |
//! | `sidescrolloff` | `siso` | integer | 2       |
//! | `pastend`       | `pe`   | bool    | false   |
//!
//! `pastend` lets the cursor rest one past the last rune of a line, the
//! way insert mode does.

use thiserror::Error;

/// A parsed `:set` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetDirective {
    /// `set option`: enable a boolean option.
    On(String),

    /// `set nooption`: disable a boolean option.
    Off(String),

    /// `set option!`: toggle a boolean option.
    Toggle(String),

    /// `set option?`: query the current value.
    Query(String),

    /// `set option=value`: assign a value.
    Assign(String, String),

    /// `set` with no arguments: show changed options.
    ShowChanged,

    /// `set all`: show all options.
    ShowAll,
}

/// Why a directive could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    #[error("unknown option: {0}")]
    Unknown(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("number required after =: {name}={value}")]
    NotANumber { name: String, value: String },

    #[error("argument must be positive: tabstop={0}")]
    ZeroTabstop(usize),
}

// ---------------------------------------------------------------------------
// Names
// ---------------------------------------------------------------------------

/// Full name for a known option or its abbreviation.
#[must_use]
pub fn canonical_name(name: &str) -> Option<&'static str> {
    match name {
        "tabstop" | "ts" => Some("tabstop"),
        "scrolloff" | "so" => Some("scrolloff"),
        "sidescrolloff" | "siso" => Some("sidescrolloff"),
        "pastend" | "pe" => Some("pastend"),
        _ => None,
    }
}

/// Returns `true` if `name` is a known boolean option (full name or abbreviation).
#[must_use]
pub fn is_bool_option(name: &str) -> bool {
    matches!(name, "pastend" | "pe")
}

/// Returns `true` if `name` is a known numeric option (full name or abbreviation).
#[must_use]
pub fn is_numeric_option(name: &str) -> bool {
    matches!(
        name,
        "tabstop" | "ts" | "scrolloff" | "so" | "sidescrolloff" | "siso"
    )
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse the full `set` arguments string into directives.
///
/// An empty argument string produces [`SetDirective::ShowChanged`].
#[must_use]
pub fn parse_set(args: &str) -> Vec<SetDirective> {
    let trimmed = args.trim();
    if trimmed.is_empty() {
        return vec![SetDirective::ShowChanged];
    }
    trimmed.split_whitespace().map(parse_set_arg).collect()
}

/// Parse a single `set` argument into a directive.
#[must_use]
pub fn parse_set_arg(arg: &str) -> SetDirective {
    if arg == "all" {
        return SetDirective::ShowAll;
    }
    if let Some((name, value)) = arg.split_once('=') {
        return SetDirective::Assign(name.to_owned(), value.to_owned());
    }
    if let Some(name) = arg.strip_suffix('?') {
        return SetDirective::Query(name.to_owned());
    }
    if let Some(name) = arg.strip_suffix('!') {
        return SetDirective::Toggle(name.to_owned());
    }
    // Only strip "no" when what remains is a boolean option.
    if let Some(name) = arg.strip_prefix("no") {
        if is_bool_option(name) {
            return SetDirective::Off(name.to_owned());
        }
    }
    if is_numeric_option(arg) {
        return SetDirective::Query(arg.to_owned());
    }
    SetDirective::On(arg.to_owned())
}

/// `"name"` when true, `"noname"` when false.
#[must_use]
pub fn format_bool(name: &str, value: bool) -> String {
    if value {
        name.to_owned()
    } else {
        format!("no{name}")
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Current option values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Visible columns per tab. Never zero.
    pub tabstop: usize,
    /// Lines kept between the cursor and the top/bottom edge.
    pub scrolloff: usize,
    /// Columns kept between the cursor and the left/right edge.
    pub sidescrolloff: usize,
    /// Cursor may rest one past the last rune.
    pub pastend: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Options {
    pub const DEFAULT: Self = Self {
        tabstop: 8,
        scrolloff: 3,
        sidescrolloff: 2,
        pastend: false,
    };

    /// Apply every directive in a `set` argument string.
    ///
    /// Returns the messages produced by queries, in order. Stops at the
    /// first directive that fails; earlier ones stay applied.
    ///
    /// # Errors
    ///
    /// The first [`OptionError`] encountered.
    pub fn set(&mut self, args: &str) -> Result<Vec<String>, OptionError> {
        let mut messages = Vec::new();
        for directive in parse_set(args) {
            if let Some(msg) = self.apply(&directive)? {
                messages.push(msg);
            }
        }
        Ok(messages)
    }

    /// Apply one directive. Queries return `Some(message)`.
    ///
    /// # Errors
    ///
    /// Unknown names, a boolean used as a number (or the reverse), values
    /// that are not numbers, and `tabstop=0`.
    pub fn apply(&mut self, directive: &SetDirective) -> Result<Option<String>, OptionError> {
        match directive {
            SetDirective::On(name) => self.set_bool(name, true).map(|()| None),
            SetDirective::Off(name) => self.set_bool(name, false).map(|()| None),
            SetDirective::Toggle(name) => {
                let current = self.bool_value(name)?;
                self.set_bool(name, !current).map(|()| None)
            }
            SetDirective::Query(name) => self.describe(name).map(Some),
            SetDirective::Assign(name, value) => {
                self.assign(name, value).map(|()| None)
            }
            SetDirective::ShowChanged => Ok(Some(self.show(true))),
            SetDirective::ShowAll => Ok(Some(self.show(false))),
        }
    }

    fn bool_value(&self, name: &str) -> Result<bool, OptionError> {
        match canonical_name(name) {
            Some("pastend") => Ok(self.pastend),
            Some(_) => Err(OptionError::InvalidArgument(format!("{name}!"))),
            None => Err(OptionError::Unknown(name.to_owned())),
        }
    }

    fn set_bool(&mut self, name: &str, value: bool) -> Result<(), OptionError> {
        match canonical_name(name) {
            Some("pastend") => {
                self.pastend = value;
                Ok(())
            }
            Some(_) => Err(OptionError::InvalidArgument(format_bool(name, value))),
            None => Err(OptionError::Unknown(name.to_owned())),
        }
    }

    fn assign(&mut self, name: &str, value: &str) -> Result<(), OptionError> {
        let Some(full) = canonical_name(name) else {
            return Err(OptionError::Unknown(name.to_owned()));
        };
        if full == "pastend" {
            return Err(OptionError::InvalidArgument(format!("{name}={value}")));
        }
        let n: usize = value.parse().map_err(|_| OptionError::NotANumber {
            name: name.to_owned(),
            value: value.to_owned(),
        })?;
        match full {
            "tabstop" if n == 0 => return Err(OptionError::ZeroTabstop(n)),
            "tabstop" => self.tabstop = n,
            "scrolloff" => self.scrolloff = n,
            _ => self.sidescrolloff = n,
        }
        Ok(())
    }

    fn describe(&self, name: &str) -> Result<String, OptionError> {
        match canonical_name(name) {
            Some("tabstop") => Ok(format!("tabstop={}", self.tabstop)),
            Some("scrolloff") => Ok(format!("scrolloff={}", self.scrolloff)),
            Some("sidescrolloff") => Ok(format!("sidescrolloff={}", self.sidescrolloff)),
            Some(_) => Ok(format_bool("pastend", self.pastend)),
            None => Err(OptionError::Unknown(name.to_owned())),
        }
    }

    /// Space-separated listing. `changed_only` skips default values.
    fn show(&self, changed_only: bool) -> String {
        let d = Self::DEFAULT;
        let entries = [
            (self.pastend != d.pastend, format_bool("pastend", self.pastend)),
            (self.scrolloff != d.scrolloff, format!("scrolloff={}", self.scrolloff)),
            (
                self.sidescrolloff != d.sidescrolloff,
                format!("sidescrolloff={}", self.sidescrolloff),
            ),
            (self.tabstop != d.tabstop, format!("tabstop={}", self.tabstop)),
        ];
        entries
            .into_iter()
            .filter(|(changed, _)| !changed_only || *changed)
            .map(|(_, text)| text)
            .collect::<Vec<_>>()
            .join("  ")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
