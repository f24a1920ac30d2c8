// SPDX-License-Identifier: MIT
//
// ted: a headless driver for the ted editing core.
//
// Loads at most one file into a shared buffer, binds a view to it, then runs
// command lines from `-c` flags and `--script` files in order:
//
//   command line → command::parse → Editor::execute → Buffer edit
//                                                   → View::follow_cursor
//
// Keys typed with `type "..."` go through Editor::handle_key, the same entry
// point macro playback uses, so a macro can only do what typing can.
//
// Messages (query results, `print`) go to stdout. Diagnostics go to stderr
// through tracing, filtered by TED_LOG (default `warn`).

use std::cell::RefCell;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::rc::Rc;

use clap::Parser;
use thiserror::Error;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use ted_core::buffer::{Buffer, EditError, FileType, LoadOutcome, Status};
use ted_core::command::{self, Arg, Command, CommandError};
use ted_core::macros::{MacroError, MacroRegisters};
use ted_core::options::{OptionError, Options};
use ted_core::position::{Delta, Point};
use ted_core::rune::Rune;
use ted_core::view::{Rect, View};

/// Viewport used until a `view` command says otherwise.
const DEFAULT_VIEWPORT: Rect = Rect::sized(80, 24);

/// Delete the rune before the cursor.
const DEL: Rune = Rune(0x7f);
const BACKSPACE: Rune = Rune(0x08);

// ─── Arguments ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "ted")]
#[command(about = "Run editing commands against a text file", long_about = None)]
#[command(version)]
struct Args {
    /// File to edit. Created on `write` if it does not exist.
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Command to run. May be given more than once.
    #[arg(short = 'c', long = "command", value_name = "CMD")]
    commands: Vec<String>,

    /// File of commands, one per line, run after any -c commands.
    #[arg(long, value_name = "PATH")]
    script: Option<PathBuf>,

    /// Print the buffer to stdout when done.
    #[arg(long)]
    print: bool,

    /// Initial tabstop.
    #[arg(long, value_name = "N")]
    tabstop: Option<usize>,

    /// Initial scrolloff.
    #[arg(long, value_name = "N")]
    scrolloff: Option<usize>,

    /// Stop at the first failing command.
    #[arg(long)]
    strict: bool,
}

// ─── Errors ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
enum EditorError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Option(#[from] OptionError),

    #[error(transparent)]
    Macro(#[from] MacroError),

    #[error("{}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("{}: cannot read file", .0.display())]
    Unreadable(PathBuf),

    #[error("no file name")]
    NoFileName,

    #[error("register name must be a single character, got {0:?}")]
    RegisterName(String),

    #[error("line {line}: {source}")]
    Script {
        line: usize,
        source: Box<EditorError>,
    },

    #[error("cannot write output: {0}")]
    Output(#[source] io::Error),
}

// ─── Editor ─────────────────────────────────────────────────────────────────

/// The editor state: one shared buffer, one view onto it, options and
/// macro registers.
struct Editor {
    buffer: Rc<RefCell<Buffer>>,
    view: View,
    options: Options,
    macros: MacroRegisters,

    /// Where `write` with no argument saves. `None` for a scratch buffer.
    path: Option<PathBuf>,
}

impl Editor {
    /// An editor on a single empty scratch line.
    fn scratch(options: Options) -> Self {
        Self::with_buffer(Buffer::from_text(""), None, options)
    }

    /// An editor on `path`. A missing file becomes a new, empty buffer.
    fn open(path: &Path, options: Options) -> Result<Self, EditorError> {
        let mut buffer = Buffer::new();
        match buffer.load_file(path) {
            LoadOutcome::Loaded => {
                info!(path = %path.display(), lines = buffer.line_count(), "opened file");
            }
            LoadOutcome::Missing => {
                buffer.allocate(1, &path.to_string_lossy())?;
                buffer.set_status(Status::NewFile);
                buffer.set_file_type(FileType::from_path(path));
                info!(path = %path.display(), "new file");
            }
            LoadOutcome::Unreadable => return Err(EditorError::Unreadable(path.to_path_buf())),
        }
        Ok(Self::with_buffer(buffer, Some(path.to_path_buf()), options))
    }

    fn with_buffer(buffer: Buffer, path: Option<PathBuf>, options: Options) -> Self {
        let buffer = Rc::new(RefCell::new(buffer));
        let mut view = View::new();
        view.set_rect(DEFAULT_VIEWPORT);
        view.bind(&buffer);
        Self {
            buffer,
            view,
            options,
            macros: MacroRegisters::new(),
            path,
        }
    }

    fn cursor(&self) -> Point {
        self.buffer.borrow().cursor()
    }

    fn set_cursor(&self, point: Point) {
        self.buffer.borrow_mut().set_cursor(point);
    }

    /// The buffer text, one line per entry.
    fn lines(&self) -> Vec<String> {
        self.buffer.borrow().lines().to_vec()
    }

    fn follow_cursor(&mut self) {
        self.view.follow_cursor(
            self.options.sidescrolloff,
            self.options.scrolloff,
            self.options.tabstop,
        );
    }

    // -- Keys ---------------------------------------------------------------

    /// Handle one typed rune, recording it if a macro is being recorded.
    ///
    /// Printable runes and tabs insert at the cursor, `\n` splits the line,
    /// DEL and BS delete the rune before the cursor (joining lines at
    /// column 0). Other control runes are ignored.
    fn handle_key(&mut self, rune: Rune) -> Result<(), EditorError> {
        self.macros.record(rune);

        let cursor = self.cursor();
        let mut buffer = self.buffer.borrow_mut();

        if rune == Rune::NEWLINE {
            buffer.insert_string(cursor, "\n")?;
            buffer.set_cursor(Point::new(0, cursor.y + 1));
        } else if rune == DEL || rune == BACKSPACE {
            if cursor.x > 0 {
                buffer.remove_string(Point::new(cursor.x - 1, cursor.y), 1, false)?;
                buffer.set_cursor(Point::new(cursor.x - 1, cursor.y));
            } else if cursor.y > 0 {
                let prev_len = buffer.line_length(cursor.y - 1).unwrap_or(0);
                let join = Point::new(prev_len, cursor.y - 1);
                buffer.remove_string(join, 1, false)?;
                buffer.set_cursor(join);
            }
        } else {
            match rune.to_char() {
                Some(c) if c == '\t' || !c.is_control() => {
                    let mut utf8 = [0; 4];
                    buffer.insert_string(cursor, c.encode_utf8(&mut utf8))?;
                    buffer.set_cursor(Point::new(cursor.x + 1, cursor.y));
                }
                _ => debug!(?rune, "ignoring key"),
            }
        }
        Ok(())
    }

    // -- Commands -----------------------------------------------------------

    /// Parse and run one command line, then follow the cursor.
    ///
    /// Returns a message for the user, if the command produced one.
    fn execute(&mut self, line: &str) -> Result<Option<String>, EditorError> {
        let cmd = command::parse(line)?;
        debug!(%cmd, "execute");
        let result = self.run_command(&cmd);
        self.follow_cursor();
        result
    }

    fn run_command(&mut self, cmd: &Command) -> Result<Option<String>, EditorError> {
        match cmd.name() {
            "insert" => {
                let at = Point::new(cmd.usize_arg(0)?, cmd.usize_arg(1)?);
                self.buffer.borrow_mut().insert_string(at, cmd.str_arg(2)?)?;
            }
            "remove" => {
                let at = Point::new(cmd.usize_arg(0)?, cmd.usize_arg(1)?);
                let length = cmd.usize_arg(2)?;
                let keep_empty = match cmd.arg(3) {
                    None => false,
                    Some(Arg::Str(flag)) if flag == "keepempty" => true,
                    Some(_) => {
                        return Err(CommandError::WrongType {
                            command: cmd.name().to_owned(),
                            index: 3,
                            expected: "keepempty",
                            found: "other",
                        }
                        .into());
                    }
                };
                self.buffer
                    .borrow_mut()
                    .remove_string(at, length, !keep_empty)?;
            }
            "delete-lines" => {
                let (first, last) = (cmd.usize_arg(0)?, cmd.usize_arg(1)?);
                self.buffer.borrow_mut().remove_lines(first, last)?;
            }
            "empty" => self.buffer.borrow_mut().empty()?,
            "goto" => self.set_cursor(Point::new(cmd.usize_arg(0)?, cmd.usize_arg(1)?)),
            "move" => {
                let delta = Delta::new(
                    saturating_isize(cmd.int_arg(0)?),
                    saturating_isize(cmd.int_arg(1)?),
                );
                let buffer = self.buffer.borrow();
                let from = buffer.cursor();
                // Typing and goto can leave the cursor one past the last
                // rune even without pastend. Move from there as if pastend
                // were on, then pull the result back onto a rune.
                let at_end = buffer.line_length(from.y) == Some(from.x);
                let mut target = buffer.move_point(
                    from,
                    delta,
                    self.options.tabstop,
                    self.options.pastend || at_end,
                );
                if !self.options.pastend {
                    let len = buffer.line_length(target.y).unwrap_or(0);
                    target.x = target.x.min(len.saturating_sub(1));
                }
                drop(buffer);
                self.set_cursor(target);
            }
            "type" => {
                for c in cmd.str_arg(0)?.chars() {
                    self.handle_key(Rune::from(c))?;
                }
            }
            "record" => {
                let name = register_name(cmd.str_arg(0)?)?;
                self.macros.start(name)?;
                return Ok(Some(format!("recording @{name}")));
            }
            "stop" => {
                let name = self.macros.stop()?;
                let count = self.macros.get(name)?.len();
                return Ok(Some(format!("recorded {count} keys into @{name}")));
            }
            "play" => {
                let name = register_name(cmd.str_arg(0)?)?;
                let keys = self.macros.get(name)?.to_vec();
                for rune in keys {
                    self.handle_key(rune)?;
                }
            }
            "set" => {
                let messages = self.options.set(&raw_args(cmd))?;
                if !messages.is_empty() {
                    return Ok(Some(messages.join("\n")));
                }
            }
            "view" => {
                self.view
                    .set_rect(Rect::sized(cmd.usize_arg(0)?, cmd.usize_arg(1)?));
            }
            "write" => return self.write(cmd.arg(0)).map(Some),
            "print" => return Ok(Some(self.buffer.borrow().contents())),
            other => return Err(CommandError::Unknown(other.to_owned()).into()),
        }
        Ok(None)
    }

    /// `write [path]`: save to `path`, or to the file being edited.
    fn write(&mut self, target: Option<&Arg>) -> Result<String, EditorError> {
        let path = match target {
            Some(Arg::Str(p)) => PathBuf::from(p),
            Some(other) => PathBuf::from(other.to_string()),
            None => self.path.clone().ok_or(EditorError::NoFileName)?,
        };

        let mut buffer = self.buffer.borrow_mut();
        buffer
            .save_file(&path)
            .map_err(|source| EditorError::Io {
                path: path.clone(),
                source,
            })?;

        if self.path.is_none() {
            buffer.set_name(&path.to_string_lossy());
            buffer.set_file_type(FileType::from_path(&path));
            self.path = Some(path.clone());
        }
        let lines = buffer.line_count();
        info!(path = %path.display(), lines, "written");
        Ok(format!("\"{}\" {lines}L written", path.display()))
    }
}

/// Command arguments as typed, for layers that do their own parsing.
fn raw_args(cmd: &Command) -> String {
    cmd.args()
        .iter()
        .map(|arg| match arg {
            Arg::Str(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn register_name(arg: &str) -> Result<char, EditorError> {
    let mut chars = arg.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(EditorError::RegisterName(arg.to_owned())),
    }
}

fn saturating_isize(n: i64) -> isize {
    isize::try_from(n).unwrap_or(if n < 0 { isize::MIN } else { isize::MAX })
}

// ─── Driver ─────────────────────────────────────────────────────────────────

/// Run command lines in order, collecting messages.
///
/// Blank lines and `#` comments are skipped. A failing command is logged
/// and skipped, unless `strict` is set, in which case it ends the run.
fn run_lines<'a>(
    editor: &mut Editor,
    lines: impl IntoIterator<Item = &'a str>,
    strict: bool,
) -> Result<Vec<String>, EditorError> {
    let mut messages = Vec::new();
    for (i, line) in lines.into_iter().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match editor.execute(line) {
            Ok(Some(msg)) => messages.push(msg),
            Ok(None) => {}
            Err(err) if strict => {
                return Err(EditorError::Script {
                    line: i + 1,
                    source: Box::new(err),
                });
            }
            Err(err) => {
                warn!(line = i + 1, error = %err, "command failed");
                messages.push(format!("error: line {}: {err}", i + 1));
            }
        }
    }
    Ok(messages)
}

fn options_from(args: &Args) -> Result<Options, EditorError> {
    let mut options = Options::default();
    if let Some(ts) = args.tabstop {
        options.set(&format!("tabstop={ts}"))?;
    }
    if let Some(so) = args.scrolloff {
        options.set(&format!("scrolloff={so}"))?;
    }
    Ok(options)
}

fn run(args: &Args) -> Result<(), EditorError> {
    let options = options_from(args)?;
    let mut editor = match &args.file {
        Some(path) => Editor::open(path, options)?,
        None => Editor::scratch(options),
    };

    let mut lines = args.commands.clone();
    if let Some(script) = &args.script {
        let text = fs::read_to_string(script).map_err(|source| EditorError::Io {
            path: script.clone(),
            source,
        })?;
        lines.extend(text.lines().map(str::to_owned));
    }

    let messages = run_lines(&mut editor, lines.iter().map(String::as_str), args.strict)?;

    let mut out = io::stdout().lock();
    for msg in &messages {
        writeln!(out, "{msg}").map_err(EditorError::Output)?;
    }
    if args.print {
        for line in editor.lines() {
            writeln!(out, "{line}").map_err(EditorError::Output)?;
        }
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TED_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() {
    let args = Args::parse();
    init_tracing();

    if let Err(e) = run(&args) {
        eprintln!("ted: {e}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
