//! Text buffer: the fundamental unit of text storage.
//!
//! A `Buffer` owns an ordered `Vec<String>` of lines plus the metadata the
//! rest of the editor reads: a name, a cursor, a [`Status`] tag and a
//! [`FileType`] tag.
//!
//! # Design choices
//!
//! - **One `String` per line, no terminators.** A line never contains `\n`.
//!   Structural edits split and join lines with `split_off`, `splice` and
//!   `drain` on the line vector.
//!
//! - **Columns are rune indices**, not byte offsets. Byte offsets are
//!   computed with [`rune::byte_offset`](crate::rune::byte_offset) right
//!   before a string is spliced and never leak into the public API.
//!
//! - **Failed edits do not mutate.** Every precondition is checked before
//!   the first write, so an `Err` leaves lines, status and cursor exactly as
//!   they were.
//!
//! - **At least one line.** Once loaded or allocated a buffer always holds
//!   one or more lines. Only [`free`](Buffer::free) returns it to the
//!   line-less zero state. [`remove_lines`](Buffer::remove_lines) refuses to
//!   delete every line; clearing the text is [`empty`](Buffer::empty)'s job.
//!
//! - **No undo/redo here.** History is not part of the core.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, warn};

use crate::geometry::{string_index_to_visible_index, visible_index_to_string_index};
use crate::position::{Delta, Point, Range};
use crate::rune::{RuneIndex, byte_offset, rune_length};

/// Name given to buffers that are not backed by a file.
pub const SCRATCH_NAME: &str = "[No Name]";

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Display tag read by the status line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Clean: matches what is on disk.
    #[default]
    None,
    /// Changed by a structural edit since the last load or save.
    Modified,
    /// Backing file is not writable.
    ReadOnly,
    /// Backing file does not exist yet.
    NewFile,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "",
            Self::Modified => "[+]",
            Self::ReadOnly => "[RO]",
            Self::NewFile => "[New]",
        })
    }
}

// ---------------------------------------------------------------------------
// FileType
// ---------------------------------------------------------------------------

/// Language category, set by whoever opens the buffer.
///
/// Edits never change it. [`FileType::Terminal`] marks buffers that back a
/// terminal pane and is never produced by extension sniffing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    #[default]
    Plain,
    C,
    Cpp,
    Python,
    Java,
    Shell,
    Config,
    Diff,
    Terminal,
}

impl FileType {
    /// Guess the type from a path's extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return Self::Plain;
        };
        match ext.to_ascii_lowercase().as_str() {
            "c" | "h" => Self::C,
            "cc" | "cpp" | "cxx" | "hh" | "hpp" | "hxx" => Self::Cpp,
            "py" => Self::Python,
            "java" => Self::Java,
            "sh" | "bash" | "zsh" => Self::Shell,
            "conf" | "cfg" | "ini" | "toml" | "yaml" | "yml" => Self::Config,
            "diff" | "patch" => Self::Diff,
            _ => Self::Plain,
        }
    }

    /// Short lowercase name for the status line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Plain => "text",
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::Python => "python",
            Self::Java => "java",
            Self::Shell => "sh",
            Self::Config => "conf",
            Self::Diff => "diff",
            Self::Terminal => "terminal",
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A precondition an edit operation refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("buffer has no lines")]
    NoLines,

    #[error("a buffer needs at least one line")]
    ZeroLines,

    #[error("point {0:?} is outside the buffer")]
    PointOutOfBounds(Point),

    #[error("line {line} is out of bounds ({count} lines)")]
    LineOutOfBounds { line: usize, count: usize },

    #[error("first line {first} comes after last line {last}")]
    InvertedLines { first: usize, last: usize },

    #[error("removing lines {first}..={last} would leave the buffer without lines")]
    WouldEmptyBuffer { first: usize, last: usize },

    #[error("cannot remove {requested} runes, only {available} remain")]
    LengthExceedsContent { requested: usize, available: usize },
}

/// What [`Buffer::load_file`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The file was read and the buffer replaced.
    Loaded,
    /// No such file. The buffer is untouched.
    Missing,
    /// The file exists but could not be read. The buffer is untouched.
    Unreadable,
}

// ---------------------------------------------------------------------------
// Buffer
// ---------------------------------------------------------------------------

/// A line-oriented text buffer.
///
/// # Coordinate system
///
/// Positions are [`Point`]s: `y` is the line index, `x` the rune index in
/// that line. A point is *contained* when it sits on a real rune, or at
/// `x == 0` of an empty line (see [`contains_point`](Self::contains_point)).
/// Insertion and removal also accept `x == line_length`, the point just past
/// the last rune.
#[derive(Clone, Default)]
pub struct Buffer {
    lines: Vec<String>,
    name: Option<String>,
    cursor: Point,
    status: Status,
    file_type: FileType,
}

impl Buffer {
    // -- Construction -------------------------------------------------------

    /// A buffer in the zero state: no lines, no name.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            name: None,
            cursor: Point::ZERO,
            status: Status::None,
            file_type: FileType::Plain,
        }
    }

    /// A scratch buffer holding `text`.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let mut buf = Self::new();
        buf.load_string(text, SCRATCH_NAME);
        buf
    }

    /// Replace the content with `line_count` empty lines.
    ///
    /// # Errors
    ///
    /// [`EditError::ZeroLines`] if `line_count` is zero. The buffer is left
    /// as it was.
    pub fn allocate(&mut self, line_count: usize, name: &str) -> Result<(), EditError> {
        if line_count == 0 {
            return Err(EditError::ZeroLines);
        }
        self.free();
        self.lines = vec![String::new(); line_count];
        self.name = Some(name.to_owned());
        self.status = Status::Modified;
        debug!(line_count, name, "allocated buffer");
        Ok(())
    }

    /// Replace the content with `content` split on `\n`.
    ///
    /// A trailing newline after a single line does not produce an extra
    /// empty line: `"text\n"` loads as one line. Any other trailing newline
    /// does. Status is left for the caller to set.
    pub fn load_string(&mut self, content: &str, name: &str) {
        self.free();
        self.lines = split_lines(content);
        self.name = Some(name.to_owned());
    }

    /// Load a file from disk.
    ///
    /// Strips one trailing `\n`, then behaves like
    /// [`load_string`](Self::load_string) with the path as the name. Status
    /// becomes [`Status::ReadOnly`] when the file is not writable, otherwise
    /// [`Status::None`]. Invalid UTF-8 is replaced with U+FFFD.
    ///
    /// A missing or unreadable file leaves the buffer untouched; the outcome
    /// tells the caller which.
    pub fn load_file(&mut self, path: &Path) -> LoadOutcome {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "file not found");
                return LoadOutcome::Missing;
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "cannot read file");
                return LoadOutcome::Unreadable;
            }
        };

        let text = String::from_utf8(bytes).unwrap_or_else(|err| {
            warn!(path = %path.display(), "file is not valid UTF-8, decoding lossily");
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        });
        let text = text.strip_suffix('\n').unwrap_or(&text);

        self.load_string(text, &path.to_string_lossy());
        self.status = if is_writable(path) {
            Status::None
        } else {
            Status::ReadOnly
        };
        self.file_type = FileType::from_path(path);
        debug!(path = %path.display(), lines = self.lines.len(), "loaded file");
        LoadOutcome::Loaded
    }

    /// Write the buffer to `path`, one `\n` after every line.
    ///
    /// Clears the modified status on success.
    ///
    /// # Errors
    ///
    /// `PermissionDenied` for a read-only buffer, or any error from the
    /// write itself.
    pub fn save_file(&mut self, path: &Path) -> io::Result<()> {
        if self.status == Status::ReadOnly {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "buffer is read-only",
            ));
        }
        let mut out = String::with_capacity(self.lines.iter().map(|l| l.len() + 1).sum());
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        fs::write(path, out)?;
        self.status = Status::None;
        debug!(path = %path.display(), lines = self.lines.len(), "saved file");
        Ok(())
    }

    /// Collapse to a single empty line, keeping the line vector's allocation.
    ///
    /// # Errors
    ///
    /// [`EditError::NoLines`] on a buffer in the zero state.
    pub fn empty(&mut self) -> Result<(), EditError> {
        if self.lines.is_empty() {
            return Err(EditError::NoLines);
        }
        self.lines.truncate(1);
        self.lines[0].clear();
        self.touch();
        Ok(())
    }

    /// Release all lines and the name and return to the zero state.
    ///
    /// Safe to call any number of times.
    pub fn free(&mut self) {
        *self = Self::new();
    }

    // -- Text access --------------------------------------------------------

    /// Number of lines. Zero only in the zero state.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// True in the zero state (never loaded, or freed).
    #[inline]
    #[must_use]
    pub fn is_unloaded(&self) -> bool {
        self.lines.is_empty()
    }

    /// A line's text, without any terminator.
    #[inline]
    #[must_use]
    pub fn line(&self, y: usize) -> Option<&str> {
        self.lines.get(y).map(String::as_str)
    }

    /// All lines.
    #[inline]
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Rune length of line `y`, or `None` if there is no such line.
    #[must_use]
    pub fn line_length(&self, y: usize) -> Option<usize> {
        self.lines.get(y).map(|line| runes_in(line))
    }

    /// The whole text, lines joined with `\n`.
    #[must_use]
    pub fn contents(&self) -> String {
        self.lines.join("\n")
    }

    /// True when `point` sits on a rune, or at column 0 of an empty line.
    #[must_use]
    pub fn contains_point(&self, point: Point) -> bool {
        self.line_length(point.y)
            .is_some_and(|len| point.x < len || (point.x == 0 && len == 0))
    }

    /// Number of runes covered by `range`, counting one per line break.
    ///
    /// Both ends may sit one past the last rune of their line. Returns
    /// `None` if either end is outside the buffer.
    #[must_use]
    pub fn range_length(&self, range: Range) -> Option<usize> {
        let (start, end) = (range.start, range.end);
        if start > end
            || start.x > self.line_length(start.y)?
            || end.x > self.line_length(end.y)?
        {
            return None;
        }
        if start.y == end.y {
            return Some(end.x - start.x);
        }
        let first = self.line_length(start.y)? - start.x + 1;
        let middle: usize = self.lines[start.y + 1..end.y]
            .iter()
            .map(|line| runes_in(line) + 1)
            .sum();
        Some(first + middle + end.x)
    }

    // -- Editing ------------------------------------------------------------

    /// Insert `text` at `point`. `text` may contain newlines.
    ///
    /// The target line is split at `point.x`. The first segment of `text`
    /// joins the head of the split, the last segment joins the tail, and
    /// every segment in between becomes a line of its own, so the buffer
    /// gains one line per `\n` in `text`.
    ///
    /// # Errors
    ///
    /// [`EditError::PointOutOfBounds`] if the line does not exist or
    /// `point.x` is past the end of the line.
    pub fn insert_string(&mut self, point: Point, text: &str) -> Result<(), EditError> {
        let split = self.edit_offset(point)?;

        if text.contains('\n') {
            let tail = self.lines[point.y].split_off(split);
            let mut segments = text.split('\n');
            if let Some(first) = segments.next() {
                self.lines[point.y].push_str(first);
            }
            let mut new_lines: Vec<String> = segments.map(str::to_owned).collect();
            if let Some(last) = new_lines.last_mut() {
                last.push_str(&tail);
            }
            let added = new_lines.len();
            self.lines.splice(point.y + 1..point.y + 1, new_lines);
            debug!(at = ?point, added, "insert_string split line");
        } else {
            self.lines[point.y].insert_str(split, text);
        }

        self.touch();
        Ok(())
    }

    /// Remove `length` runes starting at `start`.
    ///
    /// The span may cross lines; each line break counts as one rune. The
    /// text before the span and the text after it are joined into line
    /// `start.y`. If `remove_line_if_empty` is set and that line ends up
    /// empty, the line itself is removed too, unless it is the only line.
    ///
    /// # Errors
    ///
    /// [`EditError::PointOutOfBounds`] for a bad `start`,
    /// [`EditError::LengthExceedsContent`] when fewer than `length` runes
    /// follow `start`.
    pub fn remove_string(
        &mut self,
        start: Point,
        length: usize,
        remove_line_if_empty: bool,
    ) -> Result<(), EditError> {
        let cut = self.edit_offset(start)?;

        let mut end = start;
        let mut remaining = length;
        loop {
            let avail = runes_in(&self.lines[end.y]) - end.x;
            if remaining <= avail {
                end.x += remaining;
                break;
            }
            if end.y + 1 == self.lines.len() {
                return Err(EditError::LengthExceedsContent {
                    requested: length,
                    available: length - remaining + avail,
                });
            }
            remaining -= avail + 1;
            end = Point::new(0, end.y + 1);
        }

        let tail = {
            let line = &self.lines[end.y];
            let at = byte_offset(line.as_bytes(), RuneIndex(end.x)).0;
            line[at..].to_owned()
        };
        let head = &mut self.lines[start.y];
        head.truncate(cut);
        head.push_str(&tail);
        self.lines.drain(start.y + 1..=end.y);

        if remove_line_if_empty && self.lines[start.y].is_empty() && self.lines.len() > 1 {
            self.lines.remove(start.y);
        }

        debug!(at = ?start, length, lines = self.lines.len(), "remove_string");
        self.touch();
        Ok(())
    }

    /// Remove the text covered by `range`.
    ///
    /// # Errors
    ///
    /// [`EditError::PointOutOfBounds`] if either end is outside the buffer.
    pub fn remove_range(&mut self, range: Range, remove_line_if_empty: bool) -> Result<(), EditError> {
        let length = self
            .range_length(range)
            .ok_or(EditError::PointOutOfBounds(range.end))?;
        self.remove_string(range.start, length, remove_line_if_empty)
    }

    /// Remove lines `first..=last`.
    ///
    /// # Errors
    ///
    /// [`EditError::InvertedLines`] if `first > last`,
    /// [`EditError::LineOutOfBounds`] if `last` does not exist, and
    /// [`EditError::WouldEmptyBuffer`] if the range covers every line.
    pub fn remove_lines(&mut self, first: usize, last: usize) -> Result<(), EditError> {
        let count = self.lines.len();
        if first > last {
            return Err(EditError::InvertedLines { first, last });
        }
        if last >= count {
            return Err(EditError::LineOutOfBounds { line: last, count });
        }
        if first == 0 && last == count - 1 {
            return Err(EditError::WouldEmptyBuffer { first, last });
        }
        self.lines.drain(first..=last);
        debug!(first, last, lines = self.lines.len(), "remove_lines");
        self.touch();
        Ok(())
    }

    // -- Movement -----------------------------------------------------------

    /// Compute the point reached by moving `delta` from `point`.
    ///
    /// Vertical movement goes through visible columns, so moving across
    /// lines with different tab content keeps the cursor in the same screen
    /// column. The line is clamped to the buffer. The horizontal part then
    /// moves by runes and clamps to `[0, len]` when `allow_passed_end` is
    /// set, or to `[0, len - 1]` otherwise (0 on an empty line).
    ///
    /// A starting point outside the buffer is returned unchanged. With
    /// `allow_passed_end` a start one past the last rune counts as inside.
    #[must_use]
    pub fn move_point(
        &self,
        point: Point,
        delta: Delta,
        tab_width: usize,
        allow_passed_end: bool,
    ) -> Point {
        let inside = self.contains_point(point)
            || (allow_passed_end && self.line_length(point.y) == Some(point.x));
        if !inside {
            return point;
        }

        let mut target = point;
        if delta.y != 0 {
            let col = string_index_to_visible_index(
                self.lines[point.y].as_bytes(),
                RuneIndex(point.x),
                tab_width,
            );
            target.y = point
                .y
                .saturating_add_signed(delta.y)
                .min(self.lines.len() - 1);
            target.x =
                visible_index_to_string_index(self.lines[target.y].as_bytes(), col, tab_width).0;
        }

        let len = runes_in(&self.lines[target.y]);
        let max = if allow_passed_end {
            len
        } else {
            len.saturating_sub(1)
        };
        target.x = target.x.saturating_add_signed(delta.x).min(max);
        target
    }

    // -- Metadata -----------------------------------------------------------

    /// The buffer's name: its file path or a synthetic label.
    #[inline]
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = Some(name.to_owned());
    }

    /// The current cursor.
    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> Point {
        self.cursor
    }

    /// Move the cursor, clamped so it may rest at most one past the last rune.
    pub fn set_cursor(&mut self, point: Point) {
        self.cursor = point;
        self.clamp_cursor();
    }

    #[inline]
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    pub const fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    #[inline]
    #[must_use]
    pub const fn file_type(&self) -> FileType {
        self.file_type
    }

    pub const fn set_file_type(&mut self, file_type: FileType) {
        self.file_type = file_type;
    }

    // -- Internals ----------------------------------------------------------

    /// Byte offset of an insertion/removal point, validating it first.
    fn edit_offset(&self, point: Point) -> Result<usize, EditError> {
        let line = self
            .lines
            .get(point.y)
            .ok_or(EditError::PointOutOfBounds(point))?;
        if point.x > runes_in(line) {
            return Err(EditError::PointOutOfBounds(point));
        }
        Ok(byte_offset(line.as_bytes(), RuneIndex(point.x)).0)
    }

    /// Bookkeeping after every structural edit.
    fn touch(&mut self) {
        self.status = Status::Modified;
        self.clamp_cursor();
    }

    fn clamp_cursor(&mut self) {
        if self.lines.is_empty() {
            self.cursor = Point::ZERO;
            return;
        }
        self.cursor.y = self.cursor.y.min(self.lines.len() - 1);
        self.cursor.x = self.cursor.x.min(runes_in(&self.lines[self.cursor.y]));
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("name", &self.name)
            .field("lines", &self.lines.len())
            .field("cursor", &self.cursor)
            .field("status", &self.status)
            .field("file_type", &self.file_type)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Rune length of a stored line. Lines are `String`s, so this never fails.
fn runes_in(line: &str) -> usize {
    rune_length(line.as_bytes()).unwrap_or_else(|| line.chars().count())
}

/// Split loaded text into lines.
fn split_lines(content: &str) -> Vec<String> {
    // "text\n" is one line, not "text" plus a phantom empty line.
    let body = match content.find('\n') {
        Some(i) if i + 1 == content.len() => &content[..i],
        _ => content,
    };
    body.split('\n').map(str::to_owned).collect()
}

fn is_writable(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|meta| !meta.permissions().readonly())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BASE: &str = "first line\nsecond line\nthird line";

    fn base() -> Buffer {
        let mut buf = Buffer::new();
        buf.load_string(BASE, "test");
        buf
    }

    fn lines(buf: &Buffer) -> Vec<&str> {
        buf.lines().iter().map(String::as_str).collect()
    }

    // -- Zero state & free --------------------------------------------------

    #[test]
    fn new_is_zero_state() {
        let buf = Buffer::new();
        assert_eq!(buf.line_count(), 0);
        assert!(buf.is_unloaded());
        assert!(buf.name().is_none());
        assert_eq!(buf.cursor(), Point::ZERO);
    }

    #[test]
    fn free_returns_to_zero_state() {
        let mut buf = base();
        buf.set_cursor(Point::new(3, 2));
        buf.free();
        assert_eq!(buf.line_count(), 0);
        assert!(buf.lines().is_empty());
        assert!(buf.name().is_none());
        assert_eq!(buf.cursor(), Point::ZERO);
        assert_eq!(buf.line(0), None);
        assert_eq!(buf.line_length(0), None);
    }

    #[test]
    fn double_free_is_safe() {
        let mut buf = base();
        buf.free();
        buf.free();
        assert_eq!(buf.line_count(), 0);
    }

    // -- allocate -----------------------------------------------------------

    #[test]
    fn allocate_creates_empty_lines() {
        let mut buf = base();
        buf.allocate(4, "scratch").unwrap();
        assert_eq!(lines(&buf), vec!["", "", "", ""]);
        assert_eq!(buf.name(), Some("scratch"));
        assert_eq!(buf.status(), Status::Modified);
    }

    #[test]
    fn allocate_zero_fails_without_touching_content() {
        let mut buf = base();
        assert_eq!(buf.allocate(0, "nope"), Err(EditError::ZeroLines));
        assert_eq!(buf.contents(), BASE);
        assert_eq!(buf.name(), Some("test"));
    }

    // -- load_string --------------------------------------------------------

    #[test]
    fn load_string_three_lines() {
        let buf = base();
        assert_eq!(lines(&buf), vec!["first line", "second line", "third line"]);
        assert_eq!(buf.name(), Some("test"));
    }

    #[test]
    fn load_string_single_line_with_trailing_newline() {
        let buf = Buffer::from_text("only\n");
        assert_eq!(lines(&buf), vec!["only"]);
    }

    #[test]
    fn load_string_multi_line_keeps_trailing_empty_line() {
        let buf = Buffer::from_text("a\nb\n");
        assert_eq!(lines(&buf), vec!["a", "b", ""]);
    }

    #[test]
    fn load_string_no_trailing_newline() {
        let buf = Buffer::from_text("a\nb");
        assert_eq!(lines(&buf), vec!["a", "b"]);
    }

    #[test]
    fn load_string_empty_and_lone_newline() {
        assert_eq!(lines(&Buffer::from_text("")), vec![""]);
        assert_eq!(lines(&Buffer::from_text("\n")), vec![""]);
        assert_eq!(lines(&Buffer::from_text("\n\n")), vec!["", "", ""]);
    }

    #[test]
    fn load_string_replaces_previous_content() {
        let mut buf = base();
        buf.load_string("new", "other");
        assert_eq!(lines(&buf), vec!["new"]);
        assert_eq!(buf.name(), Some("other"));
    }

    // -- empty --------------------------------------------------------------

    #[test]
    fn empty_collapses_to_one_blank_line() {
        let mut buf = base();
        buf.set_cursor(Point::new(4, 2));
        buf.empty().unwrap();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line(0), Some(""));
        assert_eq!(buf.cursor(), Point::ZERO);
        assert_eq!(buf.status(), Status::Modified);
    }

    #[test]
    fn empty_on_zero_state_fails() {
        let mut buf = Buffer::new();
        assert_eq!(buf.empty(), Err(EditError::NoLines));
        assert_eq!(buf.line_count(), 0);
    }

    // -- contains_point & line_length ---------------------------------------

    #[test]
    fn contains_point_multibyte_line() {
        let buf = Buffer::from_text("$¢€𐍈");
        for x in 0..=3 {
            assert!(buf.contains_point(Point::new(x, 0)), "x = {x}");
        }
        assert!(!buf.contains_point(Point::new(4, 0)));
        assert!(!buf.contains_point(Point::new(0, 1)));
    }

    #[test]
    fn contains_point_empty_line_origin() {
        let buf = Buffer::from_text("a\n\nb");
        assert!(buf.contains_point(Point::new(0, 1)));
        assert!(!buf.contains_point(Point::new(1, 1)));
    }

    #[test]
    fn line_length_counts_runes() {
        let buf = Buffer::from_text("$¢€𐍈\nabc\n");
        assert_eq!(buf.line_length(0), Some(4));
        assert_eq!(buf.line_length(1), Some(3));
        assert_eq!(buf.line_length(2), Some(0));
    }

    #[test]
    fn line_length_rejects_index_equal_to_line_count() {
        // The bound is `>= line_count`; index == line_count is out of range.
        let buf = base();
        assert_eq!(buf.line_length(3), None);
        assert_eq!(buf.line_length(2), Some(10));
    }

    // -- insert_string ------------------------------------------------------

    #[test]
    fn insert_single_line() {
        let mut buf = base();
        buf.insert_string(Point::new(2, 1), "simple").unwrap();
        assert_eq!(buf.line(1), Some("sesimplecond line"));
        assert_eq!(buf.line_count(), 3);
        assert_eq!(buf.status(), Status::Modified);
    }

    #[test]
    fn insert_two_line_string_splits_and_merges() {
        let mut buf = base();
        buf.insert_string(Point::new(6, 0), "one\ntwo ").unwrap();
        assert_eq!(
            lines(&buf),
            vec!["first one", "two line", "second line", "third line"]
        );
    }

    #[test]
    fn insert_multi_line_adds_interior_lines() {
        let mut buf = base();
        buf.insert_string(Point::new(5, 2), "A\nB\nC\nD").unwrap();
        assert_eq!(
            lines(&buf),
            vec!["first line", "second line", "thirdA", "B", "C", "D line"]
        );
    }

    #[test]
    fn insert_newline_only_splits_line() {
        let mut buf = base();
        buf.insert_string(Point::new(5, 0), "\n").unwrap();
        assert_eq!(buf.line(0), Some("first"));
        assert_eq!(buf.line(1), Some(" line"));
        assert_eq!(buf.line_count(), 4);
    }

    #[test]
    fn insert_at_end_of_line() {
        let mut buf = base();
        buf.insert_string(Point::new(10, 2), "!").unwrap();
        assert_eq!(buf.line(2), Some("third line!"));
    }

    #[test]
    fn insert_trailing_newline_at_end_adds_empty_line() {
        let mut buf = base();
        buf.insert_string(Point::new(10, 2), "\n").unwrap();
        assert_eq!(buf.line_count(), 4);
        assert_eq!(buf.line(3), Some(""));
    }

    #[test]
    fn insert_after_multibyte_runes() {
        let mut buf = Buffer::from_text("¢€𐍈");
        buf.insert_string(Point::new(2, 0), "x").unwrap();
        assert_eq!(buf.line(0), Some("¢€x𐍈"));
    }

    #[test]
    fn insert_out_of_bounds_fails_without_mutation() {
        let mut buf = base();
        buf.set_status(Status::None);
        assert_eq!(
            buf.insert_string(Point::new(11, 0), "x\ny"),
            Err(EditError::PointOutOfBounds(Point::new(11, 0)))
        );
        assert_eq!(
            buf.insert_string(Point::new(0, 3), "x"),
            Err(EditError::PointOutOfBounds(Point::new(0, 3)))
        );
        assert_eq!(buf.contents(), BASE);
        assert_eq!(buf.status(), Status::None);
    }

    // -- remove_string ------------------------------------------------------

    #[test]
    fn remove_within_line_keeps_line() {
        let mut buf = base();
        buf.remove_string(Point::new(2, 1), 4, false).unwrap();
        assert_eq!(lines(&buf), vec!["first line", "se line", "third line"]);
    }

    #[test]
    fn remove_whole_line_content_with_flag_removes_line() {
        let mut buf = base();
        buf.remove_string(Point::new(0, 1), 11, true).unwrap();
        assert_eq!(lines(&buf), vec!["first line", "third line"]);
    }

    #[test]
    fn remove_whole_line_content_without_flag_keeps_empty_line() {
        let mut buf = base();
        buf.remove_string(Point::new(0, 1), 11, false).unwrap();
        assert_eq!(lines(&buf), vec!["first line", "", "third line"]);
    }

    #[test]
    fn remove_across_line_break() {
        let mut buf = base();
        // "line" (4) + break (1) + "sec" (3)
        buf.remove_string(Point::new(6, 0), 8, false).unwrap();
        assert_eq!(lines(&buf), vec!["first ond line", "third line"]);
    }

    #[test]
    fn remove_just_the_line_break_joins_lines() {
        let mut buf = base();
        buf.remove_string(Point::new(10, 0), 1, false).unwrap();
        assert_eq!(lines(&buf), vec!["first linesecond line", "third line"]);
    }

    #[test]
    fn remove_spanning_three_lines() {
        let mut buf = base();
        // "line" + break + "second line" + break + "third" = 4+1+11+1+5
        buf.remove_string(Point::new(6, 0), 22, false).unwrap();
        assert_eq!(lines(&buf), vec!["first  line"]);
    }

    #[test]
    fn remove_everything_keeps_one_line() {
        let mut buf = base();
        let total = 10 + 1 + 11 + 1 + 10;
        buf.remove_string(Point::ZERO, total, true).unwrap();
        assert_eq!(lines(&buf), vec![""]);
    }

    #[test]
    fn remove_multibyte_runes() {
        let mut buf = Buffer::from_text("$¢€𐍈");
        buf.remove_string(Point::new(1, 0), 2, false).unwrap();
        assert_eq!(buf.line(0), Some("$𐍈"));
    }

    #[test]
    fn remove_length_exceeding_content_fails_without_mutation() {
        let mut buf = base();
        buf.set_status(Status::None);
        assert_eq!(
            buf.remove_string(Point::new(5, 2), 6, false),
            Err(EditError::LengthExceedsContent {
                requested: 6,
                available: 5
            })
        );
        assert_eq!(
            buf.remove_string(Point::new(0, 1), 30, false),
            Err(EditError::LengthExceedsContent {
                requested: 30,
                available: 22
            })
        );
        assert_eq!(buf.contents(), BASE);
        assert_eq!(buf.status(), Status::None);
    }

    #[test]
    fn remove_from_invalid_point_fails() {
        let mut buf = base();
        assert_eq!(
            buf.remove_string(Point::new(0, 9), 1, false),
            Err(EditError::PointOutOfBounds(Point::new(0, 9)))
        );
        assert_eq!(
            buf.remove_string(Point::new(12, 1), 1, false),
            Err(EditError::PointOutOfBounds(Point::new(12, 1)))
        );
    }

    #[test]
    fn remove_range_uses_range_length() {
        let mut buf = base();
        let range = Range::new(Point::new(6, 0), Point::new(3, 1));
        assert_eq!(buf.range_length(range), Some(8));
        buf.remove_range(range, false).unwrap();
        assert_eq!(buf.line(0), Some("first ond line"));
    }

    #[test]
    fn range_length_rejects_points_outside() {
        let buf = base();
        let range = Range::new(Point::new(0, 0), Point::new(0, 7));
        assert_eq!(buf.range_length(range), None);
    }

    // -- remove_lines -------------------------------------------------------

    #[test]
    fn remove_lines_middle() {
        let mut buf = base();
        buf.remove_lines(1, 1).unwrap();
        assert_eq!(lines(&buf), vec!["first line", "third line"]);
    }

    #[test]
    fn remove_lines_range_shifts_remaining() {
        let mut buf = Buffer::from_text("a\nb\nc\nd\ne");
        buf.remove_lines(1, 3).unwrap();
        assert_eq!(lines(&buf), vec!["a", "e"]);
    }

    #[test]
    fn remove_lines_inverted_fails() {
        let mut buf = base();
        assert_eq!(
            buf.remove_lines(2, 1),
            Err(EditError::InvertedLines { first: 2, last: 1 })
        );
    }

    #[test]
    fn remove_lines_out_of_bounds_fails() {
        let mut buf = base();
        assert_eq!(
            buf.remove_lines(1, 3),
            Err(EditError::LineOutOfBounds { line: 3, count: 3 })
        );
    }

    #[test]
    fn remove_lines_refuses_to_empty_buffer() {
        let mut buf = base();
        assert_eq!(
            buf.remove_lines(0, 2),
            Err(EditError::WouldEmptyBuffer { first: 0, last: 2 })
        );
        let mut single = Buffer::from_text("only");
        assert_eq!(
            single.remove_lines(0, 0),
            Err(EditError::WouldEmptyBuffer { first: 0, last: 0 })
        );
        assert_eq!(buf.contents(), BASE);
    }

    #[test]
    fn remove_lines_clamps_cursor() {
        let mut buf = base();
        buf.set_cursor(Point::new(8, 2));
        buf.remove_lines(1, 2).unwrap();
        assert_eq!(buf.cursor(), Point::new(8, 0));
    }

    // -- move_point ---------------------------------------------------------

    #[test]
    fn move_horizontal_clamps_on_rune() {
        let buf = base();
        assert_eq!(buf.move_point(Point::new(8, 0), Delta::new(5, 0), 8, false), Point::new(9, 0));
        assert_eq!(buf.move_point(Point::new(2, 0), Delta::new(-5, 0), 8, false), Point::ZERO);
    }

    #[test]
    fn move_horizontal_passed_end() {
        let buf = base();
        assert_eq!(buf.move_point(Point::new(8, 0), Delta::new(5, 0), 8, true), Point::new(10, 0));
        // Already past the end is still a valid start.
        assert_eq!(buf.move_point(Point::new(10, 0), Delta::LEFT, 8, true), Point::new(9, 0));
    }

    #[test]
    fn move_vertical_clamps_lines() {
        let buf = base();
        assert_eq!(buf.move_point(Point::new(3, 1), Delta::new(0, 10), 8, false), Point::new(3, 2));
        assert_eq!(buf.move_point(Point::new(3, 1), Delta::new(0, -10), 8, false), Point::new(3, 0));
    }

    #[test]
    fn move_vertical_keeps_visible_column() {
        // Column 8 on line 0 is the rune after the tab on line 1.
        let buf = Buffer::from_text("abcdefghij\n\tx");
        assert_eq!(buf.move_point(Point::new(8, 0), Delta::DOWN, 8, false), Point::new(1, 1));
        // And back up: column 8 is rune 8 again.
        assert_eq!(buf.move_point(Point::new(1, 1), Delta::UP, 8, false), Point::new(8, 0));
    }

    #[test]
    fn move_vertical_onto_shorter_line_clamps() {
        let buf = Buffer::from_text("a long line\nab\n");
        assert_eq!(buf.move_point(Point::new(9, 0), Delta::DOWN, 4, false), Point::new(1, 1));
        assert_eq!(buf.move_point(Point::new(9, 0), Delta::DOWN, 4, true), Point::new(2, 1));
        assert_eq!(buf.move_point(Point::new(1, 1), Delta::DOWN, 4, false), Point::new(0, 2));
    }

    #[test]
    fn move_combined_delta() {
        let buf = base();
        assert_eq!(buf.move_point(Point::new(2, 0), Delta::new(3, 1), 8, false), Point::new(5, 1));
    }

    #[test]
    fn move_from_uncontained_point_is_identity() {
        let buf = base();
        let outside = Point::new(40, 1);
        assert_eq!(buf.move_point(outside, Delta::DOWN, 8, false), outside);
        let past_end = Point::new(10, 0);
        assert_eq!(buf.move_point(past_end, Delta::DOWN, 8, false), past_end);
        let no_line = Point::new(0, 7);
        assert_eq!(buf.move_point(no_line, Delta::UP, 8, true), no_line);
    }

    // -- Cursor & status bookkeeping ----------------------------------------

    #[test]
    fn edits_clamp_cursor_into_buffer() {
        let mut buf = base();
        buf.set_cursor(Point::new(10, 2));
        buf.remove_string(Point::new(0, 2), 6, false).unwrap();
        assert_eq!(buf.cursor(), Point::new(4, 2));
    }

    #[test]
    fn set_cursor_allows_one_past_end() {
        let mut buf = base();
        buf.set_cursor(Point::new(99, 99));
        assert_eq!(buf.cursor(), Point::new(10, 2));
    }

    #[test]
    fn edits_leave_file_type_alone() {
        let mut buf = base();
        buf.set_file_type(FileType::Python);
        buf.insert_string(Point::ZERO, "# ").unwrap();
        buf.remove_lines(1, 1).unwrap();
        buf.empty().unwrap();
        assert_eq!(buf.file_type(), FileType::Python);
    }

    #[test]
    fn status_display() {
        assert_eq!(Status::None.to_string(), "");
        assert_eq!(Status::Modified.to_string(), "[+]");
        assert_eq!(Status::ReadOnly.to_string(), "[RO]");
        assert_eq!(Status::NewFile.to_string(), "[New]");
    }

    #[test]
    fn file_type_from_extension() {
        assert_eq!(FileType::from_path(Path::new("main.c")), FileType::C);
        assert_eq!(FileType::from_path(Path::new("x.HPP")), FileType::Cpp);
        assert_eq!(FileType::from_path(Path::new("a/b/run.py")), FileType::Python);
        assert_eq!(FileType::from_path(Path::new("App.java")), FileType::Java);
        assert_eq!(FileType::from_path(Path::new("build.sh")), FileType::Shell);
        assert_eq!(FileType::from_path(Path::new("Cargo.toml")), FileType::Config);
        assert_eq!(FileType::from_path(Path::new("fix.patch")), FileType::Diff);
        assert_eq!(FileType::from_path(Path::new("README")), FileType::Plain);
        assert_eq!(FileType::Terminal.name(), "terminal");
    }

    #[test]
    fn debug_format_summarizes() {
        let debug = format!("{:?}", base());
        assert!(debug.contains("Buffer"));
        assert!(debug.contains("lines: 3"));
        assert!(debug.contains("Modified") || debug.contains("None"));
    }

    // -- File I/O -----------------------------------------------------------

    #[test]
    fn load_file_strips_one_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("three.txt");
        fs::write(&path, "first line\nsecond line\nthird line\n").unwrap();

        let mut buf = Buffer::new();
        assert_eq!(buf.load_file(&path), LoadOutcome::Loaded);
        assert_eq!(lines(&buf), vec!["first line", "second line", "third line"]);
        assert_eq!(buf.status(), Status::None);
        assert_eq!(buf.name(), Some(path.to_string_lossy().as_ref()));
    }

    #[test]
    fn load_file_missing_leaves_buffer_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let mut buf = base();
        assert_eq!(buf.load_file(&dir.path().join("nope.txt")), LoadOutcome::Missing);
        assert_eq!(buf.contents(), BASE);
        assert_eq!(buf.name(), Some("test"));
    }

    #[test]
    fn load_file_read_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locked.py");
        fs::write(&path, "print()\n").unwrap();
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_readonly(true);
        fs::set_permissions(&path, perms).unwrap();

        let mut buf = Buffer::new();
        assert_eq!(buf.load_file(&path), LoadOutcome::Loaded);
        assert_eq!(buf.status(), Status::ReadOnly);
        assert_eq!(buf.file_type(), FileType::Python);
        assert_eq!(
            buf.save_file(&path).unwrap_err().kind(),
            io::ErrorKind::PermissionDenied
        );
    }

    #[test]
    fn load_file_invalid_utf8_is_lossy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        fs::write(&path, b"ok\xFF\n").unwrap();

        let mut buf = Buffer::new();
        assert_eq!(buf.load_file(&path), LoadOutcome::Loaded);
        assert_eq!(buf.line(0), Some("ok\u{FFFD}"));
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.txt");

        let mut buf = base();
        buf.insert_string(Point::new(10, 2), "\nfourth line").unwrap();
        buf.save_file(&path).unwrap();
        assert_eq!(buf.status(), Status::None);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "first line\nsecond line\nthird line\nfourth line\n"
        );

        let mut loaded = Buffer::new();
        assert_eq!(loaded.load_file(&path), LoadOutcome::Loaded);
        assert_eq!(loaded.lines(), buf.lines());
    }

    #[test]
    fn trailing_empty_line_is_lost_on_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trailing.txt");

        let mut buf = Buffer::from_text("a");
        buf.insert_string(Point::new(1, 0), "\n").unwrap();
        assert_eq!(lines(&buf), vec!["a", ""]);
        buf.save_file(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\n\n");

        // One newline is stripped, then "a\n" reads as a single line.
        let mut loaded = Buffer::new();
        assert_eq!(loaded.load_file(&path), LoadOutcome::Loaded);
        assert_eq!(lines(&loaded), vec!["a"]);
    }
}
