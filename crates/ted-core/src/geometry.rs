//! Coordinate geometry: rune indices vs. tab-expanded visible columns.
//!
//! A line is addressed by rune index (see [`Point`](crate::position::Point)),
//! but what the user sees is a visible column: every tab occupies
//! `tab_width` columns and every other rune occupies one.
//!
//! ```text
//!   line:     \t  \t  g o o d b y e
//!   rune:     0   1   2 3 4 5 6 7 8
//!   column:   0   8   16 ...          (tab_width = 8)
//! ```
//!
//! Tabs are a fixed width here, not tab stops: a tab after three runes still
//! adds exactly `tab_width` columns.
//!
//! Both conversions walk from the start of the line, saturate at the end of
//! the line, and never fail. An undecodable byte counts as one rune and
//! [`UNDECODABLE_COLUMNS`] columns, so the two functions stay inverses of
//! each other on any input as long as `tab_width > 0`.

use crate::rune::{Rune, RuneIndex, runes};

/// A tab-expanded column within a line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VisibleCol(pub usize);

/// Columns taken by a byte the codec cannot decode. One byte is one slot.
pub const UNDECODABLE_COLUMNS: usize = 1;

/// Visible width of a single rune.
#[inline]
const fn columns(rune: Rune, tab_width: usize) -> usize {
    if rune.0 == Rune::TAB.0 {
        tab_width
    } else if rune.is_valid() {
        1
    } else {
        UNDECODABLE_COLUMNS
    }
}

/// Visible column at which rune `index` starts.
///
/// Past the end of the line this is the width of the whole line.
#[must_use]
pub fn string_index_to_visible_index(line: &[u8], index: RuneIndex, tab_width: usize) -> VisibleCol {
    let col = runes(line)
        .take(index.0)
        .map(|(rune, _)| columns(rune, tab_width))
        .sum();
    VisibleCol(col)
}

/// Rune index reached after spending `col` visible columns.
///
/// A column in the middle of a tab resolves to the rune after the tab.
/// Past the end of the line this is the rune length of the line.
#[must_use]
pub fn visible_index_to_string_index(line: &[u8], col: VisibleCol, tab_width: usize) -> RuneIndex {
    let mut remaining = col.0;
    let mut index = 0;
    for (rune, _) in runes(line) {
        if remaining == 0 {
            break;
        }
        remaining = remaining.saturating_sub(columns(rune, tab_width));
        index += 1;
    }
    RuneIndex(index)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
