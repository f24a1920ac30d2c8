//! View: a scrolled rectangle onto one buffer.
//!
//! A `View` holds a viewport rectangle, a scroll offset and a non-owning
//! handle to the [`Buffer`] it shows. The editor owns buffers as
//! `Rc<RefCell<Buffer>>`; views keep only a [`Weak`], so several views can
//! share a buffer and dropping a view never drops text.
//!
//! ```text
//!            scroll.x
//!               │◀──── width ────▶│
//!   ┌───────────┼─────────────────┼──────┐
//!   │ buffer    │  ┌───────────┐  │      │  ◀─ scroll.y
//!   │           │  │  cursor   │  │      │
//!   │           │  │  zone     │  │      │  height
//!   │           │  └───────────┘  │      │
//!   └───────────┴─────────────────┴──────┘
//! ```
//!
//! The cursor zone is the viewport shrunk by the scroll-offs on each side.
//! [`follow_cursor`](View::follow_cursor) scrolls just far enough to put
//! the cursor back inside it. Horizontal positions are visible columns
//! (tabs expanded); vertical positions are raw line numbers.
//!
//! Rendering is someone else's job. A view only decides *what* is visible.

use std::cell::RefCell;
use std::fmt;
use std::ops::Range;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::buffer::Buffer;
use crate::geometry::string_index_to_visible_index;
use crate::rune::RuneIndex;

// ---------------------------------------------------------------------------
// Rect & Scroll
// ---------------------------------------------------------------------------

/// Viewport bounds in viewport-local units. `right` and `bottom` are
/// exclusive.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub left: usize,
    pub right: usize,
    pub top: usize,
    pub bottom: usize,
}

impl Rect {
    #[inline]
    #[must_use]
    pub const fn new(left: usize, right: usize, top: usize, bottom: usize) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// A rectangle anchored at the origin.
    #[inline]
    #[must_use]
    pub const fn sized(width: usize, height: usize) -> Self {
        Self::new(0, width, 0, height)
    }

    /// Columns across. Zero for an inverted rectangle.
    #[inline]
    #[must_use]
    pub const fn width(self) -> usize {
        self.right.saturating_sub(self.left)
    }

    /// Rows down. Zero for an inverted rectangle.
    #[inline]
    #[must_use]
    pub const fn height(self) -> usize {
        self.bottom.saturating_sub(self.top)
    }
}

/// Scroll offset: `x` in visible columns, `y` in lines.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Scroll {
    pub x: usize,
    pub y: usize,
}

impl Scroll {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    #[inline]
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// A viewport bound to at most one buffer.
///
/// A fresh view has a zero rectangle, zero scroll and no buffer. Every
/// operation on an unbound view is a no-op, as is one whose buffer has
/// been dropped.
#[derive(Clone, Default)]
pub struct View {
    rect: Rect,
    scroll: Scroll,
    buffer: Weak<RefCell<Buffer>>,
}

impl View {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rect: Rect::new(0, 0, 0, 0),
            scroll: Scroll::ZERO,
            buffer: Weak::new(),
        }
    }

    // -- Binding ------------------------------------------------------------

    /// Show `buffer` in this view. Does not reset the scroll.
    pub fn bind(&mut self, buffer: &Rc<RefCell<Buffer>>) {
        self.buffer = Rc::downgrade(buffer);
    }

    /// Detach from any buffer.
    pub fn unbind(&mut self) {
        self.buffer = Weak::new();
    }

    /// The bound buffer, if it is still alive.
    #[must_use]
    pub fn buffer(&self) -> Option<Rc<RefCell<Buffer>>> {
        self.buffer.upgrade()
    }

    /// True when the view shows a live buffer.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.buffer.strong_count() > 0
    }

    // -- Geometry -----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.rect
    }

    pub const fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    #[inline]
    #[must_use]
    pub const fn scroll(&self) -> Scroll {
        self.scroll
    }

    pub const fn set_scroll(&mut self, scroll: Scroll) {
        self.scroll = scroll;
    }

    /// Buffer lines currently inside the viewport.
    ///
    /// Empty when unbound. Clipped to the buffer's line count.
    #[must_use]
    pub fn visible_lines(&self) -> Range<usize> {
        let Some(buffer) = self.buffer.upgrade() else {
            return 0..0;
        };
        let Ok(buffer) = buffer.try_borrow() else {
            return 0..0;
        };
        let count = buffer.line_count();
        let start = self.scroll.y.min(count);
        let end = (self.scroll.y + self.rect.height()).min(count);
        start..end
    }

    // -- Scrolling ----------------------------------------------------------

    /// Scroll so the buffer's cursor sits inside the cursor zone.
    ///
    /// Both edges are measured from the current scroll. A position before
    /// `scroll + off` scrolls back by the deficit, floored at 0; otherwise a
    /// position past `scroll + extent - off` scrolls forward by the excess.
    /// Both axes are always evaluated.
    ///
    /// Does nothing when no live buffer is bound, or when the buffer is
    /// mutably borrowed elsewhere.
    pub fn follow_cursor(
        &mut self,
        horizontal_scroll_off: usize,
        vertical_scroll_off: usize,
        tab_width: usize,
    ) {
        let Some(buffer) = self.buffer.upgrade() else {
            return;
        };
        let Ok(buffer) = buffer.try_borrow() else {
            return;
        };

        let cursor = buffer.cursor();
        let col = buffer.line(cursor.y).map_or(0, |line| {
            string_index_to_visible_index(line.as_bytes(), RuneIndex(cursor.x), tab_width).0
        });

        let before = self.scroll;
        self.scroll.x = follow_axis(self.scroll.x, col, self.rect.width(), horizontal_scroll_off);
        self.scroll.y = follow_axis(self.scroll.y, cursor.y, self.rect.height(), vertical_scroll_off);

        if self.scroll != before {
            debug!(?before, after = ?self.scroll, col, line = cursor.y, "view scrolled");
        }
    }
}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("rect", &self.rect)
            .field("scroll", &self.scroll)
            .field("bound", &self.is_bound())
            .finish()
    }
}

/// One axis of [`View::follow_cursor`].
const fn follow_axis(scroll: usize, pos: usize, extent: usize, off: usize) -> usize {
    let low = scroll + off;
    let high = (scroll + extent).saturating_sub(off);
    if pos < low {
        scroll.saturating_sub(low - pos)
    } else if pos > high {
        scroll + (pos - high)
    } else {
        scroll
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
