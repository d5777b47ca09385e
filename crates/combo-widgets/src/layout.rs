#![forbid(unsafe_code)]

//! Widget geometry and hit testing.
//!
//! The widget occupies one row for the text field, with the popup toggle in
//! the rightmost [`TOGGLE_WIDTH`] cells, and the popup rows directly below.
//! [`ComboboxLayout::owns`] is the containment test a host uses to decide
//! whether a page click landed inside the widget or outside it.

use combo_core::geometry::Rect;

/// Width of the popup-toggle control in cells.
pub const TOGGLE_WIDTH: u16 = 3;

/// Region hit by a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// The text field.
    Input,
    /// The popup toggle.
    Toggle,
    /// Popup row (absolute index into the match list).
    Row(usize),
    /// Not part of the widget.
    Outside,
}

/// Computed regions for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComboboxLayout {
    /// Text field.
    pub input: Rect,
    /// Popup toggle; empty when the toggle is disabled.
    pub toggle: Rect,
    /// Popup rows.
    pub rows: Rect,
}

impl ComboboxLayout {
    /// Lay out the widget at `anchor` with `visible_rows` popup rows.
    ///
    /// Only the first row of `anchor` is used for the field; its width
    /// is shared by the popup.
    pub fn compute(anchor: Rect, visible_rows: usize) -> Self {
        let line = anchor.row(0);
        let (input, toggle) = line.split_right(TOGGLE_WIDTH);
        let height = u16::try_from(visible_rows).unwrap_or(u16::MAX);
        let rows = Rect::new(line.x, line.bottom(), line.width, height);
        Self {
            input,
            toggle,
            rows,
        }
    }

    /// Give the toggle's cells back to the text field.
    pub fn without_toggle(mut self) -> Self {
        self.input = self.input.union(&self.toggle);
        self.toggle = Rect::new(self.input.right(), self.input.y, 0, 0);
        self
    }

    /// Everything the widget draws while expanded.
    pub fn bounds(&self, expanded: bool) -> Rect {
        let line = self.input.union(&self.toggle);
        if expanded {
            line.union(&self.rows)
        } else {
            line
        }
    }

    /// Classify the cell at `(x, y)`.
    ///
    /// Rows only exist while `expanded`; `scroll_offset` converts a screen
    /// row into an index into the match list.
    pub fn hit_test(&self, x: u16, y: u16, expanded: bool, scroll_offset: usize) -> Hit {
        if self.input.contains(x, y) {
            Hit::Input
        } else if self.toggle.contains(x, y) {
            Hit::Toggle
        } else if expanded && self.rows.contains(x, y) {
            Hit::Row(scroll_offset + usize::from(y - self.rows.y))
        } else {
            Hit::Outside
        }
    }

    /// True when `(x, y)` belongs to the widget.
    pub fn owns(&self, x: u16, y: u16, expanded: bool) -> bool {
        self.hit_test(x, y, expanded, 0) != Hit::Outside
    }
}
