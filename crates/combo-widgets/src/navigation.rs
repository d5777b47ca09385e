#![forbid(unsafe_code)]

//! Navigation state machine.
//!
//! Owns popup visibility, the highlighted row and logical focus. It knows
//! nothing about text or the reference list: callers pass the number of
//! rows that can be highlighted in the *current* match list.
//!
//! # Transitions
//!
//! | State | Input | Next | Focus |
//! |---|---|---|---|
//! | any | text changed | `OpenUnselected` | Input |
//! | `Closed`/`OpenUnselected` | ArrowDown, `n > 0` | `OpenSelected(0)` | Listbox |
//! | `Closed`/`OpenUnselected` | ArrowDown, `n == 0` | `OpenUnselected` | unchanged |
//! | `OpenSelected(i)` | ArrowDown | `OpenSelected(min(i+1, n-1))` | Listbox |
//! | `OpenSelected(0)` | ArrowUp | `Closed` | Input |
//! | `OpenSelected(i>0)` | ArrowUp | `OpenSelected(i-1)` | Listbox |
//! | open | Escape | `Closed` | Input |
//! | any | Tab | `Closed` | Outside |
//! | any | click field | open, highlight kept | Input |
//! | any | click toggle | toggled | Input |
//! | any | click outside / blur | `Closed` | Outside |
//!
//! # Invariants
//!
//! 1. `OpenSelected(i)` implies `i < n` for the `n` last passed in.
//! 2. No transition wraps around.

use std::fmt;

/// Popup visibility and highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NavState {
    /// Popup hidden, nothing highlighted.
    #[default]
    Closed,
    /// Popup visible, nothing highlighted.
    OpenUnselected,
    /// Popup visible, row `0`-based index highlighted.
    OpenSelected(usize),
}

impl NavState {
    /// True for either open variant.
    pub const fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// Highlighted row, if any.
    pub const fn highlighted(&self) -> Option<usize> {
        match self {
            Self::OpenSelected(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for NavState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "closed"),
            Self::OpenUnselected => write!(f, "open"),
            Self::OpenSelected(i) => write!(f, "open[{i}]"),
        }
    }
}

/// Where keyboard input is logically interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Focus {
    /// Focus is elsewhere on the page (or nowhere).
    #[default]
    Outside,
    /// The text field has focus.
    Input,
    /// A popup row is highlighted and drives keyboard input.
    Listbox,
}

impl Focus {
    /// True while focus is anywhere inside the widget.
    pub const fn is_within(&self) -> bool {
        !matches!(self, Self::Outside)
    }
}

/// The state machine. Each method returns `true` when state or focus changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Navigator {
    state: NavState,
    focus: Focus,
}

impl Navigator {
    /// Start closed with focus outside the widget.
    pub const fn new() -> Self {
        Self {
            state: NavState::Closed,
            focus: Focus::Outside,
        }
    }

    /// Current state.
    pub const fn state(&self) -> NavState {
        self.state
    }

    /// Current logical focus.
    pub const fn focus(&self) -> Focus {
        self.focus
    }

    /// Any keystroke that edits the text: reopen with no highlight.
    pub fn text_changed(&mut self) -> bool {
        self.set(NavState::OpenUnselected, Focus::Input)
    }

    /// ArrowDown with `navigable` highlightable rows.
    pub fn arrow_down(&mut self, navigable: usize) -> bool {
        match self.state {
            NavState::OpenSelected(i) if navigable > 0 => {
                let next = (i + 1).min(navigable - 1);
                self.set(NavState::OpenSelected(next), Focus::Listbox)
            }
            _ if navigable > 0 => self.set(NavState::OpenSelected(0), Focus::Listbox),
            _ => self.set(NavState::OpenUnselected, self.focus_or_input()),
        }
    }

    /// ArrowUp. Leaving the first row closes the popup.
    pub fn arrow_up(&mut self) -> bool {
        match self.state {
            NavState::OpenSelected(0) => self.set(NavState::Closed, Focus::Input),
            NavState::OpenSelected(i) => self.set(NavState::OpenSelected(i - 1), Focus::Listbox),
            NavState::Closed | NavState::OpenUnselected => false,
        }
    }

    /// Escape: close, keep text, focus back on the field.
    pub fn escape(&mut self) -> bool {
        if self.state.is_open() {
            self.set(NavState::Closed, Focus::Input)
        } else {
            false
        }
    }

    /// Tab/Shift+Tab: close and let focus leave the widget.
    pub fn tab(&mut self) -> bool {
        self.set(NavState::Closed, Focus::Outside)
    }

    /// Click on the text field: show the popup, keeping any highlight.
    pub fn open(&mut self) -> bool {
        let next = if self.state.is_open() {
            self.state
        } else {
            NavState::OpenUnselected
        };
        let focus = if next.highlighted().is_some() {
            Focus::Listbox
        } else {
            Focus::Input
        };
        self.set(next, focus)
    }

    /// Click on the popup toggle.
    pub fn toggle(&mut self) -> bool {
        if self.state.is_open() {
            self.close_to_input()
        } else {
            self.set(NavState::OpenUnselected, Focus::Input)
        }
    }

    /// Keyboard focus arrived on the field from elsewhere (Shift+Tab back).
    pub fn focus_input(&mut self) -> bool {
        if self.focus.is_within() {
            return false;
        }
        self.set(self.state, Focus::Input)
    }

    /// Close and return focus to the text field (after a commit).
    pub fn close_to_input(&mut self) -> bool {
        self.set(NavState::Closed, Focus::Input)
    }

    /// Focus left the widget (outside click, window blur).
    pub fn blur(&mut self) -> bool {
        self.set(NavState::Closed, Focus::Outside)
    }

    fn focus_or_input(&self) -> Focus {
        if self.focus == Focus::Outside {
            Focus::Input
        } else {
            self.focus
        }
    }

    fn set(&mut self, state: NavState, focus: Focus) -> bool {
        if self.state == state && self.focus == focus {
            return false;
        }
        combo_core::debug!(
            from = %self.state,
            to = %state,
            focus = ?focus,
            "navigation transition"
        );
        self.state = state;
        self.focus = focus;
        true
    }
}
