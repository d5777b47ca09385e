#![forbid(unsafe_code)]

//! Test harness and reference host for the combobox.
//!
//! - **Session**: a scripted page (heading, combobox, submit button) driven
//!   the way an end-to-end browser test would drive the real thing.
//! - **Snapshot testing**: renders a [`ComboboxView`] as text and compares it
//!   against stored `.snap` files.
//!
//! # Quick Start
//!
//! ```ignore
//! use combo_harness::{assert_snapshot, Session};
//!
//! #[test]
//! fn typing_filters() {
//!     let mut session = Session::new();
//!     session.type_text("lia").unwrap();
//!     assert_snapshot!("typing_lia", &session.view());
//! }
//! ```
//!
//! # Updating Snapshots
//!
//! Run tests with `BLESS=1` to create or update snapshot files:
//!
//! ```sh
//! BLESS=1 cargo test -p combo-harness
//! ```
//!
//! Snapshot files are stored under `tests/snapshots/` relative to the
//! crate's `CARGO_MANIFEST_DIR`.

pub mod countries;
pub mod script;
pub mod session;

use std::fmt::Write as FmtWrite;
use std::path::{Path, PathBuf};

use unicode_width::UnicodeWidthChar;

pub use combo_core::geometry::Rect;
pub use combo_widgets::view::ComboboxView;
pub use countries::COUNTRIES;
pub use script::{ScriptError, parse as parse_script};
pub use session::{PageFocus, Session};

// ============================================================================
// View → Text Conversion
// ============================================================================

/// Toggle glyph while the popup is hidden.
pub const TOGGLE_CLOSED: &str = "[v]";
/// Toggle glyph while the popup is visible.
pub const TOGGLE_OPEN: &str = "[^]";

/// Render a view as plain text, `width` cells wide.
///
/// The first line is the field followed by the three-cell toggle. Each
/// visible popup row follows on its own line, prefixed with `> ` when
/// selected. A hidden popup contributes no lines. Text is clipped by display
/// width, never wrapped.
pub fn view_to_text(view: &ComboboxView, width: u16) -> String {
    let width = usize::from(width);
    let field_width = width.saturating_sub(TOGGLE_CLOSED.len());
    let mut out = String::with_capacity((width + 1) * (1 + view.listbox.max_visible_rows));

    let shown = if view.input.value.is_empty() {
        view.input.placeholder.as_str()
    } else {
        view.input.value.as_str()
    };
    let toggle = if view.input.expanded {
        TOGGLE_OPEN
    } else {
        TOGGLE_CLOSED
    };
    let line = format!("{}{toggle}", pad(shown, field_width));
    out.push_str(&clip(&line, width));

    for row in view.listbox.visible_rows() {
        let marker = if row.selected { "> " } else { "  " };
        out.push('\n');
        out.push_str(&clip(&format!("{marker}{}", row.text), width));
    }
    out
}

/// Clip `text` to at most `width` display cells.
fn clip(text: &str, width: usize) -> String {
    let mut used = 0;
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        out.push(c);
    }
    out
}

/// Clip then right-pad `text` to exactly `width` display cells.
fn pad(text: &str, width: usize) -> String {
    let mut out = clip(text, width);
    let used: usize = out.chars().map(|c| c.width().unwrap_or(0)).sum();
    out.extend(std::iter::repeat_n(' ', width - used));
    out
}

// ============================================================================
// Match Modes & Normalization
// ============================================================================

/// Comparison mode for snapshot testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Byte-exact string comparison.
    Exact,
    /// Trim trailing whitespace on each line before comparing.
    TrimTrailing,
    /// Collapse all whitespace runs to single spaces and trim each line.
    Fuzzy,
}

/// Normalize text according to the requested match mode.
fn normalize(text: &str, mode: MatchMode) -> String {
    match mode {
        MatchMode::Exact => text.to_string(),
        MatchMode::TrimTrailing => text
            .lines()
            .map(|l| l.trim_end())
            .collect::<Vec<_>>()
            .join("\n"),
        MatchMode::Fuzzy => text
            .lines()
            .map(|l| l.split_whitespace().collect::<Vec<_>>().join(" "))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

// ============================================================================
// Diff
// ============================================================================

/// Compute a simple line-by-line diff between two text strings.
///
/// Lines prefixed with ` ` are identical, `-` only in `expected`, `+` only
/// in `actual`. Returns an empty string when the inputs are identical.
pub fn diff_text(expected: &str, actual: &str) -> String {
    let expected_lines: Vec<&str> = expected.lines().collect();
    let actual_lines: Vec<&str> = actual.lines().collect();

    let max_lines = expected_lines.len().max(actual_lines.len());
    let mut out = String::new();
    let mut has_diff = false;

    for i in 0..max_lines {
        let exp = expected_lines.get(i).copied();
        let act = actual_lines.get(i).copied();

        // Writing into a String cannot fail.
        let _ = match (exp, act) {
            (Some(e), Some(a)) if e == a => writeln!(out, " {e}"),
            (Some(e), Some(a)) => {
                has_diff = true;
                writeln!(out, "-{e}\n+{a}")
            }
            (Some(e), None) => {
                has_diff = true;
                writeln!(out, "-{e}")
            }
            (None, Some(a)) => {
                has_diff = true;
                writeln!(out, "+{a}")
            }
            (None, None) => Ok(()),
        };
    }

    if has_diff { out } else { String::new() }
}

// ============================================================================
// Snapshot Assertion
// ============================================================================

/// Default render width for snapshots.
pub const SNAPSHOT_WIDTH: u16 = 40;

/// Resolve the snapshot file path.
fn snapshot_path(base_dir: &Path, name: &str) -> PathBuf {
    base_dir
        .join("tests")
        .join("snapshots")
        .join(format!("{name}.snap"))
}

/// Check if the `BLESS` environment variable is set.
fn is_bless() -> bool {
    std::env::var("BLESS").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Assert that a view's text rendering matches a stored snapshot.
///
/// # Arguments
///
/// * `name`     – Snapshot identifier (used as the `.snap` filename).
/// * `view`     – The view to compare, rendered [`SNAPSHOT_WIDTH`] cells wide.
/// * `base_dir` – Root directory for snapshot storage (use `env!("CARGO_MANIFEST_DIR")`).
/// * `mode`     – How to compare the text.
///
/// # Panics
///
/// * If the snapshot file does not exist and `BLESS=1` is **not** set.
/// * If the rendering does not match the stored snapshot.
pub fn assert_view_snapshot(name: &str, view: &ComboboxView, base_dir: &str, mode: MatchMode) {
    let path = snapshot_path(Path::new(base_dir), name);
    let actual = view_to_text(view, SNAPSHOT_WIDTH);

    if is_bless() {
        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            panic!("failed to create snapshot directory {}: {e}", parent.display());
        }
        if let Err(e) = std::fs::write(&path, &actual) {
            panic!("failed to write snapshot {}: {e}", path.display());
        }
        return;
    }

    match std::fs::read_to_string(&path) {
        Ok(expected) => {
            let norm_expected = normalize(&expected, mode);
            let norm_actual = normalize(&actual, mode);

            if norm_expected != norm_actual {
                let diff = diff_text(&norm_expected, &norm_actual);
                panic!(
                    "\n\
                     === Snapshot mismatch: '{name}' ===\n\
                     File: {}\n\
                     Mode: {mode:?}\n\
                     Set BLESS=1 to update.\n\n\
                     Diff (- expected, + actual):\n{diff}",
                    path.display()
                );
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            panic!(
                "\n\
                 === No snapshot found: '{name}' ===\n\
                 Expected at: {}\n\
                 Run with BLESS=1 to create it.\n\n\
                 Actual output:\n{actual}",
                path.display(),
            );
        }
        Err(e) => {
            panic!("Failed to read snapshot '{}': {e}", path.display());
        }
    }
}

/// Assert that a view matches a stored snapshot.
///
/// Uses `CARGO_MANIFEST_DIR` to locate the snapshot directory automatically.
///
/// ```ignore
/// // Default mode: TrimTrailing
/// assert_snapshot!("lia_open", &view);
///
/// // Explicit mode
/// assert_snapshot!("lia_open", &view, MatchMode::Exact);
/// ```
#[macro_export]
macro_rules! assert_snapshot {
    ($name:expr, $view:expr) => {
        $crate::assert_view_snapshot(
            $name,
            $view,
            env!("CARGO_MANIFEST_DIR"),
            $crate::MatchMode::TrimTrailing,
        )
    };
    ($name:expr, $view:expr, $mode:expr) => {
        $crate::assert_view_snapshot($name, $view, env!("CARGO_MANIFEST_DIR"), $mode)
    };
}
