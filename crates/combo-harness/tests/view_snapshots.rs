#![forbid(unsafe_code)]

//! Integration tests: text snapshots of the rendered combobox.
//!
//! Run `BLESS=1 cargo test --package combo-harness` to create/update snapshots.

use combo_core::event::KeyCode;
use combo_harness::{Session, assert_snapshot};
use combo_widgets::ComboboxConfig;

fn typed(script: &str) -> Session {
    let mut session = Session::new();
    session.type_text(script).expect("valid script");
    session
}

// ============================================================================
// Closed
// ============================================================================

#[test]
fn snapshot_initial_closed() {
    let session = Session::new();
    assert_snapshot!("initial_closed", &session.view());
}

#[test]
fn snapshot_committed_closed() {
    let session = typed("united{downarrow}{enter}");
    assert_snapshot!("committed_closed", &session.view());
}

// ============================================================================
// Open
// ============================================================================

#[test]
fn snapshot_united_open() {
    let session = typed("united");
    assert_snapshot!("united_open", &session.view());
}

#[test]
fn snapshot_united_second_highlighted() {
    let session = typed("united{downarrow}{downarrow}");
    assert_snapshot!("united_second_highlighted", &session.view());
}

#[test]
fn snapshot_no_results() {
    let session = typed("xx");
    assert_snapshot!("no_results", &session.view());
}

#[test]
fn snapshot_scrolled_window() {
    let mut session = Session::with_config(ComboboxConfig::default().with_max_visible_rows(2));
    session.type_text("lia").expect("valid script");
    for _ in 0..3 {
        session.press(KeyCode::Down);
    }
    assert_snapshot!("lia_scrolled", &session.view());
}
