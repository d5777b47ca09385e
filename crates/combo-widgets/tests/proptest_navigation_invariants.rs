//! Property-based invariant tests for the combobox state machine.
//!
//! 1. A highlight always points at a real match (never the sentinel).
//! 2. At most one rendered row is selected, and it is the highlighted one.
//! 3. The same event sequence from a fresh widget yields the same state.
//! 4. Filter results keep reference order and every result contains the query.
//! 5. Zero matches is always the single "No results" row.
//! 6. ArrowDown never wraps; ArrowUp at row 0 closes with focus on the field.
//! 7. The highlighted row is always inside the scroll window.

use combo_core::event::{Event, KeyCode};
use combo_widgets::{
    Combobox, ComboboxConfig, Focus, MatchList, NO_RESULTS_LABEL, NavState, ReferenceList,
    RowKind,
};
use proptest::prelude::*;

const ENTRIES: &[&str] = &[
    "Australia",
    "Austria",
    "Mongolia",
    "Somalia",
    "Tanzania, United Republic of",
    "United Arab Emirates",
    "United Kingdom",
    "United States",
    "United States Minor Outlying Islands",
    "Zambia",
];

fn reference() -> ReferenceList {
    ReferenceList::new(ENTRIES.iter().copied())
}

fn combo(max_rows: usize) -> Combobox {
    Combobox::new(
        reference(),
        ComboboxConfig::default().with_max_visible_rows(max_rows),
    )
}

#[derive(Debug, Clone)]
enum Op {
    Key(KeyCode),
    ClickInput,
    ClickToggle,
    ClickRow(usize),
    ClickOutside,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => prop::sample::select(vec!['a', 'u', 'n', 'i', 't', 'e', 'd', 'l', 'x', ' '])
            .prop_map(|c| Op::Key(KeyCode::Char(c))),
        4 => Just(Op::Key(KeyCode::Down)),
        2 => Just(Op::Key(KeyCode::Up)),
        1 => Just(Op::Key(KeyCode::Enter)),
        1 => Just(Op::Key(KeyCode::Escape)),
        1 => Just(Op::Key(KeyCode::Tab)),
        1 => Just(Op::Key(KeyCode::Backspace)),
        1 => Just(Op::ClickInput),
        1 => Just(Op::ClickToggle),
        1 => (0usize..12).prop_map(Op::ClickRow),
        1 => Just(Op::ClickOutside),
    ]
}

fn apply(combo: &mut Combobox, op: &Op) {
    match op {
        Op::Key(code) => {
            combo.handle_event(&Event::key(*code));
        }
        Op::ClickInput => {
            combo.click_input();
        }
        Op::ClickToggle => {
            combo.click_toggle();
        }
        Op::ClickRow(row) => {
            combo.click_row(*row);
        }
        Op::ClickOutside => {
            combo.click_outside();
        }
    }
}

fn check_invariants(combo: &Combobox) -> Result<(), TestCaseError> {
    let view = combo.view();

    // 1
    if let NavState::OpenSelected(i) = combo.nav_state() {
        prop_assert!(!combo.match_list().is_sentinel(), "highlight over sentinel");
        prop_assert!(i < combo.match_list().navigable_len(), "highlight {} out of range", i);
        prop_assert_eq!(combo.focus(), Focus::Listbox);
    }

    // 2
    let selected: Vec<usize> = view
        .listbox
        .rows
        .iter()
        .enumerate()
        .filter(|(_, r)| r.selected)
        .map(|(i, _)| i)
        .collect();
    prop_assert!(selected.len() <= 1);
    prop_assert_eq!(selected.first().copied(), combo.highlighted());
    prop_assert_eq!(view.listbox.hidden, !combo.is_open());
    prop_assert_eq!(view.input.value.as_str(), combo.text());

    // 7
    if let Some(h) = combo.highlighted() {
        let start = view.listbox.scroll_offset;
        prop_assert!(h >= start && h < start + view.listbox.max_visible_rows);
    }
    Ok(())
}

proptest! {
    #[test]
    fn invariants_hold_after_every_event(ops in prop::collection::vec(op_strategy(), 0..60), rows in 1usize..6) {
        let mut c = combo(rows);
        check_invariants(&c)?;
        for op in &ops {
            apply(&mut c, op);
            check_invariants(&c)?;
        }
    }

    #[test]
    fn replay_is_deterministic(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut a = combo(8);
        let mut b = combo(8);
        for op in &ops {
            apply(&mut a, op);
        }
        for op in &ops {
            apply(&mut b, op);
        }
        prop_assert_eq!(a.text(), b.text());
        prop_assert_eq!(a.nav_state(), b.nav_state());
        prop_assert_eq!(a.focus(), b.focus());
        prop_assert_eq!(a.view(), b.view());
    }

    #[test]
    fn filter_keeps_order_and_containment(query in "[a-zA-Z ,]{0,6}") {
        let refs = reference();
        match refs.filter(&query) {
            MatchList::Matches(hits) => {
                prop_assert!(!hits.is_empty());
                prop_assert!(hits.windows(2).all(|w| w[0] < w[1]));
                let needle = query.to_lowercase();
                for &i in &hits {
                    let entry = refs.get(i).unwrap_or_default();
                    prop_assert!(entry.to_lowercase().contains(&needle), "{} !~ {}", entry, query);
                }
                let missed = refs
                    .iter()
                    .enumerate()
                    .filter(|(i, e)| !hits.contains(i) && e.to_lowercase().contains(&needle))
                    .count();
                prop_assert_eq!(missed, 0);
            }
            MatchList::NoResults => {
                let needle = query.to_lowercase();
                prop_assert!(refs.iter().all(|e| !e.to_lowercase().contains(&needle)));
            }
        }
    }

    #[test]
    fn zero_matches_render_one_sentinel_row(query in "[qxz]{2,5}") {
        let mut c = combo(8);
        for ch in query.chars() {
            c.handle_event(&Event::key(KeyCode::Char(ch)));
        }
        // No entry has two of q/x/z in a row.
        prop_assume!(c.match_list().is_sentinel());
        let view = c.view();
        prop_assert_eq!(view.listbox.rows.len(), 1);
        prop_assert_eq!(view.listbox.rows[0].text.as_str(), NO_RESULTS_LABEL);
        prop_assert_eq!(view.listbox.rows[0].kind, RowKind::NoResults);
        prop_assert!(c.is_open());
    }

    #[test]
    fn arrow_boundaries(presses in 1usize..20) {
        let mut c = combo(3);
        for ch in "united".chars() {
            c.handle_event(&Event::key(KeyCode::Char(ch)));
        }
        let n = c.match_list().navigable_len();
        for _ in 0..presses {
            c.handle_event(&Event::key(KeyCode::Down));
        }
        prop_assert_eq!(c.highlighted(), Some((presses - 1).min(n - 1)));

        for _ in 0..presses {
            c.handle_event(&Event::key(KeyCode::Up));
        }
        prop_assert_eq!(c.nav_state(), NavState::Closed);
        prop_assert_eq!(c.focus(), Focus::Input);
        prop_assert_eq!(c.text(), "united");
    }
}
