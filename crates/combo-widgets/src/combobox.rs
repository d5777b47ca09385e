#![forbid(unsafe_code)]

//! The combobox widget.
//!
//! Wires the text field, filter engine and navigator together and exposes
//! them through [`Combobox::handle_event`] plus direct methods that mirror
//! DOM interactions (`click_input`, `click_row`, `submit`, ...).
//!
//! # Example
//!
//! ```
//! use combo_core::event::{Event, KeyCode};
//! use combo_widgets::{Combobox, ComboboxConfig, ReferenceList};
//!
//! let reference = ReferenceList::new(["Australia", "Austria", "Mongolia", "Somalia"]);
//! let mut combo = Combobox::new(reference, ComboboxConfig::default());
//!
//! combo.set_text("lia");
//! assert_eq!(combo.matches(), vec!["Australia", "Mongolia", "Somalia"]);
//!
//! combo.handle_event(&Event::key(KeyCode::Down));
//! combo.handle_event(&Event::key(KeyCode::Enter));
//! assert_eq!(combo.text(), "Australia");
//! assert!(!combo.is_open());
//! ```

use combo_core::event::{Event, KeyCode, KeyEvent, MouseButton, MouseEventKind};
use combo_core::geometry::Rect;

use crate::config::ComboboxConfig;
use crate::filter::{MatchList, ReferenceList};
use crate::layout::{ComboboxLayout, Hit};
use crate::navigation::{Focus, NavState, Navigator};
use crate::submit::{Notifier, SubmitOutcome};
use crate::subscription::{DocumentListeners, DocumentSubscription, SubscriberId};
use crate::text_field::TextField;
use crate::view::{ComboboxParts, ComboboxView, render};

/// What the host should do after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComboboxAction {
    /// A row was committed into the field.
    Committed(String),
    /// Tab: move focus to the next focusable element.
    FocusNext,
    /// Shift+Tab: move focus to the previous focusable element.
    FocusPrevious,
    /// Focus left the widget (outside click or window blur).
    Blurred,
}

/// Accessible combobox over a fixed reference list.
#[derive(Debug)]
pub struct Combobox {
    reference: ReferenceList,
    config: ComboboxConfig,
    field: TextField,
    nav: Navigator,
    matches: MatchList,
    scroll_offset: usize,
    area: Option<Rect>,
    subscription: Option<DocumentSubscription>,
}

impl Combobox {
    /// Create an empty, closed combobox.
    pub fn new(reference: ReferenceList, config: ComboboxConfig) -> Self {
        let matches = reference.filter("");
        Self {
            reference,
            config,
            field: TextField::new(),
            nav: Navigator::new(),
            matches,
            scroll_offset: 0,
            area: None,
            subscription: None,
        }
    }

    // --- Accessors ---

    /// Current field text.
    pub fn text(&self) -> &str {
        self.field.value()
    }

    /// Caret position (grapheme index).
    pub fn cursor(&self) -> usize {
        self.field.cursor()
    }

    /// Navigation state.
    pub fn nav_state(&self) -> NavState {
        self.nav.state()
    }

    /// Logical focus.
    pub fn focus(&self) -> Focus {
        self.nav.focus()
    }

    /// Highlighted row, if any.
    pub fn highlighted(&self) -> Option<usize> {
        self.nav.state().highlighted()
    }

    /// True while the popup is visible.
    pub fn is_open(&self) -> bool {
        self.nav.state().is_open()
    }

    /// Match list for the current text.
    pub fn match_list(&self) -> &MatchList {
        &self.matches
    }

    /// Row labels for the current text ("No results" for the sentinel).
    pub fn matches(&self) -> Vec<&str> {
        self.matches.labels(&self.reference)
    }

    /// The reference list.
    pub fn reference(&self) -> &ReferenceList {
        &self.reference
    }

    /// Configuration.
    pub fn config(&self) -> &ComboboxConfig {
        &self.config
    }

    /// First popup row inside the scroll window.
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Current view description.
    pub fn view(&self) -> ComboboxView {
        render(&ComboboxParts {
            config: &self.config,
            reference: &self.reference,
            text: self.field.value(),
            matches: &self.matches,
            state: self.nav.state(),
            focus: self.nav.focus(),
            scroll_offset: self.scroll_offset,
        })
    }

    // --- Geometry ---

    /// Place the widget; needed for pointer events.
    pub fn set_area(&mut self, anchor: Rect) {
        self.area = Some(anchor);
    }

    /// Layout for the current frame, if an area was set.
    pub fn layout(&self) -> Option<ComboboxLayout> {
        let anchor = self.area?;
        let visible = if self.is_open() {
            self.matches
                .row_count()
                .saturating_sub(self.scroll_offset)
                .min(self.max_visible())
        } else {
            0
        };
        let layout = ComboboxLayout::compute(anchor, visible);
        Some(if self.config.show_toggle {
            layout
        } else {
            layout.without_toggle()
        })
    }

    // --- Document subscription ---

    /// Start listening for page-level pointer events.
    pub fn mount(&mut self, listeners: &DocumentListeners) -> SubscriberId {
        let subscription = listeners.subscribe(self.config.id.clone());
        let id = subscription.id();
        self.subscription = Some(subscription);
        id
    }

    /// Stop listening for page-level pointer events.
    pub fn unmount(&mut self) {
        self.subscription = None;
    }

    /// Id of the live subscription, if mounted.
    pub fn subscriber_id(&self) -> Option<SubscriberId> {
        self.subscription
            .as_ref()
            .filter(|sub| sub.is_active())
            .map(DocumentSubscription::id)
    }

    // --- Events ---

    /// Handle an input event routed to the widget.
    pub fn handle_event(&mut self, event: &Event) -> Option<ComboboxAction> {
        let span = combo_core::debug_span!("combobox.handle_event", state = %self.nav.state());
        let _guard = span.enter();

        match event {
            Event::Key(key) if key.is_press() => self.handle_key(key),
            Event::Paste(paste) => {
                if self.field.insert_str(&paste.text) {
                    self.on_text_changed();
                }
                None
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                self.handle_click(mouse.x, mouse.y)
            }
            Event::Focus(false) => self.click_outside(),
            _ => None,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Option<ComboboxAction> {
        if key.ctrl() {
            if key.is_char('u') && self.field.clear() {
                self.on_text_changed();
            }
            return None;
        }

        match key.code {
            KeyCode::Down => {
                let navigable = self.matches.navigable_len();
                if self.nav.arrow_down(navigable) {
                    self.adjust_scroll();
                    combo_core::debug!(event = "arrow_down", to = %self.nav.state());
                }
                None
            }
            KeyCode::Up => {
                if self.nav.arrow_up() {
                    self.adjust_scroll();
                    combo_core::debug!(event = "arrow_up", to = %self.nav.state());
                }
                None
            }
            KeyCode::Enter => self.commit_highlighted(),
            KeyCode::Char(' ') => {
                if self.highlighted().is_some() {
                    self.commit_highlighted()
                } else if self.field.is_empty() && !self.is_open() {
                    None
                } else {
                    self.insert(' ')
                }
            }
            KeyCode::Char(c) if !key.alt() => self.insert(c),
            KeyCode::Escape => {
                self.nav.escape();
                None
            }
            KeyCode::Tab if key.shift() => {
                self.nav.tab();
                Some(ComboboxAction::FocusPrevious)
            }
            KeyCode::Tab => {
                self.nav.tab();
                Some(ComboboxAction::FocusNext)
            }
            KeyCode::BackTab => {
                self.nav.tab();
                Some(ComboboxAction::FocusPrevious)
            }
            KeyCode::Backspace => {
                if self.field.delete_back() {
                    self.on_text_changed();
                }
                None
            }
            KeyCode::Delete => {
                if self.field.delete_forward() {
                    self.on_text_changed();
                }
                None
            }
            KeyCode::Left => {
                self.field.move_left();
                None
            }
            KeyCode::Right => {
                self.field.move_right();
                None
            }
            KeyCode::Home => {
                self.field.move_home();
                None
            }
            KeyCode::End => {
                self.field.move_end();
                None
            }
            _ => None,
        }
    }

    fn handle_click(&mut self, x: u16, y: u16) -> Option<ComboboxAction> {
        let hit = self
            .layout()
            .map_or(Hit::Outside, |l| l.hit_test(x, y, self.is_open(), self.scroll_offset));
        match hit {
            Hit::Input => self.click_input(),
            Hit::Toggle => self.click_toggle(),
            Hit::Row(row) => self.click_row(row),
            Hit::Outside if self.subscriber_id().is_some() => self.click_outside(),
            Hit::Outside => None,
        }
    }

    // --- DOM-style interactions ---

    /// Replace the text as if the user had edited the field.
    pub fn set_text(&mut self, text: &str) -> Option<ComboboxAction> {
        if self.field.set_value(text) {
            self.on_text_changed();
        }
        None
    }

    /// Click on the text field.
    pub fn click_input(&mut self) -> Option<ComboboxAction> {
        if self.nav.open() {
            self.adjust_scroll();
            combo_core::debug!(event = "click_input", to = %self.nav.state());
        }
        None
    }

    /// Keyboard focus moved onto the field without a click.
    pub fn focus_field(&mut self) {
        self.nav.focus_input();
    }

    /// Click on the popup toggle.
    pub fn click_toggle(&mut self) -> Option<ComboboxAction> {
        if !self.config.show_toggle {
            return None;
        }
        if self.nav.toggle() {
            self.adjust_scroll();
            combo_core::debug!(event = "click_toggle", to = %self.nav.state());
        }
        None
    }

    /// Click on popup row `row` (absolute index into the match list).
    pub fn click_row(&mut self, row: usize) -> Option<ComboboxAction> {
        if !self.is_open() {
            return None;
        }
        self.commit(row)
    }

    /// Pointer or focus moved outside the widget.
    pub fn click_outside(&mut self) -> Option<ComboboxAction> {
        let was_engaged = self.focus().is_within() || self.is_open();
        self.nav.blur();
        if was_engaged {
            combo_core::debug!(event = "blur", to = %self.nav.state());
            Some(ComboboxAction::Blurred)
        } else {
            None
        }
    }

    /// Validate the field and report the outcome through `notifier`.
    ///
    /// Calls `notify` exactly once and leaves the text untouched.
    pub fn submit(&self, notifier: &mut impl Notifier) -> SubmitOutcome {
        let outcome =
            SubmitOutcome::validate(self.field.value(), |v| self.reference.contains_exact(v));
        combo_core::info!(
            value = self.field.value(),
            accepted = outcome.is_accepted(),
            "combobox submitted"
        );
        notifier.notify(&outcome.message());
        outcome
    }

    // --- Internals ---

    fn insert(&mut self, c: char) -> Option<ComboboxAction> {
        if self.field.insert_char(c) {
            self.on_text_changed();
        }
        None
    }

    fn on_text_changed(&mut self) {
        self.matches = self.reference.filter(self.field.value());
        self.nav.text_changed();
        self.scroll_offset = 0;
        combo_core::debug!(
            event = "text_changed",
            to = %self.nav.state(),
            rows = self.matches.row_count()
        );
    }

    fn commit_highlighted(&mut self) -> Option<ComboboxAction> {
        let row = self.highlighted()?;
        self.commit(row)
    }

    fn commit(&mut self, row: usize) -> Option<ComboboxAction> {
        let entry = self
            .matches
            .entry_index(row)
            .and_then(|i| self.reference.get(i))?
            .to_string();
        self.field.set_value(entry.as_str());
        self.matches = self.reference.filter(&entry);
        self.nav.close_to_input();
        self.scroll_offset = 0;
        combo_core::info!(entry = entry.as_str(), row, "combobox committed");
        Some(ComboboxAction::Committed(entry))
    }

    fn max_visible(&self) -> usize {
        self.config.max_visible_rows.max(1)
    }

    fn adjust_scroll(&mut self) {
        let visible = self.max_visible();
        match self.highlighted() {
            Some(row) if row < self.scroll_offset => self.scroll_offset = row,
            Some(row) if row >= self.scroll_offset + visible => {
                self.scroll_offset = row + 1 - visible;
            }
            Some(_) => {}
            None => {
                let max_offset = self.matches.row_count().saturating_sub(visible);
                self.scroll_offset = self.scroll_offset.min(max_offset);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submit::RecordingNotifier;
    use combo_core::event::{KeyEventKind, Modifiers, PasteEvent};

    fn combo() -> Combobox {
        Combobox::new(
            ReferenceList::new([
                "Australia",
                "Austria",
                "Mongolia",
                "Somalia",
                "United Kingdom",
                "United States",
            ]),
            ComboboxConfig::default(),
        )
    }

    fn key(combo: &mut Combobox, code: KeyCode) -> Option<ComboboxAction> {
        combo.handle_event(&Event::key(code))
    }

    fn type_str(combo: &mut Combobox, text: &str) {
        for c in text.chars() {
            key(combo, KeyCode::Char(c));
        }
    }

    #[test]
    fn mounts_closed_and_empty() {
        let c = combo();
        assert_eq!(c.text(), "");
        assert_eq!(c.nav_state(), NavState::Closed);
        assert_eq!(c.focus(), Focus::Outside);
        assert!(c.view().listbox.hidden);
    }

    #[test]
    fn typing_opens_and_filters() {
        let mut c = combo();
        type_str(&mut c, "lia");
        assert_eq!(c.nav_state(), NavState::OpenUnselected);
        assert_eq!(c.matches(), vec!["Australia", "Mongolia", "Somalia"]);
        assert_eq!(c.focus(), Focus::Input);
    }

    #[test]
    fn typing_nonsense_shows_sentinel() {
        let mut c = combo();
        type_str(&mut c, "xx");
        assert!(c.is_open());
        assert_eq!(c.matches(), vec!["No results"]);
        key(&mut c, KeyCode::Down);
        assert_eq!(c.nav_state(), NavState::OpenUnselected);
        assert_eq!(key(&mut c, KeyCode::Enter), None);
        assert_eq!(c.text(), "xx");
    }

    #[test]
    fn arrow_down_on_empty_field_shows_everything() {
        let mut c = combo();
        key(&mut c, KeyCode::Down);
        assert_eq!(c.nav_state(), NavState::OpenSelected(0));
        assert_eq!(c.matches().len(), 6);
    }

    #[test]
    fn enter_commits_highlight() {
        let mut c = combo();
        type_str(&mut c, "united");
        key(&mut c, KeyCode::Down);
        key(&mut c, KeyCode::Down);
        let action = key(&mut c, KeyCode::Enter);
        assert_eq!(
            action,
            Some(ComboboxAction::Committed("United States".into()))
        );
        assert_eq!(c.text(), "United States");
        assert_eq!(c.nav_state(), NavState::Closed);
        assert_eq!(c.focus(), Focus::Input);
    }

    #[test]
    fn space_commits_without_inserting() {
        let mut c = combo();
        type_str(&mut c, "lia");
        key(&mut c, KeyCode::Down);
        key(&mut c, KeyCode::Char(' '));
        assert_eq!(c.text(), "Australia");
        assert!(!c.is_open());
    }

    #[test]
    fn space_on_empty_closed_field_is_noop() {
        let mut c = combo();
        key(&mut c, KeyCode::Char(' '));
        assert_eq!(c.text(), "");
        assert_eq!(c.nav_state(), NavState::Closed);
    }

    #[test]
    fn space_without_highlight_is_text() {
        let mut c = combo();
        type_str(&mut c, "united");
        key(&mut c, KeyCode::Char(' '));
        assert_eq!(c.text(), "united ");
        assert_eq!(c.matches(), vec!["United Kingdom", "United States"]);
    }

    #[test]
    fn escape_keeps_text() {
        let mut c = combo();
        type_str(&mut c, "aus");
        key(&mut c, KeyCode::Down);
        key(&mut c, KeyCode::Escape);
        assert_eq!(c.text(), "aus");
        assert_eq!(c.nav_state(), NavState::Closed);
        assert_eq!(c.focus(), Focus::Input);
    }

    #[test]
    fn tab_closes_and_hands_focus_on() {
        let mut c = combo();
        type_str(&mut c, "aus");
        assert_eq!(key(&mut c, KeyCode::Tab), Some(ComboboxAction::FocusNext));
        assert_eq!(c.nav_state(), NavState::Closed);
        assert_eq!(c.focus(), Focus::Outside);
        let back = Event::Key(KeyEvent::new(KeyCode::Tab).with_modifiers(Modifiers::SHIFT));
        assert_eq!(c.handle_event(&back), Some(ComboboxAction::FocusPrevious));
    }

    #[test]
    fn keystroke_discards_highlight() {
        let mut c = combo();
        type_str(&mut c, "a");
        key(&mut c, KeyCode::Down);
        key(&mut c, KeyCode::Down);
        key(&mut c, KeyCode::Down);
        assert_eq!(c.highlighted(), Some(2));
        type_str(&mut c, "l");
        assert_eq!(c.nav_state(), NavState::OpenUnselected);
    }

    #[test]
    fn release_events_are_ignored() {
        let mut c = combo();
        let release = Event::Key(KeyEvent::new(KeyCode::Char('a')).with_kind(KeyEventKind::Release));
        assert_eq!(c.handle_event(&release), None);
        assert_eq!(c.text(), "");
    }

    #[test]
    fn ctrl_u_clears_and_other_chords_do_nothing() {
        let mut c = combo();
        type_str(&mut c, "aus");
        let ctrl_a = Event::Key(KeyEvent::new(KeyCode::Char('a')).with_modifiers(Modifiers::CTRL));
        c.handle_event(&ctrl_a);
        assert_eq!(c.text(), "aus");
        let ctrl_u = Event::Key(KeyEvent::new(KeyCode::Char('u')).with_modifiers(Modifiers::CTRL));
        c.handle_event(&ctrl_u);
        assert_eq!(c.text(), "");
        assert!(c.is_open());
    }

    #[test]
    fn paste_is_a_text_change() {
        let mut c = combo();
        c.handle_event(&Event::Paste(PasteEvent::new("stan")));
        assert!(c.is_open());
        assert_eq!(c.match_list(), &MatchList::NoResults);
    }

    #[test]
    fn click_row_commits() {
        let mut c = combo();
        type_str(&mut c, "united");
        let action = c.click_row(1);
        assert_eq!(
            action,
            Some(ComboboxAction::Committed("United States".into()))
        );
        assert!(!c.is_open());
    }

    #[test]
    fn click_sentinel_row_is_noop() {
        let mut c = combo();
        type_str(&mut c, "xx");
        assert_eq!(c.click_row(0), None);
        assert!(c.is_open());
    }

    #[test]
    fn click_input_reopens_without_highlight() {
        let mut c = combo();
        c.click_input();
        assert_eq!(c.nav_state(), NavState::OpenUnselected);
        assert_eq!(c.focus(), Focus::Input);
        key(&mut c, KeyCode::Down);
        c.click_input();
        assert_eq!(c.nav_state(), NavState::OpenSelected(0));
    }

    #[test]
    fn toggle_respects_config() {
        let mut c = combo();
        c.click_toggle();
        assert!(c.is_open());
        c.click_toggle();
        assert!(!c.is_open());

        let mut hidden = Combobox::new(
            ReferenceList::new(["A"]),
            ComboboxConfig::default().with_toggle(false),
        );
        hidden.click_toggle();
        assert!(!hidden.is_open());
    }

    #[test]
    fn submit_reports_once_and_keeps_text() {
        let mut c = combo();
        let mut notes = RecordingNotifier::new();
        assert!(!c.submit(&mut notes).is_accepted());
        type_str(&mut c, "united");
        c.click_row(1);
        assert!(c.submit(&mut notes).is_accepted());
        assert_eq!(
            notes.messages(),
            &[
                "Please submit a valid country from the autocomplete.".to_string(),
                "Submitting country United States".to_string(),
            ]
        );
        assert_eq!(c.text(), "United States");
    }

    #[test]
    fn pointer_routing_uses_layout() {
        let mut c = combo();
        c.set_area(Rect::new(0, 0, 20, 1));
        c.handle_event(&Event::click(1, 0));
        assert!(c.is_open());
        // Row 2 is the third popup row: "Mongolia".
        let action = c.handle_event(&Event::click(1, 3));
        assert_eq!(action, Some(ComboboxAction::Committed("Mongolia".into())));
        c.handle_event(&Event::click(18, 0));
        assert!(c.is_open());
    }

    #[test]
    fn outside_clicks_need_a_subscription() {
        let listeners = DocumentListeners::new();
        let mut c = combo();
        c.set_area(Rect::new(0, 0, 20, 1));
        c.click_input();

        assert_eq!(c.handle_event(&Event::click(40, 10)), None);
        assert!(c.is_open());

        c.mount(&listeners);
        assert_eq!(listeners.len(), 1);
        assert_eq!(
            c.handle_event(&Event::click(40, 10)),
            Some(ComboboxAction::Blurred)
        );
        assert!(!c.is_open());
        assert_eq!(c.focus(), Focus::Outside);

        c.unmount();
        assert!(listeners.is_empty());
        assert_eq!(c.subscriber_id(), None);
    }

    #[test]
    fn window_blur_closes() {
        let mut c = combo();
        type_str(&mut c, "a");
        assert_eq!(
            c.handle_event(&Event::Focus(false)),
            Some(ComboboxAction::Blurred)
        );
        assert!(!c.is_open());
        assert_eq!(c.handle_event(&Event::Focus(false)), None);
    }

    #[test]
    fn scroll_follows_highlight() {
        let mut c = Combobox::new(
            ReferenceList::new((0..20).map(|i| format!("Item {i}"))),
            ComboboxConfig::default().with_max_visible_rows(5),
        );
        for _ in 0..8 {
            key(&mut c, KeyCode::Down);
        }
        assert_eq!(c.highlighted(), Some(7));
        assert_eq!(c.scroll_offset(), 3);
        for _ in 0..5 {
            key(&mut c, KeyCode::Up);
        }
        assert_eq!(c.highlighted(), Some(2));
        assert_eq!(c.scroll_offset(), 2);
        type_str(&mut c, "1");
        assert_eq!(c.scroll_offset(), 0);
    }
}
