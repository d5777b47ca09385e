#![forbid(unsafe_code)]

//! Scripted page host.
//!
//! A [`Session`] lays out a small page the way the reference form does:
//!
//! ```text
//! row 0  a11y-autocomplete                       <- heading (not focusable)
//! row 2  [field.............................][v]  [Submit]
//! row 3+ popup rows, over whatever is below
//! ```
//!
//! Pointer input is hit-tested against that page. Clicks inside the widget
//! go to it directly; every other click is broadcast to the document
//! listeners, which is how the combobox learns that focus left it. Keyboard
//! input goes to whatever holds focus. Tab cycles field, submit button,
//! page (nothing focused) and back to the field; Shift+Tab runs the other way.
//!
//! Each high-level call appends one JSON object to the transcript.

use combo_core::event::{Event, KeyCode, KeyEvent};
use combo_core::geometry::Rect;
use combo_widgets::{
    Combobox, ComboboxAction, ComboboxConfig, ComboboxView, DocumentListeners, Focus,
    RecordingNotifier, ReferenceList, SubmitOutcome,
};
use serde_json::{Value, json};

use crate::countries::COUNTRIES;
use crate::script::{self, ScriptError};

/// Page heading.
pub const HEADING: &str = "a11y-autocomplete";
/// Submit button label.
pub const SUBMIT_LABEL: &str = "[Submit]";
/// Width of the combobox, toggle included.
pub const FIELD_WIDTH: u16 = 40;

const HEADING_ROW: u16 = 0;
const FIELD_ROW: u16 = 2;

/// Which page element has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageFocus {
    /// Nothing focusable (the document body).
    None,
    /// The combobox text field.
    Input,
    /// The text field, with a popup row driving keyboard input.
    Listbox,
    /// The submit button.
    SubmitButton,
}

/// A page with a heading, one combobox and a submit button.
#[derive(Debug)]
pub struct Session {
    combobox: Combobox,
    listeners: DocumentListeners,
    alerts: RecordingNotifier,
    submit_focused: bool,
    transcript: Vec<Value>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Page with the country list and default configuration.
    pub fn new() -> Self {
        Self::with_config(ComboboxConfig::default())
    }

    /// Page with the country list and `config`.
    pub fn with_config(config: ComboboxConfig) -> Self {
        Self::with_reference(ReferenceList::new(COUNTRIES.iter().copied()), config)
    }

    /// Page with a custom reference list.
    pub fn with_reference(reference: ReferenceList, config: ComboboxConfig) -> Self {
        let listeners = DocumentListeners::new();
        let mut combobox = Combobox::new(reference, config);
        combobox.set_area(Self::field_area());
        combobox.mount(&listeners);
        Self {
            combobox,
            listeners,
            alerts: RecordingNotifier::new(),
            submit_focused: false,
            transcript: Vec::new(),
        }
    }

    /// Where the combobox sits on the page.
    pub fn field_area() -> Rect {
        Rect::new(0, FIELD_ROW, FIELD_WIDTH, 1)
    }

    /// Where the submit button sits on the page.
    pub fn submit_area() -> Rect {
        Rect::new(FIELD_WIDTH + 2, FIELD_ROW, SUBMIT_LABEL.len() as u16, 1)
    }

    /// Where the heading sits on the page.
    pub fn heading_area() -> Rect {
        Rect::new(0, HEADING_ROW, HEADING.len() as u16, 1)
    }

    // --- Inspection ---

    /// The widget under test.
    pub fn combobox(&self) -> &Combobox {
        &self.combobox
    }

    /// Current view of the widget.
    pub fn view(&self) -> ComboboxView {
        self.combobox.view()
    }

    /// The page's document listener registry.
    pub fn listeners(&self) -> &DocumentListeners {
        &self.listeners
    }

    /// Element holding keyboard focus.
    pub fn focused(&self) -> PageFocus {
        if self.submit_focused {
            return PageFocus::SubmitButton;
        }
        match self.combobox.focus() {
            Focus::Outside => PageFocus::None,
            Focus::Input => PageFocus::Input,
            Focus::Listbox => PageFocus::Listbox,
        }
    }

    /// Alerts shown so far, oldest first.
    pub fn alerts(&self) -> &[String] {
        self.alerts.messages()
    }

    /// Texts of the popup rows currently on screen.
    pub fn visible_rows(&self) -> Vec<String> {
        self.view()
            .listbox
            .visible_rows()
            .iter()
            .map(|r| r.text.clone())
            .collect()
    }

    /// One JSON object per line, one line per action.
    pub fn transcript_jsonl(&self) -> String {
        let mut out = String::new();
        for entry in &self.transcript {
            out.push_str(&entry.to_string());
            out.push('\n');
        }
        out
    }

    // --- Actions ---

    /// Type a keystroke script into the field, clicking it first if it
    /// does not have focus.
    pub fn type_text(&mut self, keys: &str) -> Result<(), ScriptError> {
        let events = script::parse(keys)?;
        if !self.combobox.focus().is_within() {
            self.pointer(Self::field_area().x, FIELD_ROW);
        }
        for event in &events {
            self.key(event);
        }
        self.record("type", json!(keys));
        Ok(())
    }

    /// Press one key on whatever has focus.
    pub fn press(&mut self, code: KeyCode) {
        self.key(&Event::key(code));
        self.record("press", json!(format!("{code:?}")));
    }

    /// Press Tab (or Shift+Tab).
    pub fn tab(&mut self, backwards: bool) {
        let event = if backwards {
            Event::key(KeyCode::BackTab)
        } else {
            Event::key(KeyCode::Tab)
        };
        self.key(&event);
        self.record("tab", json!(backwards));
    }

    /// Click the text field.
    pub fn click_input(&mut self) {
        self.pointer(Self::field_area().x, FIELD_ROW);
        self.record("click", json!("input"));
    }

    /// Click the popup toggle.
    pub fn click_toggle(&mut self) {
        let area = Self::field_area();
        self.pointer(area.right().saturating_sub(2), FIELD_ROW);
        self.record("click", json!("toggle"));
    }

    /// Click popup row `row` (index into the match list).
    ///
    /// Rows outside the scroll window, or a hidden popup, cannot be clicked.
    /// Returns `false` in that case.
    pub fn click_row(&mut self, row: usize) -> bool {
        let view = self.view();
        let start = view.listbox.scroll_offset;
        let shown = view.listbox.visible_rows().len();
        if row < start || row >= start + shown {
            self.record("click", json!({ "row": row, "clickable": false }));
            return false;
        }
        let y = FIELD_ROW + 1 + (row - start) as u16;
        self.pointer(Self::field_area().x + 1, y);
        self.record("click", json!({ "row": row }));
        true
    }

    /// Click the page heading.
    pub fn click_heading(&mut self) {
        let area = Self::heading_area();
        self.pointer(area.x, area.y);
        self.record("click", json!("heading"));
    }

    /// Click the submit button.
    pub fn click_submit(&mut self) -> SubmitOutcome {
        let area = Self::submit_area();
        self.pointer(area.x, area.y);
        let outcome = self.activate_submit();
        self.record("click", json!("submit"));
        outcome
    }

    /// Click an arbitrary page cell. Landing on the submit button submits.
    pub fn click_at(&mut self, x: u16, y: u16) -> Option<SubmitOutcome> {
        self.pointer(x, y);
        let outcome = Self::submit_area()
            .contains(x, y)
            .then(|| self.activate_submit());
        self.record("click", json!({ "x": x, "y": y }));
        outcome
    }

    /// Deliver a raw host event: keys, paste, left clicks, window focus.
    pub fn send(&mut self, event: &Event) {
        match event {
            Event::Mouse(mouse) if event.is_click() => {
                self.click_at(mouse.x, mouse.y);
                return;
            }
            Event::Focus(gained) => {
                self.window_focus(*gained);
                return;
            }
            Event::Key(_) => self.key(event),
            Event::Paste(_) if self.combobox.focus().is_within() => {
                let action = self.combobox.handle_event(event);
                self.apply(action);
            }
            _ => return,
        }
        self.record("event", json!(format!("{event:?}")));
    }

    /// Deliver a window focus change.
    pub fn window_focus(&mut self, gained: bool) {
        if !gained {
            self.combobox.handle_event(&Event::Focus(false));
            self.submit_focused = false;
        }
        self.record("window_focus", json!(gained));
    }

    // --- Routing ---

    fn pointer(&mut self, x: u16, y: u16) {
        let click = Event::click(x, y);
        let inside = self
            .combobox
            .layout()
            .is_some_and(|l| l.owns(x, y, self.combobox.is_open()));

        if inside {
            self.submit_focused = false;
            let action = self.combobox.handle_event(&click);
            self.apply(action);
            return;
        }

        for id in self.listeners.subscribers() {
            if self.combobox.subscriber_id() == Some(id) {
                let action = self.combobox.handle_event(&click);
                self.apply(action);
            }
        }
        self.submit_focused = Self::submit_area().contains(x, y);
    }

    fn key(&mut self, event: &Event) {
        let Event::Key(key) = event else {
            return;
        };
        if self.submit_focused {
            self.submit_key(key);
        } else if self.combobox.focus().is_within() {
            let action = self.combobox.handle_event(event);
            self.apply(action);
        } else {
            self.page_key(key);
        }
    }

    /// Keys while nothing on the page has focus: Tab enters at the field,
    /// Shift+Tab at the submit button.
    fn page_key(&mut self, key: &KeyEvent) {
        if !key.is_press() {
            return;
        }
        match key.code {
            KeyCode::BackTab => self.submit_focused = true,
            KeyCode::Tab if key.shift() => self.submit_focused = true,
            KeyCode::Tab => self.focus_field(),
            _ => {}
        }
    }

    fn submit_key(&mut self, key: &KeyEvent) {
        if !key.is_press() {
            return;
        }
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.activate_submit();
            }
            KeyCode::BackTab => self.focus_field(),
            KeyCode::Tab if key.shift() => self.focus_field(),
            KeyCode::Tab => self.submit_focused = false,
            _ => {}
        }
    }

    fn focus_field(&mut self) {
        self.submit_focused = false;
        self.combobox.focus_field();
    }

    fn activate_submit(&mut self) -> SubmitOutcome {
        self.combobox.submit(&mut self.alerts)
    }

    fn apply(&mut self, action: Option<ComboboxAction>) {
        match action {
            Some(ComboboxAction::FocusNext) => self.submit_focused = true,
            Some(ComboboxAction::FocusPrevious | ComboboxAction::Blurred) => {
                self.submit_focused = false;
            }
            Some(ComboboxAction::Committed(_)) | None => {}
        }
    }

    fn record(&mut self, action: &str, detail: Value) {
        let view = self.view();
        let entry = json!({
            "step": self.transcript.len(),
            "action": action,
            "detail": detail,
            "text": self.combobox.text(),
            "state": self.combobox.nav_state().to_string(),
            "focus": format!("{:?}", self.focused()),
            "rows": view.listbox.visible_rows().len(),
            "alerts": self.alerts.messages().len(),
        });
        self.transcript.push(entry);
    }
}
