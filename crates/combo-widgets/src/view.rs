#![forbid(unsafe_code)]

//! Render-from-state.
//!
//! [`render`] turns the widget's state into a [`ComboboxView`]: the field
//! value, whether the popup is hidden, and one [`RowView`] per match with
//! its selected flag. It is a pure function; the combobox calls it after
//! every transition and hosts draw whatever it returns.
//!
//! Each part can also be flattened into ARIA attribute pairs, which is what
//! assistive technology would see on the equivalent DOM nodes.

use crate::config::ComboboxConfig;
use crate::filter::{MatchList, NO_RESULTS_LABEL, ReferenceList};
use crate::navigation::{Focus, NavState};

/// Borrowed widget state consumed by [`render`].
#[derive(Debug, Clone, Copy)]
pub struct ComboboxParts<'a> {
    /// Configuration (ids, placeholder, popup height).
    pub config: &'a ComboboxConfig,
    /// The reference list.
    pub reference: &'a ReferenceList,
    /// Current field text.
    pub text: &'a str,
    /// Match list derived from `text`.
    pub matches: &'a MatchList,
    /// Navigation state.
    pub state: NavState,
    /// Logical focus.
    pub focus: Focus,
    /// First popup row inside the scroll window.
    pub scroll_offset: usize,
}

/// What kind of popup row this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// A reference entry that can be highlighted and committed.
    Option,
    /// The "No results" sentinel.
    NoResults,
}

/// One popup row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    /// Element id (`{id}-option-{n}`).
    pub id: String,
    /// Display text.
    pub text: String,
    /// True iff this row is the highlighted one.
    pub selected: bool,
    /// Option or sentinel.
    pub kind: RowKind,
}

impl RowView {
    /// ARIA attributes for the row.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let mut attrs = vec![
            ("id", self.id.clone()),
            ("role", "option".to_string()),
            ("aria-selected", self.selected.to_string()),
        ];
        if self.kind == RowKind::NoResults {
            attrs.push(("aria-disabled", "true".to_string()));
        }
        attrs
    }
}

/// The text field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputView {
    /// Element id.
    pub id: String,
    /// Field value.
    pub value: String,
    /// Focus is inside the widget.
    pub focused: bool,
    /// Popup is visible.
    pub expanded: bool,
    /// Id of the highlighted row, if any.
    pub active_descendant: Option<String>,
    /// Placeholder text.
    pub placeholder: String,
    listbox_id: String,
}

impl InputView {
    /// ARIA attributes for the text field.
    ///
    /// `aria-activedescendant` is omitted while nothing is highlighted.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let mut attrs = vec![
            ("id", self.id.clone()),
            ("role", "combobox".to_string()),
            ("aria-autocomplete", "list".to_string()),
            ("aria-expanded", self.expanded.to_string()),
            ("aria-controls", self.listbox_id.clone()),
            ("aria-owns", self.listbox_id.clone()),
        ];
        if let Some(active) = &self.active_descendant {
            attrs.push(("aria-activedescendant", active.clone()));
        }
        attrs
    }
}

/// The popup list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListboxView {
    /// Element id.
    pub id: String,
    /// Popup is hidden.
    pub hidden: bool,
    /// Every row of the current match list.
    pub rows: Vec<RowView>,
    /// First row inside the scroll window.
    pub scroll_offset: usize,
    /// Scroll window height.
    pub max_visible_rows: usize,
}

impl ListboxView {
    /// ARIA attributes for the popup container.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        vec![
            ("id", self.id.clone()),
            ("role", "listbox".to_string()),
            ("hidden", self.hidden.to_string()),
        ]
    }

    /// Rows inside the scroll window. Empty while hidden.
    pub fn visible_rows(&self) -> &[RowView] {
        if self.hidden {
            return &[];
        }
        let start = self.scroll_offset.min(self.rows.len());
        let end = start.saturating_add(self.max_visible_rows).min(self.rows.len());
        &self.rows[start..end]
    }

    /// The highlighted row, if any.
    pub fn selected(&self) -> Option<(usize, &RowView)> {
        self.rows.iter().enumerate().find(|(_, row)| row.selected)
    }
}

/// Full view description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboboxView {
    /// Text field.
    pub input: InputView,
    /// Popup.
    pub listbox: ListboxView,
}

/// Produce the view for `parts`.
pub fn render(parts: &ComboboxParts<'_>) -> ComboboxView {
    let config = parts.config;
    let highlighted = parts.state.highlighted();

    let rows = match parts.matches {
        MatchList::Matches(hits) => hits
            .iter()
            .enumerate()
            .map(|(row, &entry)| RowView {
                id: config.option_id(row),
                text: parts.reference.get(entry).unwrap_or_default().to_string(),
                selected: highlighted == Some(row),
                kind: RowKind::Option,
            })
            .collect(),
        MatchList::NoResults => vec![RowView {
            id: config.option_id(0),
            text: NO_RESULTS_LABEL.to_string(),
            selected: false,
            kind: RowKind::NoResults,
        }],
    };

    let listbox_id = config.listbox_id();
    ComboboxView {
        input: InputView {
            id: config.id.clone(),
            value: parts.text.to_string(),
            focused: parts.focus.is_within(),
            expanded: parts.state.is_open(),
            active_descendant: highlighted.map(|row| config.option_id(row)),
            placeholder: config.placeholder.clone(),
            listbox_id: listbox_id.clone(),
        },
        listbox: ListboxView {
            id: listbox_id,
            hidden: !parts.state.is_open(),
            rows,
            scroll_offset: parts.scroll_offset,
            max_visible_rows: config.max_visible_rows.max(1),
        },
    }
}
