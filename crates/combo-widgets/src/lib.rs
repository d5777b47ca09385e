#![forbid(unsafe_code)]

//! Accessible combobox/autocomplete widget.
//!
//! A text field filters a fixed reference list as the user types and shows
//! the matches in a popup that can be driven by keyboard, pointer and
//! assistive technology. The pieces:
//!
//! - [`filter`]: case-insensitive substring matching with a "No results" sentinel.
//! - [`navigation`]: popup visibility, highlight and logical focus.
//! - [`submit`]: exact-membership validation reported through a [`Notifier`].
//! - [`view`]: pure render-from-state with ARIA attributes.
//! - [`layout`] and [`subscription`]: hit testing and scoped page listeners.
//! - [`combobox`]: the widget that wires them together.

pub mod combobox;
pub mod config;
pub mod filter;
pub mod layout;
pub mod navigation;
pub mod submit;
pub mod subscription;
pub mod text_field;
pub mod view;

pub use combobox::{Combobox, ComboboxAction};
pub use config::{ComboboxConfig, ConfigError};
pub use filter::{MatchList, NO_RESULTS_LABEL, ReferenceList};
pub use layout::{ComboboxLayout, Hit};
pub use navigation::{Focus, NavState, Navigator};
pub use submit::{
    INVALID_SUBMISSION_MESSAGE, Notifier, RecordingNotifier, SubmitOutcome, ValidationError,
};
pub use subscription::{DocumentListeners, DocumentSubscription, SubscriberId};
pub use text_field::TextField;
pub use view::{ComboboxView, InputView, ListboxView, RowKind, RowView, render};
