#![forbid(unsafe_code)]

//! Structured logging integration tests.
//!
//! Spans and events enabled:
//!   cargo test -p combo-widgets --features tracing --test tracing_tests
//!
//! Zero-overhead verification (no feature):
//!   cargo test -p combo-widgets --test tracing_tests -- zero_overhead

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use combo_core::event::{Event, KeyCode};
#[cfg(feature = "tracing")]
use combo_widgets::RecordingNotifier;
use combo_widgets::{Combobox, ComboboxConfig, ReferenceList};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

// ============================================================================
// Test Infrastructure
// ============================================================================

/// A captured span or event with its fields.
#[derive(Debug, Clone)]
#[allow(dead_code)]
struct Captured {
    name: String,
    fields: HashMap<String, String>,
}

#[derive(Clone, Default)]
struct CaptureHandle {
    spans: Arc<Mutex<Vec<Captured>>>,
    events: Arc<Mutex<Vec<Captured>>>,
}

impl CaptureHandle {
    fn spans(&self) -> Vec<Captured> {
        self.spans.lock().unwrap().clone()
    }

    fn events(&self) -> Vec<Captured> {
        self.events.lock().unwrap().clone()
    }

    #[cfg(feature = "tracing")]
    fn events_with_message(&self, message: &str) -> Vec<Captured> {
        self.events()
            .into_iter()
            .filter(|e| e.fields.get("message").map(String::as_str) == Some(message))
            .collect()
    }
}

/// Visitor that extracts fields as strings.
struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0
            .push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

struct Capture(CaptureHandle);

impl<S> tracing_subscriber::Layer<S> for Capture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        attrs.record(&mut visitor);
        self.0.spans.lock().unwrap().push(Captured {
            name: attrs.metadata().name().to_string(),
            fields: visitor.0.into_iter().collect(),
        });
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        self.0.events.lock().unwrap().push(Captured {
            name: event.metadata().name().to_string(),
            fields: visitor.0.into_iter().collect(),
        });
    }
}

/// Run `f` with a capturing subscriber installed.
fn with_capture<F>(f: F) -> CaptureHandle
where
    F: FnOnce(),
{
    let handle = CaptureHandle::default();
    let subscriber = tracing_subscriber::registry().with(Capture(handle.clone()));
    tracing::subscriber::with_default(subscriber, f);
    handle
}

fn combo() -> Combobox {
    Combobox::new(
        ReferenceList::new(["Australia", "Mongolia", "Somalia", "United States"]),
        ComboboxConfig::default(),
    )
}

fn drive(combo: &mut Combobox, text: &str) {
    for c in text.chars() {
        combo.handle_event(&Event::key(KeyCode::Char(c)));
    }
}

// ============================================================================
// Tests
// ============================================================================

#[test]
#[cfg(feature = "tracing")]
fn every_event_is_spanned() {
    let handle = with_capture(|| {
        let mut c = combo();
        drive(&mut c, "lia");
        c.handle_event(&Event::key(KeyCode::Down));
    });

    let spans: Vec<_> = handle
        .spans()
        .into_iter()
        .filter(|s| s.name == "combobox.handle_event")
        .collect();
    assert_eq!(spans.len(), 4);
    assert_eq!(spans[0].fields.get("state").map(String::as_str), Some("closed"));
    assert_eq!(spans[3].fields.get("state").map(String::as_str), Some("open"));
}

#[test]
#[cfg(feature = "tracing")]
fn transitions_are_logged_with_from_and_to() {
    let handle = with_capture(|| {
        let mut c = combo();
        drive(&mut c, "u");
        c.handle_event(&Event::key(KeyCode::Down));
        c.handle_event(&Event::key(KeyCode::Escape));
    });

    let transitions = handle.events_with_message("navigation transition");
    let pairs: Vec<(String, String)> = transitions
        .iter()
        .map(|e| (e.fields["from"].clone(), e.fields["to"].clone()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("closed".to_string(), "open".to_string()),
            ("open".to_string(), "open[0]".to_string()),
            ("open[0]".to_string(), "closed".to_string()),
        ]
    );
}

#[test]
#[cfg(feature = "tracing")]
fn commit_and_submit_are_info_events() {
    let handle = with_capture(|| {
        let mut c = combo();
        drive(&mut c, "united");
        c.handle_event(&Event::key(KeyCode::Down));
        c.handle_event(&Event::key(KeyCode::Enter));
        c.submit(&mut RecordingNotifier::new());
    });

    let commits = handle.events_with_message("combobox committed");
    assert_eq!(commits.len(), 1);
    assert_eq!(
        commits[0].fields.get("entry").map(String::as_str),
        Some("United States")
    );

    let submits = handle.events_with_message("combobox submitted");
    assert_eq!(submits.len(), 1);
    assert_eq!(
        submits[0].fields.get("accepted").map(String::as_str),
        Some("true")
    );
}

#[test]
#[cfg(feature = "tracing")]
fn filter_recompute_is_traced() {
    let handle = with_capture(|| {
        let mut c = combo();
        drive(&mut c, "xx");
    });

    let filters = handle.events_with_message("filter recomputed");
    let last = filters.last().expect("filter event");
    assert_eq!(last.fields.get("query").map(String::as_str), Some("xx"));
    assert_eq!(last.fields.get("matches").map(String::as_str), Some("0"));
}

#[test]
fn zero_overhead_without_feature() {
    // Without the feature nothing reaches the subscriber, and behaviour is
    // identical either way.
    let handle = with_capture(|| {
        let mut c = combo();
        drive(&mut c, "lia");
        assert_eq!(c.matches(), vec!["Australia", "Mongolia", "Somalia"]);
    });

    if cfg!(feature = "tracing") {
        assert!(!handle.spans().is_empty());
    } else {
        assert!(handle.spans().is_empty());
        assert!(handle.events().is_empty());
    }
}
