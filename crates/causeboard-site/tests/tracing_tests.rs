#![forbid(unsafe_code)]

//! Structured log events emitted by the page model.
//!
//! A capture layer records every event with its level and fields so the
//! tests can assert on what an operator would see.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use causeboard_core::input::{FormKind, InputEvent};
use causeboard_runtime::program::Model;
use causeboard_site::{Msg, SiteModel};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: Level,
    fields: HashMap<String, String>,
}

impl CapturedEvent {
    fn message(&self) -> &str {
        self.fields.get("message").map_or("", String::as_str)
    }
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            fields: visitor.0.into_iter().collect(),
        });
    }
}

fn capture<F: FnOnce()>(f: F) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(EventCapture {
        events: Arc::clone(&events),
    });
    tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    captured
}

#[test]
fn lookup_miss_warns_with_the_raw_id() {
    let events = capture(|| {
        let mut model = SiteModel::builtin();
        let _ = model.update(Msg::from(InputEvent::CardClick(Some("abc".into()))));
    });
    let warns: Vec<_> = events.iter().filter(|e| e.level == Level::WARN).collect();
    assert_eq!(warns.len(), 1, "{events:?}");
    assert_eq!(warns[0].fields.get("data_id").map(String::as_str), Some("abc"));
    assert!(warns[0].message().contains("no cause matches"));
}

#[test]
fn hit_does_not_warn() {
    let events = capture(|| {
        let mut model = SiteModel::builtin();
        let _ = model.update(Msg::CardClick(Some("1".into())));
    });
    assert!(events.iter().all(|e| e.level != Level::WARN), "{events:?}");
    assert!(events.iter().any(|e| e.message() == "cause opened"));
}

#[test]
fn init_and_submit_are_logged() {
    let events = capture(|| {
        let mut model = SiteModel::builtin();
        let _ = model.init();
        let _ = model.update(Msg::Submit(FormKind::Donate));
    });
    let init = events
        .iter()
        .find(|e| e.message() == "site initialized")
        .expect("init event");
    assert_eq!(init.level, Level::INFO);
    assert_eq!(init.fields.get("causes").map(String::as_str), Some("5"));

    let submit = events
        .iter()
        .find(|e| e.message() == "form submitted")
        .expect("submit event");
    assert_eq!(submit.fields.get("form").map(String::as_str), Some("donateForm"));
}
