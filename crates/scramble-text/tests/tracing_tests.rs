#![forbid(unsafe_code)]

//! Log and span instrumentation tests.
//!
//! A capture layer records every event and span the engine emits while a
//! closure runs under a scoped default subscriber.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use scramble_text::{MemorySurface, ScrambleConfig, ScrambleEngine, TargetId};
use tracing_subscriber::layer::SubscriberExt;

// ============================================================================
// Test Infrastructure
// ============================================================================

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    message: String,
    fields: HashMap<String, String>,
}

#[derive(Default)]
struct Captured {
    events: Vec<CapturedEvent>,
    spans: Vec<String>,
}

struct Capture(Arc<Mutex<Captured>>);

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

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for Capture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let mut fields: HashMap<String, String> = visitor.0.into_iter().collect();
        let message = fields.remove("message").unwrap_or_default();
        self.0.lock().unwrap().events.push(CapturedEvent {
            level: *event.metadata().level(),
            message,
            fields,
        });
    }

    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        self.0
            .lock()
            .unwrap()
            .spans
            .push(attrs.metadata().name().to_string());
    }
}

fn capture<F: FnOnce()>(f: F) -> Captured {
    let store = Arc::new(Mutex::new(Captured::default()));
    let subscriber = tracing_subscriber::registry().with(Capture(store.clone()));
    tracing::subscriber::with_default(subscriber, f);
    let mut guard = store.lock().unwrap();
    std::mem::take(&mut *guard)
}

impl Captured {
    fn find(&self, message: &str) -> Option<&CapturedEvent> {
        self.events.iter().find(|e| e.message == message)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn unregistered_target_warns() {
    let mut other = ScrambleEngine::seeded(0);
    let _ = other.add_target(MemorySurface::new("X"));
    let foreign: TargetId = other.add_target(MemorySurface::new("Y"));

    let captured = capture(|| {
        let mut engine: ScrambleEngine<MemorySurface> = ScrambleEngine::seeded(0);
        let _ = engine.start_run(foreign, &ScrambleConfig::new(), Duration::ZERO);
    });
    let event = captured
        .find("scramble requested for unregistered target")
        .expect("warning emitted");
    assert_eq!(event.level, tracing::Level::WARN);
    assert_eq!(event.fields.get("target_id").map(String::as_str), Some("1"));
}

#[test]
fn skip_reason_is_logged() {
    let captured = capture(|| {
        let mut engine = ScrambleEngine::seeded(1);
        let id = engine.add_target(MemorySurface::new(""));
        let _ = engine.start_run(id, &ScrambleConfig::new(), Duration::ZERO);
    });
    let event = captured.find("scramble skipped").expect("skip logged");
    assert_eq!(event.level, tracing::Level::DEBUG);
    assert_eq!(
        event.fields.get("reason").map(String::as_str),
        Some("target text is empty")
    );
}

#[test]
fn run_lifecycle_is_logged() {
    let captured = capture(|| {
        let mut engine = ScrambleEngine::seeded(2);
        let id = engine.add_target(MemorySurface::new("LOG"));
        let config = ScrambleConfig::new().duration(Duration::from_millis(40));
        let _ = engine.start_run(id, &config, Duration::ZERO);
        let mut now = Duration::ZERO;
        while engine.is_busy() {
            engine.advance(now);
            now += Duration::from_millis(16);
        }
    });

    let started = captured.find("scramble run started").expect("start logged");
    assert_eq!(started.fields.get("len").map(String::as_str), Some("3"));
    assert_eq!(started.fields.get("easing").map(String::as_str), Some("linear"));

    let completed = captured.find("scramble run completed").expect("completion logged");
    assert_eq!(completed.fields.get("text").map(String::as_str), Some("LOG"));

    let frames = captured
        .events
        .iter()
        .filter(|e| e.message == "scramble frame")
        .count();
    assert!(frames >= 2, "expected per-frame trace events, got {frames}");
    assert!(captured.spans.iter().any(|s| s == "scramble.advance"));
}

#[test]
fn cancelled_run_draws_nothing() {
    let captured = capture(|| {
        let mut engine = ScrambleEngine::seeded(3);
        let id = engine.add_target(MemorySurface::new("OLD"));
        let config = ScrambleConfig::new().play_once(false);
        let _ = engine.start_run(id, &config, Duration::ZERO);
        engine.cancel(id);
        engine.advance(Duration::ZERO);
    });
    assert!(captured.find("scramble cancelled").is_some());
    assert!(captured.find("scramble frame").is_none());
}
