//! Log capture for unit tests: counts the shim's WARN events.

use crate::throttle::SHIM_TARGET;
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::{Dispatch, Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

#[derive(Debug, Clone, Default)]
pub(crate) struct CapturedWarning {
    pub domain: Option<String>,
    pub function: Option<String>,
    pub message: String,
}

impl Visit for CapturedWarning {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "domain" => self.domain = Some(value.to_string()),
            "function" => self.function = Some(value.to_string()),
            "message" => self.message = value.to_string(),
            _ => {}
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Captured(Arc<Mutex<Vec<CapturedWarning>>>);

impl Captured {
    pub fn warnings(&self) -> Vec<CapturedWarning> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.0.lock().unwrap().len()
    }
}

struct ShimWarnLayer(Captured);

impl<S: Subscriber> Layer<S> for ShimWarnLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if meta.target() != SHIM_TARGET || *meta.level() != Level::WARN {
            return;
        }
        let mut warning = CapturedWarning::default();
        event.record(&mut warning);
        self.0.0.lock().unwrap().push(warning);
    }
}

/// A dispatcher that records shim warnings. Install it with
/// `tracing::dispatcher::with_default` on every thread under test.
pub(crate) fn capture_warnings() -> (Dispatch, Captured) {
    let captured = Captured::default();
    let subscriber = tracing_subscriber::registry().with(ShimWarnLayer(captured.clone()));
    (Dispatch::new(subscriber), captured)
}
