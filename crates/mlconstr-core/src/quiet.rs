//! Scoped suppression of warning events.
//!
//! Predictors may report recoverable oddities (saturated logits, missing
//! feature names, ...) as `WARN` events. When the error check re-runs a
//! prediction on a solved input those warnings are noise, so the call runs
//! under a dispatcher that drops them and forwards everything else.

use tracing::dispatcher::{self, Dispatch};
use tracing::level_filters::LevelFilter;
use tracing::span::{Attributes, Id, Record};
use tracing::subscriber::Interest;
use tracing::{Event, Level, Metadata, Subscriber};

/// Runs `f` with `WARN` events discarded.
///
/// The previous default dispatcher is restored when `f` returns or unwinds.
pub fn without_warnings<T>(f: impl FnOnce() -> T) -> T {
    let current = dispatcher::get_default(Dispatch::clone);
    let quiet = Dispatch::new(SuppressWarnings { inner: current });
    dispatcher::with_default(&quiet, f)
}

struct SuppressWarnings {
    inner: Dispatch,
}

impl Subscriber for SuppressWarnings {
    fn register_callsite(&self, _metadata: &'static Metadata<'static>) -> Interest {
        // Decided per event; the callsite cache is shared with other dispatchers.
        Interest::sometimes()
    }

    fn max_level_hint(&self) -> Option<LevelFilter> {
        // The inner hint is not exposed by `Dispatch`; the global maximum
        // already accounts for it.
        Some(LevelFilter::current())
    }

    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        *metadata.level() != Level::WARN && self.inner.enabled(metadata)
    }

    fn new_span(&self, span: &Attributes<'_>) -> Id {
        self.inner.new_span(span)
    }

    fn record(&self, span: &Id, values: &Record<'_>) {
        self.inner.record(span, values)
    }

    fn record_follows_from(&self, span: &Id, follows: &Id) {
        self.inner.record_follows_from(span, follows)
    }

    fn event(&self, event: &Event<'_>) {
        if *event.metadata().level() != Level::WARN {
            self.inner.event(event)
        }
    }

    fn enter(&self, span: &Id) {
        self.inner.enter(span)
    }

    fn exit(&self, span: &Id) {
        self.inner.exit(span)
    }

    fn current_span(&self) -> tracing_core::span::Current {
        self.inner.current_span()
    }

    fn clone_span(&self, id: &Id) -> Id {
        self.inner.clone_span(id)
    }

    fn try_close(&self, id: Id) -> bool {
        self.inner.try_close(id)
    }
}
