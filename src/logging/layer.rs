use std::fmt::{self, Write as _};
use std::io::Write;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

use super::formatter::WorkflowCommandFormatter;

/// Span field that names the log group its events belong to.
pub const GROUP_FIELD: &str = "log_group";

/// Group label recorded on a span, kept in the span's extensions.
#[derive(Debug, Clone)]
struct GroupLabel(String);

#[derive(Debug)]
struct Inner<W> {
    formatter: WorkflowCommandFormatter,
    writer: W,
}

/// Tracing layer that renders events through [`WorkflowCommandFormatter`].
///
/// Events emitted inside a span carrying a `log_group` field are attributed
/// to that group; the innermost such span wins. Entering and leaving the
/// span is the push/pop of the log context, so an event emitted outside any
/// group span closes the open group.
#[derive(Debug)]
pub struct WorkflowCommandLayer<W> {
    inner: Arc<Mutex<Inner<W>>>,
}

/// Shared handle onto the layer's formatter, used to force-close a dangling
/// group before the process exits.
#[derive(Debug, Clone)]
pub struct LogHandle<W> {
    inner: Arc<Mutex<Inner<W>>>,
}

impl WorkflowCommandLayer<std::io::Stdout> {
    pub fn stdout() -> (Self, LogHandle<std::io::Stdout>) {
        Self::with_writer(std::io::stdout())
    }
}

impl<W: Write + Send + 'static> WorkflowCommandLayer<W> {
    pub fn with_writer(writer: W) -> (Self, LogHandle<W>) {
        let inner = Arc::new(Mutex::new(Inner {
            formatter: WorkflowCommandFormatter::new(),
            writer,
        }));
        let handle = LogHandle {
            inner: Arc::clone(&inner),
        };
        (Self { inner }, handle)
    }
}

impl<W: Write> LogHandle<W> {
    /// Emit a trailing `::endgroup::` if a group is still open, then flush.
    pub fn close_open_group(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            let inner = &mut *inner;
            let _ = inner.formatter.close_open_group(&mut inner.writer);
            let _ = inner.writer.flush();
        }
    }
}

impl<S, W> Layer<S> for WorkflowCommandLayer<W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: Write + Send + 'static,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let mut visitor = GroupVisitor::default();
        attrs.record(&mut visitor);
        if let Some(label) = visitor.0 {
            if let Some(span) = ctx.span(id) {
                span.extensions_mut().insert(GroupLabel(label));
            }
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let mut message = MessageVisitor::default();
        event.record(&mut message);

        // Scope iterates from the innermost span outwards.
        let group = ctx.event_scope(event).and_then(|scope| {
            scope.into_iter().find_map(|span| {
                span.extensions()
                    .get::<GroupLabel>()
                    .map(|label| label.0.clone())
            })
        });

        if let Ok(mut inner) = self.inner.lock() {
            let inner = &mut *inner;
            let _ = inner.formatter.format_event(
                &mut inner.writer,
                event.metadata().level(),
                group.as_deref(),
                &message.0,
            );
        }
    }
}

/// Collects the rendered `message` field of an event.
#[derive(Default)]
struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.0, "{value:?}");
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.0.push_str(value);
        }
    }
}

/// Reads the `log_group` field off a span's attributes.
#[derive(Default)]
struct GroupVisitor(Option<String>);

impl Visit for GroupVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == GROUP_FIELD {
            self.0 = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == GROUP_FIELD && self.0.is_none() {
            self.0 = Some(format!("{value:?}"));
        }
    }
}
