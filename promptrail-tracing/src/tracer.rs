//! The `observe` wrapper and background delivery.
//!
//! [`Tracer::observe`] runs a future, records what went in and what came
//! out, and queues the record on an unbounded channel. A background task
//! drains the channel in batches and hands them to a [`TraceCollector`].
//! Delivery failures are logged and dropped, so tracing never changes the
//! result of the observed call.
//!
//! Observations started inside another observation on the same task become
//! its children: they share its trace id and point at it as parent.

use promptrail_core::{generate_observation_id, now_utc, TracingSettings};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::collector::TraceCollector;
use crate::record::TraceRecord;

tokio::task_local! {
    static CURRENT: ObservationScope;
}

#[derive(Debug, Clone)]
struct ObservationScope {
    trace_id: String,
    observation_id: String,
}

enum Command {
    Record(TraceRecord),
    Flush(oneshot::Sender<()>),
}

/// Handle used to observe operations.
///
/// Cheap to clone; clones feed the same background task.
#[derive(Clone)]
pub struct Tracer {
    sender: Option<mpsc::UnboundedSender<Command>>,
}

impl std::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracer")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl Default for Tracer {
    fn default() -> Self {
        Self::disabled()
    }
}

impl Tracer {
    /// Most records handed to the collector in one call.
    pub const MAX_BATCH: usize = 64;

    /// Create a tracer shipping to `collector`.
    ///
    /// Spawns the delivery task on the current Tokio runtime. Without a
    /// runtime, or with tracing disabled, the tracer records nothing.
    pub fn new(collector: Arc<dyn TraceCollector>, settings: TracingSettings) -> Self {
        if !settings.enabled {
            return Self::disabled();
        }
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!("No Tokio runtime available, tracing disabled");
                return Self::disabled();
            }
        };

        let (sender, receiver) = mpsc::unbounded_channel();
        handle.spawn(deliver(collector, receiver));
        Self {
            sender: Some(sender),
        }
    }

    /// A tracer that records nothing.
    #[must_use]
    pub fn disabled() -> Self {
        Self { sender: None }
    }

    /// Whether observations are recorded.
    pub fn is_enabled(&self) -> bool {
        self.sender.is_some()
    }

    /// Trace id of the observation running on this task, if any.
    pub fn current_trace_id() -> Option<String> {
        CURRENT.try_with(|scope| scope.trace_id.clone()).ok()
    }

    /// Run `fut` as the observation `name`.
    ///
    /// The result is returned unchanged. `Ok` values are recorded as JSON,
    /// `Err` values through their `Display`.
    ///
    /// ```rust
    /// use promptrail_tracing::{MemoryCollector, Tracer};
    /// use promptrail_core::TracingSettings;
    /// use std::sync::Arc;
    /// use std::time::Duration;
    ///
    /// # tokio_test::block_on(async {
    /// let collector = MemoryCollector::new();
    /// let tracer = Tracer::new(Arc::new(collector.clone()), TracingSettings::default());
    ///
    /// let out: Result<u32, String> = tracer.observe("double", 21, async { Ok(42) }).await;
    /// assert_eq!(out, Ok(42));
    ///
    /// tracer.flush(Duration::from_secs(1)).await;
    /// assert_eq!(collector.records()[0].output, Some(serde_json::json!(42)));
    /// # });
    /// ```
    pub async fn observe<F, T, E, I>(&self, name: &str, input: I, fut: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        T: Serialize,
        E: Display,
        I: Serialize,
    {
        let Some(sender) = &self.sender else {
            return fut.await;
        };

        let parent = CURRENT.try_with(Clone::clone).ok();
        let id = generate_observation_id();
        let scope = ObservationScope {
            trace_id: parent
                .as_ref()
                .map_or_else(generate_observation_id, |p| p.trace_id.clone()),
            observation_id: id.clone(),
        };
        let trace_id = scope.trace_id.clone();
        let input = to_json(&input);
        let start_time = now_utc();

        let result = CURRENT.scope(scope, fut).await;

        let (output, error) = match &result {
            Ok(value) => (Some(to_json(value)), None),
            Err(err) => (None, Some(err.to_string())),
        };
        let record = TraceRecord {
            id,
            trace_id,
            parent_id: parent.map(|p| p.observation_id),
            name: name.to_string(),
            input,
            output,
            error,
            start_time,
            end_time: now_utc(),
        };
        debug!(
            name,
            duration_ms = record.duration_ms(),
            failed = record.is_error(),
            "Observation finished"
        );
        if sender.send(Command::Record(record)).is_err() {
            debug!(name, "Trace delivery task has stopped, record dropped");
        }

        result
    }

    /// Wait until every record queued so far has been handed to the
    /// collector, or until `timeout` elapses.
    ///
    /// Returns `true` when the queue was drained in time.
    pub async fn flush(&self, timeout: Duration) -> bool {
        let Some(sender) = &self.sender else {
            return true;
        };
        let (ack, done) = oneshot::channel();
        if sender.send(Command::Flush(ack)).is_err() {
            return false;
        }
        matches!(tokio::time::timeout(timeout, done).await, Ok(Ok(())))
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> JsonValue {
    serde_json::to_value(value)
        .unwrap_or_else(|e| JsonValue::String(format!("<unserializable: {e}>")))
}

async fn deliver(
    collector: Arc<dyn TraceCollector>,
    mut receiver: mpsc::UnboundedReceiver<Command>,
) {
    let mut batch = Vec::new();
    let mut acks = Vec::new();

    while let Some(command) = receiver.recv().await {
        let mut next = Some(command);
        while let Some(command) = next.take() {
            match command {
                Command::Record(record) => batch.push(record),
                Command::Flush(ack) => acks.push(ack),
            }
            if batch.len() < Tracer::MAX_BATCH {
                next = receiver.try_recv().ok();
            }
        }

        if !batch.is_empty() {
            let records = batch.len();
            debug!(records, "Exporting trace batch");
            if let Err(err) = collector.export(std::mem::take(&mut batch)).await {
                warn!(error = %err, records, "Dropping trace batch");
            }
        }
        for ack in acks.drain(..) {
            let _ = ack.send(());
        }
    }
}
