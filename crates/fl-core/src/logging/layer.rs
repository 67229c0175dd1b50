//! JSON-lines tracing layer.
//!
//! Every event becomes one line on the writer:
//!
//! ```text
//! {"ts":"...","level":"info","event":"cluster.finished","run_id":"run-...","stage":"cluster",
//!  "message":"clustering finished","fields":{"records":7,"groups":4}}
//! ```
//!
//! `run_id`, `dataset`, `stage`, and `message` are lifted to the top level;
//! everything else lands under `fields`.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

use super::events::Level;

/// One serialized log line.
#[derive(Debug, Serialize)]
struct LogLine<'a> {
    ts: DateTime<Utc>,
    level: Level,
    event: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    run_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dataset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    fields: BTreeMap<String, Value>,
}

impl<'a> LogLine<'a> {
    fn new(level: Level, event: &'a str) -> Self {
        LogLine {
            ts: Utc::now(),
            level,
            event,
            run_id: None,
            dataset: None,
            stage: None,
            message: None,
            fields: BTreeMap::new(),
        }
    }

    fn set(&mut self, name: &str, value: Value) {
        let slot = match name {
            "run_id" => &mut self.run_id,
            "dataset" => &mut self.dataset,
            "stage" => &mut self.stage,
            "message" => &mut self.message,
            _ => {
                self.fields.insert(name.to_string(), value);
                return;
            }
        };
        let text = match value {
            Value::String(s) => s,
            other => other.to_string(),
        };
        *slot = Some(text).filter(|t| !t.is_empty());
    }
}

impl Visit for LogLine<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.set(field.name(), Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.set(field.name(), Value::from(format!("{:?}", value)));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.set(field.name(), Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.set(field.name(), Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        // Non-finite floats have no JSON form; Value::from maps them to null.
        self.set(field.name(), Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.set(field.name(), Value::from(value));
    }
}

/// Layer writing [`LogLine`]s, stderr by default.
pub struct JsonlLayer<W = io::Stderr> {
    writer: Mutex<W>,
}

impl JsonlLayer<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> JsonlLayer<W> {
    pub fn new(writer: W) -> Self {
        JsonlLayer {
            writer: Mutex::new(writer),
        }
    }
}

impl<S, W> Layer<S> for JsonlLayer<W>
where
    S: Subscriber,
    W: Write + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut line = LogLine::new(Level::from(*metadata.level()), metadata.target());
        event.record(&mut line);

        let Ok(json) = serde_json::to_string(&line) else {
            return;
        };
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", json);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{event_names, LogContext, Stage};
    use std::sync::Arc;
    use tracing_subscriber::layer::SubscriberExt;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(f: impl FnOnce()) -> Vec<Value> {
        let buf = SharedBuf::default();
        let subscriber = tracing_subscriber::registry().with(JsonlLayer::new(buf.clone()));
        tracing::subscriber::with_default(subscriber, f);

        let bytes = buf.0.lock().unwrap();
        String::from_utf8_lossy(&bytes)
            .lines()
            .map(|l| serde_json::from_str(l).expect("valid JSON line"))
            .collect()
    }

    #[test]
    fn test_log_event_shape() {
        let ctx = LogContext::new("run-abc").with_dataset("fp.log");
        let lines = capture(|| {
            crate::log_event!(
                ctx,
                INFO,
                event_names::CLUSTER_FINISHED,
                Stage::Cluster,
                "clustering finished",
                records = 7usize,
                groups = 4usize
            );
        });

        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        assert_eq!(line["level"], "info");
        assert_eq!(line["event"], "cluster.finished");
        assert_eq!(line["run_id"], "run-abc");
        assert_eq!(line["dataset"], "fp.log");
        assert_eq!(line["stage"], "cluster");
        assert_eq!(line["message"], "clustering finished");
        assert_eq!(line["fields"]["records"], 7);
        assert_eq!(line["fields"]["groups"], 4);
        assert!(line["ts"].is_string());
    }

    #[test]
    fn test_plain_event_fields() {
        let lines = capture(|| {
            tracing::warn!(
                target: "ingest.line_skipped",
                line = 7u64,
                delta = -2i64,
                score = 0.5,
                fatal = false,
                "skipping malformed log line"
            );
        });
        let line = &lines[0];
        assert_eq!(line["level"], "warn");
        assert_eq!(line["message"], "skipping malformed log line");
        assert_eq!(line["fields"]["line"], 7);
        assert_eq!(line["fields"]["delta"], -2);
        assert_eq!(line["fields"]["score"], 0.5);
        assert_eq!(line["fields"]["fatal"], false);
        assert!(line.get("run_id").is_none());
    }

    #[test]
    fn test_empty_dataset_and_fields_omitted() {
        let ctx = LogContext::new("run-x");
        let lines = capture(|| {
            crate::log_event!(ctx, DEBUG, event_names::RUN_STARTED, Stage::Init, "go");
        });
        let line = &lines[0];
        assert_eq!(line["level"], "debug");
        assert!(line.get("dataset").is_none());
        assert!(line.get("fields").is_none());
    }

    #[test]
    fn test_non_finite_float_is_null() {
        let lines = capture(|| {
            tracing::info!(target: "entropy.finished", ratio = f64::NAN, "m");
        });
        assert!(lines[0]["fields"]["ratio"].is_null());
    }
}
