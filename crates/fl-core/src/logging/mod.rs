//! Structured logging for fplink.
//!
//! stdout carries command payloads only; every log line goes to stderr,
//! either as human text or as one JSON object per event.
//!
//! ```ignore
//! use fl_core::logging::{event_names, generate_run_id, init_logging, LogConfig, LogContext, Stage};
//!
//! init_logging(&LogConfig::from_env(None, None));
//! let ctx = LogContext::new(generate_run_id()).with_dataset("fingerprints.log");
//! fl_core::log_event!(ctx, INFO, event_names::RUN_STARTED, Stage::Init, "starting");
//! ```

pub mod config;
pub mod events;
pub mod layer;

pub use config::{LogConfig, LogFormat, LogLevel};
pub use events::{event_names, Level, LogContext, Stage};
pub use layer::JsonlLayer;

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber. Later calls are no-ops.
pub fn init_logging(config: &LogConfig) {
    let filter = EnvFilter::try_new(config.filter_directives())
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    let human = config.format == LogFormat::Human;
    let ansi = std::io::stderr().is_terminal();

    // Each fmt layer is built at its own nesting level; the two variants
    // have different subscriber types and cannot share a constructor.
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with((human && config.timestamps).then(|| {
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(ansi)
        }))
        .with((human && !config.timestamps).then(|| {
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(ansi)
                .without_time()
        }))
        .with((!human).then(JsonlLayer::stderr))
        .try_init();

    if installed.is_err() {
        tracing::debug!("logging already initialized");
    }
}

/// Short random id tying together the events of one invocation:
/// `run-` followed by 12 hex digits.
pub fn generate_run_id() -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    format!("run-{}", &uuid[..12])
}

/// Emit a tracing event tagged with the run context.
///
/// The level is one of `TRACE`, `DEBUG`, `INFO`, `WARN`, `ERROR`; the event
/// name becomes the tracing target.
///
/// ```ignore
/// log_event!(ctx, INFO, event_names::INGEST_LOADED, Stage::Ingest, "log loaded",
///     records = 120usize, skipped = 2usize);
/// ```
#[macro_export]
macro_rules! log_event {
    ($ctx:expr, $level:ident, $event:expr, $stage:expr, $msg:expr $(, $key:ident = $val:expr)* $(,)?) => {
        tracing::event!(
            target: $event,
            tracing::Level::$level,
            run_id = %$ctx.run_id,
            dataset = %$ctx.dataset_label(),
            stage = %$stage,
            message = $msg,
            $($key = $val,)*
        )
    };
}
