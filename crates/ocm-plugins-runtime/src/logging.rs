//! Logging setup for the host, built on `tracing` + `tracing-subscriber`.
//!
//! The per-plugin stderr relay (`ocm_plugins_transport::logrelay`) logs
//! through whatever global subscriber this module installs, tagging each
//! line with a `plugin_id` span field.

use std::path::PathBuf;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Span event configuration: controls when span lifecycle events are logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpanEvents {
    /// Log when a span is created.
    pub new: bool,
    /// Log when a span is entered.
    pub enter: bool,
    /// Log when a span is exited.
    pub exit: bool,
    /// Log when a span is closed (dropped).
    pub close: bool,
}

impl SpanEvents {
    /// No span events.
    pub const NONE: Self = Self { new: false, enter: false, exit: false, close: false };

    /// Creation and close only — enough to see a plugin's lifecycle without
    /// per-request noise.
    pub const LIFECYCLE: Self = Self { new: true, enter: false, exit: false, close: true };

    /// Every span event.
    pub const FULL: Self = Self { new: true, enter: true, exit: true, close: true };

    fn to_fmt_span(self) -> fmt::format::FmtSpan {
        let mut span = fmt::format::FmtSpan::NONE;
        if self.new {
            span |= fmt::format::FmtSpan::NEW;
        }
        if self.enter {
            span |= fmt::format::FmtSpan::ENTER;
        }
        if self.exit {
            span |= fmt::format::FmtSpan::EXIT;
        }
        if self.close {
            span |= fmt::format::FmtSpan::CLOSE;
        }
        span
    }
}

/// Builds and installs the global `tracing` subscriber.
#[derive(Default)]
pub struct LoggingBuilder {
    directives: Vec<String>,
    level: Option<tracing::Level>,
    span_events: SpanEvents,
    with_target: bool,
    with_thread_ids: bool,
    with_file: bool,
    with_line_number: bool,
    log_dir: Option<PathBuf>,
    #[cfg(feature = "json-log")]
    json: bool,
}

impl LoggingBuilder {
    /// Creates a builder with defaults: level `info`, no span events.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum level for all log output, absent a `RUST_LOG`
    /// override.
    pub fn with_level(mut self, level: tracing::Level) -> Self {
        self.level = Some(level);
        self
    }

    /// Adds an additional filter directive, e.g. `"ocm_plugins_transport=debug"`.
    pub fn directive(mut self, directive: &str) -> Self {
        self.directives.push(directive.to_string());
        self
    }

    /// Configures span lifecycle logging.
    pub fn span_events(mut self, events: SpanEvents) -> Self {
        self.span_events = events;
        self
    }

    /// Includes the target (module path) in log output.
    pub fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = enabled;
        self
    }

    /// Includes thread IDs in log output.
    pub fn with_thread_ids(mut self, enabled: bool) -> Self {
        self.with_thread_ids = enabled;
        self
    }

    /// Includes file names in log output.
    pub fn with_file(mut self, enabled: bool) -> Self {
        self.with_file = enabled;
        self
    }

    /// Includes line numbers in log output.
    pub fn with_line_number(mut self, enabled: bool) -> Self {
        self.with_line_number = enabled;
        self
    }

    /// Rotates daily log files into `dir` via a non-blocking appender,
    /// instead of writing to stderr.
    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    /// Enables JSON-formatted output. Requires the `json-log` feature.
    #[cfg(feature = "json-log")]
    pub fn json(mut self) -> Self {
        self.json = true;
        self
    }

    fn build_filter(&self) -> EnvFilter {
        let base = self.level.map(level_str).unwrap_or("info").to_string();
        let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&base));
        for directive in &self.directives {
            if let Ok(d) = directive.parse() {
                filter = filter.add_directive(d);
            }
        }
        filter
    }

    /// Installs the subscriber globally. Returns the appender guard when a
    /// log directory was configured; dropping it flushes pending writes.
    ///
    /// # Panics
    ///
    /// Panics if a global subscriber is already set.
    pub fn init(self) -> Option<tracing_appender::non_blocking::WorkerGuard> {
        self.try_init().expect("logging subscriber already initialized")
    }

    /// Fallible form of [`LoggingBuilder::init`].
    pub fn try_init(self) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>, Box<dyn std::error::Error + Send + Sync>> {
        let filter = self.build_filter();
        let span_events = self.span_events.to_fmt_span();

        let (guard, writer): (Option<tracing_appender::non_blocking::WorkerGuard>, _) = match &self.log_dir {
            Some(dir) => {
                let appender = tracing_appender::rolling::daily(dir, "ocm-plugins.log");
                let (non_blocking, guard) = tracing_appender::non_blocking(appender);
                (Some(guard), tracing_subscriber::fmt::writer::BoxMakeWriter::new(non_blocking))
            }
            None => (None, tracing_subscriber::fmt::writer::BoxMakeWriter::new(std::io::stderr)),
        };

        #[cfg(feature = "json-log")]
        if self.json {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(writer)
                        .with_span_events(span_events)
                        .with_target(self.with_target)
                        .with_thread_ids(self.with_thread_ids)
                        .with_file(self.with_file)
                        .with_line_number(self.with_line_number),
                )
                .with(filter)
                .try_init()?;
            return Ok(guard);
        }

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(writer)
                    .with_span_events(span_events)
                    .with_target(self.with_target)
                    .with_thread_ids(self.with_thread_ids)
                    .with_file(self.with_file)
                    .with_line_number(self.with_line_number),
            )
            .with(filter)
            .try_init()?;
        Ok(guard)
    }
}

fn level_str(level: tracing::Level) -> &'static str {
    match level {
        tracing::Level::TRACE => "trace",
        tracing::Level::DEBUG => "debug",
        tracing::Level::INFO => "info",
        tracing::Level::WARN => "warn",
        tracing::Level::ERROR => "error",
    }
}

/// Initializes logging with the host's configured level.
pub fn init_from_level(level_str: &str) {
    let level = match level_str.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    };
    LoggingBuilder::new().with_level(level).init();
}
