//! Logging integration for formpipe.
//!
//! Provides helpers for configuring [`tracing`]-based logging from
//! [`Settings`](crate::settings::Settings) and for creating per-form spans.

use crate::settings::Settings;

/// Sets up the global tracing subscriber based on the given settings.
///
/// The log level is read from `settings.log_level` (e.g. "debug", "info", "warn",
/// "error"). In debug mode a pretty, human-readable format is used; otherwise
/// a structured JSON format is used. Events are written to standard error.
///
/// Installing a subscriber twice is not an error; the second call is ignored.
pub fn setup_logging(settings: &Settings) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .json()
            .try_init()
            .ok();
    }
}

/// Creates a tracing span for one form evaluation.
///
/// # Examples
///
/// ```
/// use formpipe_core::logging::form_span;
///
/// let span = form_span("signup");
/// let _guard = span.enter();
/// tracing::debug!("loading form");
/// ```
pub fn form_span(form_name: &str) -> tracing::Span {
    tracing::info_span!("form", name = form_name)
}
