//! Lifecycle log lines and the sink they go to.

/// A sink for lifecycle log lines.
pub trait Logger {
    fn record(&self, line: &str);
}

/// Default sink: forwards every line to `tracing` at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn record(&self, line: &str) {
        tracing::info!(target: "ajax_helper", "{line}");
    }
}

pub(crate) fn waiting_line(route: &str) -> String {
    format!("ajax-helper | POST {route}: request fired, waiting for response")
}

pub(crate) fn succeeded_line(route: &str) -> String {
    format!("ajax-helper | POST {route}: request succeeded")
}

pub(crate) fn failed_line(route: &str) -> String {
    format!("ajax-helper | POST {route}: error response from server for route {route}")
}

pub(crate) const NOT_A_FORM_LINE: &str = "ajax-helper | bind_form: element is not a form, binding skipped";
