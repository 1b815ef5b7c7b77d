//! Response interpretation: one outcome in, exactly one branch of side effects out.
//!
//! # Design
//! On success the body is optionally decoded as JSON, handed to `on_done`,
//! then written as-is into `load_html_to`. Decoded JSON is injected as the
//! decoded value; it is never rendered back to text here. A decode failure is
//! returned as `Err` before `on_done` runs.
//!
//! On failure `on_error` runs with no arguments and a line naming the route is
//! always recorded, whatever `log_events` says. The wait and success lines are
//! gated by `log_events`.

use serde_json::Value;

use crate::config::Settings;
use crate::error::AjaxError;
use crate::http::Outcome;
use crate::log::{failed_line, succeeded_line, Logger};

/// What `on_done` receives and what gets written into `load_html_to`.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseValue {
    Text(String),
    Json(Value),
}

impl ResponseValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseValue::Text(text) => Some(text),
            ResponseValue::Json(_) => None,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseValue::Json(value) => Some(value),
            ResponseValue::Text(_) => None,
        }
    }
}

/// Runs the success or error branch for one resolved request.
pub struct ResponseDispatcher<'a> {
    settings: &'a Settings,
    logger: &'a dyn Logger,
    parse_json: bool,
}

impl<'a> ResponseDispatcher<'a> {
    pub fn new(settings: &'a Settings, logger: &'a dyn Logger) -> Self {
        Self {
            settings,
            logger,
            parse_json: false,
        }
    }

    #[must_use]
    pub fn parse_json(mut self, parse_json: bool) -> Self {
        self.parse_json = parse_json;
        self
    }

    pub fn dispatch(&self, outcome: Outcome) -> Result<(), AjaxError> {
        let route = self.settings.route_str();
        match outcome {
            Outcome::Success { body } => {
                if self.settings.log_events {
                    self.logger.record(&succeeded_line(route));
                }
                let result = if self.parse_json {
                    ResponseValue::Json(serde_json::from_str(&body)?)
                } else {
                    ResponseValue::Text(body)
                };
                (self.settings.on_done)(&result);
                if let Some(target) = &self.settings.load_html_to {
                    target.set_inner_content(&result);
                }
                Ok(())
            }
            Outcome::Failure { reason } => {
                tracing::debug!(route, %reason, "request failed");
                (self.settings.on_error)();
                self.logger.record(&failed_line(route));
                Ok(())
            }
        }
    }
}
