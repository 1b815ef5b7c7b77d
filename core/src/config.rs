//! Binding configuration: caller options, defaults, and their merge.
//!
//! # Design
//! `Options` is the caller-facing record: every field optional, plain fields
//! deserializable from a camelCase JSON object, handles and hooks attached
//! through builder setters. `Settings` is the fully populated record a binding
//! works from. `Settings::resolve` merges the two shallowly, field by field;
//! a field the caller left out keeps its default.

use std::fmt;
use std::rc::Rc;

use serde::Deserialize;

use crate::dispatch::ResponseValue;
use crate::dom::{Element, ROUTE_ATTRIBUTE};

/// Runs just before a request is handed to the transport.
pub type WaitHook = Rc<dyn Fn()>;
/// Receives the (raw or decoded) response on success.
pub type DoneHook = Rc<dyn Fn(&ResponseValue)>;
/// Runs on transport failure. Receives no detail.
pub type ErrorHook = Rc<dyn Fn()>;

/// Caller-supplied overrides. `None` means "use the default".
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    pub route: Option<String>,
    pub cache: Option<bool>,
    #[serde(skip)]
    pub load_html_to: Option<Rc<dyn Element>>,
    pub log_events: Option<bool>,
    pub csrf_token: Option<String>,
    pub is_encoded: Option<bool>,
    pub freeze_controls: Option<bool>,
    pub parse_json: Option<bool>,
    #[serde(skip)]
    pub on_wait: Option<WaitHook>,
    #[serde(skip)]
    pub on_done: Option<DoneHook>,
    #[serde(skip)]
    pub on_error: Option<ErrorHook>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the plain fields from a JSON options object, e.g. the content of
    /// a `data-ajax-options` attribute. Unknown keys are ignored.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    #[must_use]
    pub fn cache(mut self, cache: bool) -> Self {
        self.cache = Some(cache);
        self
    }

    #[must_use]
    pub fn load_html_to(mut self, target: Rc<dyn Element>) -> Self {
        self.load_html_to = Some(target);
        self
    }

    #[must_use]
    pub fn log_events(mut self, log_events: bool) -> Self {
        self.log_events = Some(log_events);
        self
    }

    #[must_use]
    pub fn csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn is_encoded(mut self, is_encoded: bool) -> Self {
        self.is_encoded = Some(is_encoded);
        self
    }

    #[must_use]
    pub fn freeze_controls(mut self, freeze: bool) -> Self {
        self.freeze_controls = Some(freeze);
        self
    }

    #[must_use]
    pub fn parse_json(mut self, parse_json: bool) -> Self {
        self.parse_json = Some(parse_json);
        self
    }

    #[must_use]
    pub fn on_wait(mut self, hook: impl Fn() + 'static) -> Self {
        self.on_wait = Some(Rc::new(hook));
        self
    }

    #[must_use]
    pub fn on_done(mut self, hook: impl Fn(&ResponseValue) + 'static) -> Self {
        self.on_done = Some(Rc::new(hook));
        self
    }

    #[must_use]
    pub fn on_error(mut self, hook: impl Fn() + 'static) -> Self {
        self.on_error = Some(Rc::new(hook));
        self
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("route", &self.route)
            .field("cache", &self.cache)
            .field("load_html_to", &self.load_html_to.is_some())
            .field("log_events", &self.log_events)
            .field("csrf_token", &self.csrf_token)
            .field("is_encoded", &self.is_encoded)
            .field("freeze_controls", &self.freeze_controls)
            .field("parse_json", &self.parse_json)
            .finish_non_exhaustive()
    }
}

/// Effective settings for one binding.
///
/// `route`, `load_html_to` and `csrf_token` stay optional: a missing route is
/// passed through to the transport, and a missing token is filled in per
/// firing from the payload.
#[derive(Clone)]
pub struct Settings {
    pub route: Option<String>,
    pub cache: bool,
    pub load_html_to: Option<Rc<dyn Element>>,
    pub log_events: bool,
    pub csrf_token: Option<String>,
    pub is_encoded: bool,
    pub freeze_controls: bool,
    pub parse_json: bool,
    pub on_wait: WaitHook,
    pub on_done: DoneHook,
    pub on_error: ErrorHook,
}

impl Settings {
    /// Defaults for a binding on `element`. The route comes from the
    /// element's `data-ajax-route` attribute.
    pub fn defaults_for(element: &dyn Element) -> Self {
        Self {
            route: element.attribute(ROUTE_ATTRIBUTE),
            cache: false,
            load_html_to: None,
            log_events: false,
            csrf_token: None,
            is_encoded: true,
            freeze_controls: true,
            parse_json: false,
            on_wait: Rc::new(|| {}),
            on_done: Rc::new(|_: &ResponseValue| {}),
            on_error: Rc::new(|| {}),
        }
    }

    /// Overlay `options` on `defaults`, field by field.
    pub fn resolve(defaults: Settings, options: Options) -> Self {
        Self {
            route: options.route.or(defaults.route),
            cache: options.cache.unwrap_or(defaults.cache),
            load_html_to: options.load_html_to.or(defaults.load_html_to),
            log_events: options.log_events.unwrap_or(defaults.log_events),
            csrf_token: options.csrf_token.or(defaults.csrf_token),
            is_encoded: options.is_encoded.unwrap_or(defaults.is_encoded),
            freeze_controls: options.freeze_controls.unwrap_or(defaults.freeze_controls),
            parse_json: options.parse_json.unwrap_or(defaults.parse_json),
            on_wait: options.on_wait.unwrap_or(defaults.on_wait),
            on_done: options.on_done.unwrap_or(defaults.on_done),
            on_error: options.on_error.unwrap_or(defaults.on_error),
        }
    }

    /// The route as sent, empty when unset.
    pub fn route_str(&self) -> &str {
        self.route.as_deref().unwrap_or_default()
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("route", &self.route)
            .field("cache", &self.cache)
            .field("load_html_to", &self.load_html_to.is_some())
            .field("log_events", &self.log_events)
            .field("csrf_token", &self.csrf_token)
            .field("is_encoded", &self.is_encoded)
            .field("freeze_controls", &self.freeze_controls)
            .field("parse_json", &self.parse_json)
            .finish_non_exhaustive()
    }
}
