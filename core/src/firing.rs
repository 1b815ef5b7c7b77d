//! One request attempt, from "built" to "resolved".
//!
//! # Design
//! A `Firing` is the deferred continuation of one trigger: the request is
//! already built and every pre-send side effect (`on_wait`, the wait log line,
//! control freezing) has already happened. The host executes `request()` with
//! whatever transport it has and reports back through `resolve`, or lets
//! `send` do both through a `Transport`.
//!
//! Firings are independent of each other. Two submissions of the same form
//! produce two firings that freeze and thaw the page in the order the host
//! resolves them; nothing here de-duplicates or queues them.

use std::rc::Rc;

use crate::config::Settings;
use crate::dispatch::ResponseDispatcher;
use crate::dom::{thaw_controls, Page};
use crate::error::AjaxError;
use crate::http::{HttpRequest, Outcome};
use crate::log::{Logger, TracingLogger};
use crate::transport::Transport;

/// Capabilities a binding needs from its surroundings.
#[derive(Clone)]
pub struct Host {
    logger: Rc<dyn Logger>,
    page: Rc<dyn Page>,
}

impl Host {
    /// A host freezing controls through `page` and logging through `tracing`.
    pub fn new(page: Rc<dyn Page>) -> Self {
        Self {
            logger: Rc::new(TracingLogger),
            page,
        }
    }

    #[must_use]
    pub fn with_logger(mut self, logger: Rc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn logger(&self) -> &dyn Logger {
        self.logger.as_ref()
    }

    pub fn page(&self) -> &dyn Page {
        self.page.as_ref()
    }
}

/// A request that has been issued but not yet resolved.
#[must_use = "a firing does nothing until it is resolved"]
pub struct Firing {
    request: HttpRequest,
    settings: Settings,
    host: Host,
    parse_json: bool,
    frozen: bool,
}

impl Firing {
    pub(crate) fn new(
        request: HttpRequest,
        settings: Settings,
        host: Host,
        parse_json: bool,
        frozen: bool,
    ) -> Self {
        tracing::debug!(
            method = request.method.as_str(),
            path = %request.path,
            encoding = ?request.encoding,
            parse_json,
            frozen,
            "request built"
        );
        Self {
            request,
            settings,
            host,
            parse_json,
            frozen,
        }
    }

    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    /// The token this firing reconciled to; also the `X-CSRF-Token` value.
    pub fn token(&self) -> &str {
        self.settings.csrf_token.as_deref().unwrap_or_default()
    }

    /// Whether this firing froze the page's controls before sending.
    pub fn froze_controls(&self) -> bool {
        self.frozen
    }

    /// Apply the transport's outcome.
    ///
    /// Controls frozen by this firing are thawed first, on both branches, so
    /// a panicking hook or a decode failure cannot leave the page locked.
    pub fn resolve(self, outcome: Outcome) -> Result<(), AjaxError> {
        if self.frozen {
            thaw_controls(self.host.page());
        }
        ResponseDispatcher::new(&self.settings, self.host.logger())
            .parse_json(self.parse_json)
            .dispatch(outcome)
    }

    /// Execute the request through `transport` and resolve with its outcome.
    pub async fn send<T: Transport>(self, transport: &T) -> Result<(), AjaxError> {
        let outcome = transport.send(&self.request).await;
        self.resolve(outcome)
    }
}
