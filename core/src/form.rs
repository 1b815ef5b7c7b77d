//! Form-submission interception.
//!
//! # Design
//! `FormBinding::bind` resolves settings once. The event subscription itself
//! belongs to the page: the host calls `handle_submit` from its submit
//! listener, and gets back the `Firing` to execute.
//!
//! Per submission the default navigation is suppressed, the form is read
//! either as a multipart field set (`is_encoded`) or as its URL-encoded
//! serialization, the token is reconciled into whichever shape resulted, and
//! every control on the page is frozen when `freeze_controls` is set.
//! Multipart bodies go out raw; serialized bodies go out with standard
//! serialization and content type.

use std::rc::Rc;

use crate::config::{Options, Settings};
use crate::csrf::{reconcile_fields, reconcile_serialized};
use crate::dom::{freeze_controls, Element, SubmitEvent};
use crate::error::AjaxError;
use crate::firing::{Firing, Host};
use crate::http::{HttpRequest, RequestBody};
use crate::log::{waiting_line, NOT_A_FORM_LINE};

/// A form element bound to the orchestrator.
///
/// Binding a non-form element yields an inert binding: one log line at bind
/// time, and every submission is ignored.
pub struct FormBinding {
    form: Rc<dyn Element>,
    settings: Option<Settings>,
    host: Host,
}

impl FormBinding {
    pub fn bind(host: &Host, form: Rc<dyn Element>, options: Options) -> Self {
        let settings = if form.as_form().is_some() {
            Some(Settings::resolve(Settings::defaults_for(form.as_ref()), options))
        } else {
            host.logger().record(NOT_A_FORM_LINE);
            None
        };
        Self {
            form,
            settings,
            host: host.clone(),
        }
    }

    /// The bound element, for chaining further page calls.
    pub fn element(&self) -> &Rc<dyn Element> {
        &self.form
    }

    pub fn is_active(&self) -> bool {
        self.settings.is_some()
    }

    pub fn settings(&self) -> Option<&Settings> {
        self.settings.as_ref()
    }

    /// Handle one native submission. Returns `None` for inert bindings.
    pub fn handle_submit(&self, event: &dyn SubmitEvent) -> Result<Option<Firing>, AjaxError> {
        let (Some(bound), Some(fields)) = (&self.settings, self.form.as_form()) else {
            return Ok(None);
        };
        event.prevent_default();

        let mut settings = bound.clone();
        let configured = settings.csrf_token.as_deref();
        let (body, token) = if settings.is_encoded {
            let mut set = fields.field_set();
            let token = reconcile_fields(configured, &mut set);
            (RequestBody::Multipart(set), token)
        } else {
            let (serialized, token) = reconcile_serialized(configured, &fields.serialize())?;
            (RequestBody::UrlEncoded(serialized), token)
        };

        let request = HttpRequest::post(settings.route_str().to_string(), &token, body, settings.cache);
        settings.csrf_token = Some(token);

        if settings.freeze_controls {
            freeze_controls(self.host.page());
        }
        (settings.on_wait)();
        if settings.log_events {
            self.host.logger().record(&waiting_line(settings.route_str()));
        }

        let parse_json = settings.parse_json;
        let frozen = settings.freeze_controls;
        Ok(Some(Firing::new(request, settings, self.host.clone(), parse_json, frozen)))
    }
}
