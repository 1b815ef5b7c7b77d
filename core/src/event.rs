//! Event-triggered dispatch: post an arbitrary payload from inside a caller's
//! own event handler.
//!
//! Every call issues exactly one request. The path never freezes controls and
//! never decodes the response.

use crate::config::{Options, Settings};
use crate::csrf::reconcile_payload;
use crate::dom::Element;
use crate::error::AjaxError;
use crate::firing::{Firing, Host};
use crate::http::{HttpRequest, RequestBody};
use crate::log::waiting_line;
use crate::payload::{encode_payload, Payload};

/// Build and issue one request for `element`.
///
/// `payload` is created empty when not supplied. The token is reconciled into
/// it, `on_wait` runs, and the wait line is logged when `log_events` is set.
pub fn fire_on_event(
    host: &Host,
    element: &dyn Element,
    payload: Option<Payload>,
    options: Options,
) -> Result<Firing, AjaxError> {
    let mut settings = Settings::resolve(Settings::defaults_for(element), options);
    let mut payload = payload.unwrap_or_default();

    let token = reconcile_payload(settings.csrf_token.as_deref(), &mut payload);
    let body = encode_payload(&payload)?;
    settings.csrf_token = Some(token);

    let request = HttpRequest::post(
        settings.route_str().to_string(),
        settings.csrf_token.as_deref().unwrap_or_default(),
        RequestBody::UrlEncoded(body),
        settings.cache,
    );

    (settings.on_wait)();
    if settings.log_events {
        host.logger().record(&waiting_line(settings.route_str()));
    }

    Ok(Firing::new(request, settings, host.clone(), false, false))
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use serde_json::json;

    use super::*;
    use crate::dispatch::ResponseValue;
    use crate::dom::ROUTE_ATTRIBUTE;
    use crate::http::{BodyEncoding, Outcome};
    use crate::testing::{HookRecorder, MockElement, MockPage, RecordingLogger};

    fn host() -> (Host, Rc<RecordingLogger>, Rc<MockPage>) {
        let logger = Rc::new(RecordingLogger::new());
        let page = Rc::new(MockPage::with_controls(2));
        let host = Host::new(page.clone()).with_logger(logger.clone());
        (host, logger, page)
    }

    #[test]
    fn like_button_success_injects_html() {
        let (host, logger, _) = host();
        let hooks = HookRecorder::new();
        let element = MockElement::new();
        let target = Rc::new(MockElement::new());
        let payload = json!({"id": 5}).as_object().cloned();

        let firing = fire_on_event(
            &host,
            &element,
            payload,
            hooks.attach(Options::new().route("/like").load_html_to(target.clone())),
        )
        .unwrap();
        assert_eq!(hooks.waits(), 1);
        assert_eq!(firing.request().path, "/like");

        firing.resolve(Outcome::success("<span>12 likes</span>")).unwrap();

        let html = ResponseValue::Text("<span>12 likes</span>".to_string());
        assert_eq!(hooks.done(), vec![html.clone()]);
        assert_eq!(target.content(), Some(html));
        assert_eq!(hooks.errors(), 0);
        assert!(logger.lines().is_empty());
    }

    #[test]
    fn missing_payload_gets_token_field() {
        let (host, _, _) = host();
        let firing = fire_on_event(&host, &MockElement::new(), None, Options::new().csrf_token("abc")).unwrap();
        let req = firing.request();
        assert_eq!(req.body, RequestBody::UrlEncoded("csrf_token=abc".to_string()));
        assert_eq!(req.header("X-CSRF-Token"), Some("abc"));
        assert_eq!(req.encoding, BodyEncoding::Standard);
    }

    #[test]
    fn payload_token_becomes_header_when_none_configured() {
        let (host, _, _) = host();
        let payload = json!({"csrf_token": "page-token", "id": 1}).as_object().cloned();
        let firing = fire_on_event(&host, &MockElement::new(), payload, Options::new()).unwrap();
        assert_eq!(firing.token(), "page-token");
        assert_eq!(firing.request().header("X-CSRF-Token"), Some("page-token"));
        assert_eq!(
            firing.request().body,
            RequestBody::UrlEncoded("csrf_token=page-token&id=1".to_string())
        );
    }

    #[test]
    fn route_defaults_to_element_attribute() {
        let (host, _, _) = host();
        let element = MockElement::new().with_attribute(ROUTE_ATTRIBUTE, "/vote");
        let firing = fire_on_event(&host, &element, None, Options::new()).unwrap();
        assert_eq!(firing.request().path, "/vote");
    }

    #[test]
    fn never_touches_controls_even_when_asked() {
        let (host, _, page) = host();
        let firing = fire_on_event(
            &host,
            &MockElement::new(),
            None,
            Options::new().freeze_controls(true).parse_json(true),
        )
        .unwrap();
        assert!(!firing.froze_controls());
        assert!(page.none_frozen());
        assert_eq!(page.toggle_count(), 0);
        // parse_json is ignored on this path: a non-JSON body is delivered raw.
        firing.resolve(Outcome::success("not json")).unwrap();
    }

    #[test]
    fn wait_line_is_gated() {
        let (host, logger, _) = host();
        let _ = fire_on_event(&host, &MockElement::new(), None, Options::new().route("/a").log_events(true)).unwrap();
        assert_eq!(logger.lines(), vec![waiting_line("/a")]);
    }

    #[test]
    fn failure_calls_on_error_and_logs() {
        let (host, logger, _) = host();
        let hooks = HookRecorder::new();
        let firing = fire_on_event(&host, &MockElement::new(), None, hooks.attach(Options::new().route("/like"))).unwrap();
        firing.resolve(Outcome::failure("connection refused")).unwrap();
        assert_eq!(hooks.errors(), 1);
        assert_eq!(logger.lines().len(), 1);
        assert!(logger.lines()[0].contains("/like"));
    }

    #[test]
    fn cache_option_reaches_the_request() {
        let (host, _, _) = host();
        let cached = fire_on_event(&host, &MockElement::new(), None, Options::new().cache(true)).unwrap();
        assert!(cached.request().cache);

        let uncached = fire_on_event(&host, &MockElement::new(), None, Options::new()).unwrap();
        assert!(!uncached.request().cache);
    }
}
