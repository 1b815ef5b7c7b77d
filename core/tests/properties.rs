//! Property tests for settings resolution, token reconciliation and the two
//! form body encodings.

use std::rc::Rc;

use ajax_helper_core::csrf::{reconcile_payload, CSRF_FIELD};
use ajax_helper_core::dom::ROUTE_ATTRIBUTE;
use ajax_helper_core::testing::{MockElement, MockPage, MockSubmitEvent, RecordingLogger};
use ajax_helper_core::{FormBinding, Host, Options, Payload, RequestBody, Settings};
use proptest::option;
use proptest::prelude::*;
use serde_json::Value;

fn plain_options() -> impl Strategy<Value = Options> {
    (
        option::of("/[a-z]{1,8}"),
        option::of(any::<bool>()),
        option::of(any::<bool>()),
        option::of("[A-Za-z0-9]{0,12}"),
        option::of(any::<bool>()),
        option::of(any::<bool>()),
        option::of(any::<bool>()),
    )
        .prop_map(
            |(route, cache, log_events, csrf_token, is_encoded, freeze_controls, parse_json)| Options {
                route,
                cache,
                log_events,
                csrf_token,
                is_encoded,
                freeze_controls,
                parse_json,
                ..Options::default()
            },
        )
}

fn fields() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(("[a-z]{1,8}", "[A-Za-z0-9 ]{0,10}"), 0..6)
}

fn host() -> Host {
    Host::new(Rc::new(MockPage::with_controls(1))).with_logger(Rc::new(RecordingLogger::new()))
}

fn form_element(fields: &[(String, String)]) -> Rc<MockElement> {
    let borrowed: Vec<(&str, &str)> = fields.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    Rc::new(MockElement::form(&borrowed))
}

proptest! {
    #[test]
    fn caller_fields_win_and_absent_fields_keep_defaults(
        options in plain_options(),
        attr_route in option::of("/[a-z]{1,8}"),
    ) {
        let element = match &attr_route {
            Some(route) => MockElement::new().with_attribute(ROUTE_ATTRIBUTE, route),
            None => MockElement::new(),
        };
        let defaults = Settings::defaults_for(&element);
        let settings = Settings::resolve(defaults.clone(), options.clone());

        prop_assert_eq!(settings.route, options.route.or(defaults.route));
        prop_assert_eq!(settings.cache, options.cache.unwrap_or(defaults.cache));
        prop_assert_eq!(settings.log_events, options.log_events.unwrap_or(defaults.log_events));
        prop_assert_eq!(settings.csrf_token, options.csrf_token.or(defaults.csrf_token));
        prop_assert_eq!(settings.is_encoded, options.is_encoded.unwrap_or(defaults.is_encoded));
        prop_assert_eq!(
            settings.freeze_controls,
            options.freeze_controls.unwrap_or(defaults.freeze_controls)
        );
        prop_assert_eq!(settings.parse_json, options.parse_json.unwrap_or(defaults.parse_json));
        prop_assert!(Rc::ptr_eq(&settings.on_wait, &defaults.on_wait));
    }

    #[test]
    fn payload_and_effective_token_always_agree(
        configured in option::of("[A-Za-z0-9]{0,12}"),
        carried in option::of("[A-Za-z0-9]{0,12}"),
        extra in prop::collection::btree_map("[a-z]{1,6}", any::<i64>(), 0..4),
    ) {
        let mut payload = Payload::new();
        for (key, value) in extra {
            payload.insert(key, Value::from(value));
        }
        if let Some(token) = &carried {
            payload.insert(CSRF_FIELD.to_string(), Value::String(token.clone()));
        }

        let token = reconcile_payload(configured.as_deref(), &mut payload);

        prop_assert_eq!(&payload[CSRF_FIELD], &Value::String(token.clone()));
        let expected = configured.or(carried).unwrap_or_default();
        prop_assert_eq!(token, expected);
    }

    #[test]
    fn form_header_matches_body_token(
        fields in fields(),
        configured in option::of("[A-Za-z0-9]{1,12}"),
        is_encoded in any::<bool>(),
    ) {
        let mut options = Options::new().is_encoded(is_encoded);
        options.csrf_token = configured.clone();
        let binding = FormBinding::bind(&host(), form_element(&fields), options);
        let firing = binding.handle_submit(&MockSubmitEvent::new()).unwrap().unwrap();
        let header = firing.request().header("X-CSRF-Token").unwrap().to_string();

        let body_token = match &firing.request().body {
            RequestBody::Multipart(set) => set.get_text(CSRF_FIELD).map(str::to_string),
            RequestBody::UrlEncoded(body) => body.rsplit_once("&csrf_token=").map(|(_, t)| t.to_string()),
        };
        prop_assert_eq!(Some(header.clone()), body_token);
        if let Some(configured) = configured {
            prop_assert_eq!(header, configured);
        }
    }

    #[test]
    fn encoded_forms_never_carry_a_text_token_fragment(
        fields in fields(),
        token in "[A-Za-z0-9]{1,12}",
    ) {
        let binding = FormBinding::bind(&host(), form_element(&fields), Options::new().csrf_token(token.clone()));
        let firing = binding.handle_submit(&MockSubmitEvent::new()).unwrap().unwrap();
        match &firing.request().body {
            RequestBody::Multipart(set) => {
                prop_assert_eq!(set.count(CSRF_FIELD), 1);
                let wire = String::from_utf8(set.encode_multipart("B")).unwrap();
                prop_assert!(!wire.contains("csrf_token="));
            }
            other => prop_assert!(false, "expected multipart, got {:?}", other),
        }
    }

    #[test]
    fn serialized_forms_carry_exactly_one_token_suffix(
        fields in fields(),
        token in "[A-Za-z0-9]{1,12}",
    ) {
        let binding = FormBinding::bind(
            &host(),
            form_element(&fields),
            Options::new().is_encoded(false).csrf_token(token.clone()),
        );
        let firing = binding.handle_submit(&MockSubmitEvent::new()).unwrap().unwrap();
        match &firing.request().body {
            RequestBody::UrlEncoded(body) => {
                let suffix = format!("&csrf_token={token}");
                prop_assert!(body.ends_with(&suffix));
                prop_assert_eq!(body.matches("csrf_token=").count(), 1);
            }
            other => prop_assert!(false, "expected url-encoded body, got {:?}", other),
        }
    }
}
