//! Request lifecycle orchestration for page elements and forms.
//!
//! # Overview
//! Two entry points share one engine. `fire_on_event` posts an arbitrary
//! payload from inside a caller's event handler. `FormBinding` intercepts a
//! form's native submission and posts its fields. Both reconcile a CSRF token
//! into the payload and the `X-CSRF-Token` header, run the lifecycle hooks,
//! and route the response to `on_done`/`on_error` and optionally into a target
//! element.
//!
//! # Design
//! - Host-does-IO: every trigger yields a `Firing` holding a plain-data
//!   `HttpRequest`. The host executes it and hands the `Outcome` back through
//!   `Firing::resolve`, or uses `Firing::send` with a `Transport`.
//! - The page, the logger and the transport are traits the host implements;
//!   the crate holds no globals.
//! - Single-threaded: handles are `Rc`, hooks are `Rc<dyn Fn>`.

pub mod config;
pub mod csrf;
pub mod dispatch;
pub mod dom;
pub mod error;
pub mod event;
pub mod firing;
pub mod form;
pub mod http;
pub mod log;
pub mod payload;
pub mod transport;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::{Options, Settings};
pub use dispatch::{ResponseDispatcher, ResponseValue};
pub use dom::{Element, FormFields, Page, SubmitEvent};
pub use error::AjaxError;
pub use event::fire_on_event;
pub use firing::{Firing, Host};
pub use form::FormBinding;
pub use http::{BodyEncoding, HttpMethod, HttpRequest, HttpResponse, Outcome, RequestBody};
pub use log::{Logger, TracingLogger};
pub use payload::{FieldSet, FieldValue, Payload};
pub use transport::Transport;
