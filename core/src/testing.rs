//! Recording doubles for the page, the logger and the transport.
//!
//! Available to this crate's unit tests and, through the `testing` feature,
//! to integration tests and downstream crates.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use crate::config::Options;
use crate::dispatch::ResponseValue;
use crate::dom::{Element, FormFields, Page, SubmitEvent};
use crate::http::{HttpRequest, Outcome};
use crate::log::Logger;
use crate::payload::FieldSet;
use crate::transport::Transport;

/// In-memory form state backing a `MockElement` created with `form`.
#[derive(Debug, Default)]
pub struct MockForm {
    fields: RefCell<Vec<(String, String)>>,
}

impl FormFields for MockForm {
    fn field_set(&self) -> FieldSet {
        self.fields.borrow().iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    fn serialize(&self) -> String {
        serde_urlencoded::to_string(&*self.fields.borrow()).unwrap_or_default()
    }
}

/// An element that records everything done to it.
#[derive(Debug, Default)]
pub struct MockElement {
    attributes: HashMap<String, String>,
    content: RefCell<Option<ResponseValue>>,
    disabled: Cell<bool>,
    toggles: Cell<usize>,
    classes: RefCell<BTreeSet<String>>,
    form: Option<MockForm>,
}

impl MockElement {
    pub fn new() -> Self {
        Self::default()
    }

    /// A form element holding `fields` in order.
    pub fn form(fields: &[(&str, &str)]) -> Self {
        let fields = fields.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Self {
            form: Some(MockForm {
                fields: RefCell::new(fields),
            }),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    /// Overwrite (or add) a form field, as a user typing would.
    pub fn set_field(&self, name: &str, value: &str) {
        if let Some(form) = &self.form {
            let mut fields = form.fields.borrow_mut();
            match fields.iter_mut().find(|(k, _)| k == name) {
                Some(field) => field.1 = value.to_string(),
                None => fields.push((name.to_string(), value.to_string())),
            }
        }
    }

    pub fn content(&self) -> Option<ResponseValue> {
        self.content.borrow().clone()
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.get()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.borrow().contains(class)
    }

    /// Number of `set_disabled` calls received.
    pub fn toggles(&self) -> usize {
        self.toggles.get()
    }
}

impl Element for MockElement {
    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).cloned()
    }

    fn set_inner_content(&self, content: &ResponseValue) {
        *self.content.borrow_mut() = Some(content.clone());
    }

    fn set_disabled(&self, disabled: bool) {
        self.disabled.set(disabled);
        self.toggles.set(self.toggles.get() + 1);
    }

    fn add_class(&self, class: &str) {
        self.classes.borrow_mut().insert(class.to_string());
    }

    fn remove_class(&self, class: &str) {
        self.classes.borrow_mut().remove(class);
    }

    fn as_form(&self) -> Option<&dyn FormFields> {
        self.form.as_ref().map(|f| f as &dyn FormFields)
    }
}

/// A page whose interactive controls are plain `MockElement`s.
#[derive(Debug, Default)]
pub struct MockPage {
    controls: Vec<Rc<MockElement>>,
}

impl MockPage {
    pub fn with_controls(count: usize) -> Self {
        Self {
            controls: (0..count).map(|_| Rc::new(MockElement::new())).collect(),
        }
    }

    pub fn controls(&self) -> &[Rc<MockElement>] {
        &self.controls
    }

    /// Every control disabled and carrying the `disabled` class.
    pub fn all_frozen(&self) -> bool {
        self.controls
            .iter()
            .all(|c| c.is_disabled() && c.has_class(crate::dom::DISABLED_CLASS))
    }

    /// No control disabled and none carrying the `disabled` class.
    pub fn none_frozen(&self) -> bool {
        self.controls
            .iter()
            .all(|c| !c.is_disabled() && !c.has_class(crate::dom::DISABLED_CLASS))
    }

    /// Total `set_disabled` calls across all controls.
    pub fn toggle_count(&self) -> usize {
        self.controls.iter().map(|c| c.toggles()).sum()
    }
}

impl Page for MockPage {
    fn interactive_controls(&self) -> Vec<Rc<dyn Element>> {
        self.controls
            .iter()
            .map(|c| c.clone() as Rc<dyn Element>)
            .collect()
    }
}

/// Keeps every recorded line.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    lines: RefCell<Vec<String>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

impl Logger for RecordingLogger {
    fn record(&self, line: &str) {
        self.lines.borrow_mut().push(line.to_string());
    }
}

#[derive(Debug, Default)]
pub struct MockSubmitEvent {
    prevented: Cell<bool>,
}

impl MockSubmitEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevented(&self) -> bool {
        self.prevented.get()
    }
}

impl SubmitEvent for MockSubmitEvent {
    fn prevent_default(&self) {
        self.prevented.set(true);
    }
}

/// Records calls to the three lifecycle hooks.
#[derive(Debug, Default)]
pub struct HookRecorder {
    waits: Cell<usize>,
    done: RefCell<Vec<ResponseValue>>,
    errors: Cell<usize>,
}

impl HookRecorder {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Attach recording hooks to `options`.
    pub fn attach(self: &Rc<Self>, options: Options) -> Options {
        let waits = Rc::clone(self);
        let done = Rc::clone(self);
        let errors = Rc::clone(self);
        options
            .on_wait(move || waits.waits.set(waits.waits.get() + 1))
            .on_done(move |value| done.done.borrow_mut().push(value.clone()))
            .on_error(move || errors.errors.set(errors.errors.get() + 1))
    }

    pub fn waits(&self) -> usize {
        self.waits.get()
    }

    pub fn done(&self) -> Vec<ResponseValue> {
        self.done.borrow().clone()
    }

    pub fn errors(&self) -> usize {
        self.errors.get()
    }
}

/// Answers every request with the same outcome and keeps the requests.
#[derive(Debug)]
pub struct StaticTransport {
    outcome: Outcome,
    requests: RefCell<Vec<HttpRequest>>,
}

impl StaticTransport {
    pub fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }
}

impl Transport for StaticTransport {
    async fn send(&self, request: &HttpRequest) -> Outcome {
        self.requests.borrow_mut().push(request.clone());
        self.outcome.clone()
    }
}
