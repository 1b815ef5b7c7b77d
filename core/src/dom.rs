//! Page collaborators the orchestrator drives but never implements.
//!
//! # Design
//! Element handles are shared (`Rc<dyn Element>`) and mutated through `&self`,
//! the way DOM handles behave: the page owns the node, everyone else holds a
//! reference. Everything runs on one thread, so no `Send`/`Sync` bounds.
//!
//! Control freezing is page-wide. `Page::interactive_controls` answers with
//! every control on the page, not only those inside the submitting form, and
//! overlapping submissions toggle that shared state last-writer-wins.

use std::rc::Rc;

use crate::dispatch::ResponseValue;
use crate::payload::FieldSet;

/// Class added to controls while they are frozen.
pub const DISABLED_CLASS: &str = "disabled";

/// Attribute an element declares its default route under.
pub const ROUTE_ATTRIBUTE: &str = "data-ajax-route";

/// An opaque handle to a page element.
pub trait Element {
    fn attribute(&self, name: &str) -> Option<String>;

    /// Replace the element's content with `content`, as-is.
    fn set_inner_content(&self, content: &ResponseValue);

    fn set_disabled(&self, disabled: bool);

    fn add_class(&self, class: &str);

    fn remove_class(&self, class: &str);

    /// The form view of this element, if it is a form.
    fn as_form(&self) -> Option<&dyn FormFields> {
        None
    }
}

/// Read access to a form's current field values.
pub trait FormFields {
    /// Current values as a structured, multipart-capable field set.
    fn field_set(&self) -> FieldSet;

    /// Current values as one URL-encoded string (`a=1&b=2`).
    fn serialize(&self) -> String;
}

/// The page-wide control query used for freezing.
pub trait Page {
    fn interactive_controls(&self) -> Vec<Rc<dyn Element>>;
}

/// A native submission event.
pub trait SubmitEvent {
    fn prevent_default(&self);
}

/// Disable every interactive control on the page and mark it disabled.
pub fn freeze_controls(page: &dyn Page) {
    for control in page.interactive_controls() {
        control.set_disabled(true);
        control.add_class(DISABLED_CLASS);
    }
}

/// Re-enable every interactive control on the page and clear the marking.
pub fn thaw_controls(page: &dyn Page) {
    for control in page.interactive_controls() {
        control.set_disabled(false);
        control.remove_class(DISABLED_CLASS);
    }
}
