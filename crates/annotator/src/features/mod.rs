//! The annotations a panel can edit.

mod emoji;
mod score;

pub use emoji::EmojiAnnotation;
pub use score::SuitabilityScore;

use crate::adapter::Annotation;
use crate::error::Result;
use annotator_model::{Document, ElementId, Moddle, Modeler, PropertyPatch};
use serde_json::Value;

/// What a [`PanelController`](crate::PanelController) needs to know about one kind of
/// annotation: where it lives, how it is shown, how input is validated and what a submit
/// writes.
pub trait AnnotationFeature {
    fn name(&self) -> &'static str;

    /// Business-object attribute holding the annotation.
    fn attribute(&self) -> &'static str;

    /// Whether a right-click on `id` opens this feature's panel. Declined targets are left
    /// to lower-priority handlers and the host.
    fn accepts(&self, _document: &Document, _id: &str) -> bool {
        true
    }

    /// Whether the panel has a text field that takes focus when it opens.
    fn has_input_field(&self) -> bool;

    fn field_text(&self, annotation: &Annotation) -> String;

    /// Secondary read-only line shown under the field.
    fn detail_text(&self, _document: &Document, _moddle: &Moddle, _id: &str) -> String {
        String::new()
    }

    /// The value to store for `input`, or `None` when the input is not acceptable.
    fn parse(&self, input: &str) -> Option<Value>;

    /// Everything one submit writes, as a single patch. New extension records come from
    /// [`Modeler::create_record`].
    fn patch(&self, modeler: &Modeler, id: &ElementId, value: Value) -> Result<PropertyPatch>;
}
