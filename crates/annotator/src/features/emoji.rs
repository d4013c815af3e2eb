use super::AnnotationFeature;
use crate::adapter::{self, Annotation};
use crate::error::{Error, Result};
use annotator_model::{Document, ElementId, Modeler, PropertyPatch};
use annotator_render::EMOJI_ATTR;
use serde_json::Value;

/// Emoji shown inside a task. Only elements that already carry an emoji open the picker.
#[derive(Debug, Clone)]
pub struct EmojiAnnotation {
    palette: Vec<String>,
}

impl EmojiAnnotation {
    pub fn new(palette: Vec<String>) -> Self {
        Self { palette }
    }

    pub fn palette(&self) -> &[String] {
        &self.palette
    }
}

impl AnnotationFeature for EmojiAnnotation {
    fn name(&self) -> &'static str {
        "emoji"
    }

    fn attribute(&self) -> &'static str {
        EMOJI_ATTR
    }

    fn accepts(&self, document: &Document, id: &str) -> bool {
        adapter::read_annotation(document, id, EMOJI_ATTR).is_present()
    }

    fn has_input_field(&self) -> bool {
        false
    }

    fn field_text(&self, annotation: &Annotation) -> String {
        annotation.as_str().unwrap_or_default().to_string()
    }

    fn parse(&self, input: &str) -> Option<Value> {
        self.palette
            .iter()
            .find(|e| e.as_str() == input)
            .map(|e| Value::String(e.clone()))
    }

    fn patch(&self, modeler: &Modeler, id: &ElementId, value: Value) -> Result<PropertyPatch> {
        if !modeler.document()?.contains(id.as_str()) {
            return Err(Error::StaleTarget { id: id.clone() });
        }
        Ok(PropertyPatch::new().set(EMOJI_ATTR, value))
    }
}
