//! Typed reads and the single write path between the annotation workflow and the document.

use crate::error::{Error, Result};
use crate::locator;
use annotator_model::{Document, ElementId, ExtensionRecord, Modeler, Moddle, PropertyPatch};
use serde_json::Value;

/// A business-object attribute as seen by the workflow.
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    Present(Value),
    Absent,
}

impl Annotation {
    pub fn is_present(&self) -> bool {
        matches!(self, Annotation::Present(_))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Annotation::Present(v) => Some(v),
            Annotation::Absent => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_value()?.as_f64()
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_value()?.as_str()
    }
}

/// Reads `attribute` of an element. Null, missing elements and empty strings are absent.
pub fn read_annotation(document: &Document, id: &str, attribute: &str) -> Annotation {
    let value = document
        .get(id)
        .and_then(|e| e.business_object().get(attribute));
    match value {
        None | Some(Value::Null) => Annotation::Absent,
        Some(Value::String(s)) if s.is_empty() => Annotation::Absent,
        Some(v) => Annotation::Present(v.clone()),
    }
}

pub fn read_extension_record<'a>(
    document: &'a Document,
    moddle: &Moddle,
    id: &str,
    type_tag: &str,
) -> Option<&'a ExtensionRecord> {
    let bo = document.get(id)?.business_object();
    locator::locate(bo, type_tag, moddle)
}

/// Applies `patch` to `id` as one undoable step.
///
/// Fails with [`Error::StaleTarget`] when the element left the document since it was
/// selected; nothing is written in that case.
pub fn commit(modeler: &mut Modeler, id: &ElementId, patch: PropertyPatch) -> Result<()> {
    if !modeler.document()?.contains(id.as_str()) {
        tracing::warn!(element = %id, "commit target no longer exists");
        return Err(Error::StaleTarget { id: id.clone() });
    }
    modeler.update_properties(id, patch)?;
    tracing::info!(element = %id, "annotation committed");
    Ok(())
}
