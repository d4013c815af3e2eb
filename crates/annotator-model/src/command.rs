//! Undoable document mutations.

use crate::document::{DetachedSubtree, Document};
use crate::element::{ElementId, ExtensionElements};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde_json::Value;

/// A set of property changes applied to one element in a single step.
///
/// `None` attribute values unset the attribute. The extension collection is only touched
/// when [`PropertyPatch::extension_elements`] was called.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyPatch {
    attrs: IndexMap<String, Option<Value>>,
    extension_elements: Option<Option<ExtensionElements>>,
}

impl PropertyPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(name.into(), Some(value.into()));
        self
    }

    pub fn unset(mut self, name: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), None);
        self
    }

    pub fn extension_elements(mut self, value: ExtensionElements) -> Self {
        self.extension_elements = Some(Some(value));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty() && self.extension_elements.is_none()
    }

    pub fn attr(&self, name: &str) -> Option<Option<&Value>> {
        self.attrs.get(name).map(Option::as_ref)
    }

    pub fn touches_extension_elements(&self) -> bool {
        self.extension_elements.is_some()
    }

    /// Applies the patch and returns the patch that reverts it.
    fn apply(self, document: &mut Document, id: &ElementId) -> Result<PropertyPatch> {
        let Some(element) = document.get_mut(id.as_str()) else {
            return Err(Error::UnknownElement { id: id.clone() });
        };
        let bo = element.business_object_mut();
        let mut inverse = PropertyPatch::new();
        for (name, value) in self.attrs {
            let previous = bo.set_attr(&name, value);
            inverse.attrs.insert(name, previous);
        }
        if let Some(ext) = self.extension_elements {
            let previous = bo.set_extension_elements(ext);
            inverse.extension_elements = Some(previous);
        }
        Ok(inverse)
    }
}

#[derive(Debug, Clone)]
enum Command {
    UpdateProperties {
        element: ElementId,
        /// Patch that produces the state on the other side of the stack.
        patch: PropertyPatch,
    },
    RemoveElement {
        element: ElementId,
        detached: Option<DetachedSubtree>,
    },
}

impl Command {
    /// Executes the command, turning it into its own inverse. Returns the affected ids.
    fn run(&mut self, document: &mut Document) -> Result<Vec<ElementId>> {
        match self {
            Command::UpdateProperties { element, patch } => {
                let forward = std::mem::take(patch);
                *patch = forward.apply(document, element)?;
                Ok(vec![element.clone()])
            }
            Command::RemoveElement { element, detached } => match detached.take() {
                Some(subtree) => {
                    let ids = subtree.ids();
                    document.restore(subtree);
                    Ok(ids)
                }
                None => {
                    let subtree = document.remove(element.as_str())?;
                    let ids = subtree.ids();
                    *detached = Some(subtree);
                    Ok(ids)
                }
            },
        }
    }
}

/// Linear undo/redo history. Executing a new command clears the redo side.
#[derive(Debug, Clone, Default)]
pub struct CommandStack {
    undo: Vec<Command>,
    redo: Vec<Command>,
}

impl CommandStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    pub(crate) fn update_properties(
        &mut self,
        document: &mut Document,
        element: &ElementId,
        patch: PropertyPatch,
    ) -> Result<Vec<ElementId>> {
        self.execute(
            document,
            Command::UpdateProperties {
                element: element.clone(),
                patch,
            },
        )
    }

    pub(crate) fn remove_element(
        &mut self,
        document: &mut Document,
        element: &ElementId,
    ) -> Result<Vec<ElementId>> {
        self.execute(
            document,
            Command::RemoveElement {
                element: element.clone(),
                detached: None,
            },
        )
    }

    fn execute(&mut self, document: &mut Document, mut command: Command) -> Result<Vec<ElementId>> {
        let changed = command.run(document)?;
        self.undo.push(command);
        self.redo.clear();
        Ok(changed)
    }

    /// Reverts the last command. `Ok(None)` when there is nothing to undo.
    pub(crate) fn undo(&mut self, document: &mut Document) -> Result<Option<Vec<ElementId>>> {
        let Some(mut command) = self.undo.pop() else {
            return Ok(None);
        };
        let changed = command.run(document)?;
        self.redo.push(command);
        Ok(Some(changed))
    }

    pub(crate) fn redo(&mut self, document: &mut Document) -> Result<Option<Vec<ElementId>>> {
        let Some(mut command) = self.redo.pop() else {
            return Ok(None);
        };
        let changed = command.run(document)?;
        self.undo.push(command);
        Ok(Some(changed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{BusinessObject, Element, ElementKind, ExtensionRecord};
    use crate::geom::bounds;
    use serde_json::json;

    fn doc() -> Document {
        let root = Element::new(ElementKind::Root, BusinessObject::new("bpmn:Process", "P"));
        let mut doc = Document::new(root);
        doc.add(
            &ElementId::new("P"),
            Element::new(
                ElementKind::Shape {
                    bounds: bounds(0.0, 0.0, 100.0, 80.0),
                },
                BusinessObject::new("bpmn:Task", "T"),
            ),
        )
        .unwrap();
        doc
    }

    #[test]
    fn update_then_undo_then_redo() {
        let mut doc = doc();
        let mut stack = CommandStack::new();
        let t = ElementId::new("T");

        let mut record = ExtensionRecord::new("qa:AnalysisDetails");
        record.set("lastChecked", "2024-01-01T00:00:00.000Z");
        let ext = ExtensionElements {
            values: vec![record],
        };
        let patch = PropertyPatch::new()
            .set("suitable", 7.5)
            .extension_elements(ext.clone());
        let changed = stack.update_properties(&mut doc, &t, patch).unwrap();
        assert_eq!(changed, vec![t.clone()]);

        let bo = doc.get("T").unwrap().business_object();
        assert_eq!(bo.get("suitable"), Some(&json!(7.5)));
        assert_eq!(bo.extension_elements(), Some(&ext));

        stack.undo(&mut doc).unwrap().unwrap();
        let bo = doc.get("T").unwrap().business_object();
        assert_eq!(bo.get("suitable"), None);
        assert_eq!(bo.extension_elements(), None);
        assert!(stack.can_redo());

        stack.redo(&mut doc).unwrap().unwrap();
        let bo = doc.get("T").unwrap().business_object();
        assert_eq!(bo.get("suitable"), Some(&json!(7.5)));
        assert_eq!(bo.extension_elements(), Some(&ext));
    }

    #[test]
    fn new_command_clears_redo() {
        let mut doc = doc();
        let mut stack = CommandStack::new();
        let t = ElementId::new("T");
        stack
            .update_properties(&mut doc, &t, PropertyPatch::new().set("name", "a"))
            .unwrap();
        stack.undo(&mut doc).unwrap();
        stack
            .update_properties(&mut doc, &t, PropertyPatch::new().set("name", "b"))
            .unwrap();
        assert!(!stack.can_redo());
        assert_eq!(stack.redo(&mut doc).unwrap(), None);
    }

    #[test]
    fn remove_is_undoable() {
        let mut doc = doc();
        let mut stack = CommandStack::new();
        let t = ElementId::new("T");
        stack.remove_element(&mut doc, &t).unwrap();
        assert!(!doc.contains("T"));
        stack.undo(&mut doc).unwrap();
        assert!(doc.contains("T"));
        assert_eq!(doc.get("T").unwrap().parent().unwrap().as_str(), "P");
    }

    #[test]
    fn unknown_element_is_not_recorded() {
        let mut doc = doc();
        let mut stack = CommandStack::new();
        let err = stack
            .update_properties(
                &mut doc,
                &ElementId::new("gone"),
                PropertyPatch::new().set("name", "x"),
            )
            .unwrap_err();
        assert!(matches!(err, Error::UnknownElement { .. }));
        assert!(!stack.can_undo());
    }
}
