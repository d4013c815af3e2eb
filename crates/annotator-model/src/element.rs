//! Elements of an editable BPMN document and their semantic ("business") data.

use crate::geom::{Point, Rect};
use indexmap::IndexMap;
use serde_json::Value;
use std::borrow::Borrow;
use std::fmt;

/// Ordered attribute bag. Keys are property names as declared by the schema
/// (`name`, `suitable`, `emoji`, ...), values are typed JSON scalars.
pub type Attrs = IndexMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ElementId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ElementId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A typed side record stored in a business object's `extensionElements`.
///
/// Records of unregistered packages are kept as well (with the namespace they
/// were read from) so that import/export does not drop foreign data.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtensionRecord {
    type_name: String,
    namespace: Option<String>,
    attrs: Attrs,
}

impl ExtensionRecord {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            namespace: None,
            attrs: Attrs::new(),
        }
    }

    pub(crate) fn foreign(type_name: String, namespace: Option<String>, attrs: Attrs) -> Self {
        Self {
            type_name,
            namespace,
            attrs,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Namespace URI of a record that belongs to no registered package.
    pub fn foreign_namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).and_then(Value::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.attrs.insert(name.into(), value.into());
    }

    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }
}

/// The `bpmn:ExtensionElements` container: heterogeneous, order preserving.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtensionElements {
    pub values: Vec<ExtensionRecord>,
}

impl ExtensionElements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BusinessObject {
    type_name: String,
    id: String,
    attrs: Attrs,
    extension_elements: Option<ExtensionElements>,
}

impl BusinessObject {
    pub fn new(type_name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            id: id.into(),
            attrs: Attrs::new(),
            extension_elements: None,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).and_then(Value::as_str)
    }

    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    pub fn extension_elements(&self) -> Option<&ExtensionElements> {
        self.extension_elements.as_ref()
    }

    pub(crate) fn set_attr(&mut self, name: &str, value: Option<Value>) -> Option<Value> {
        match value {
            Some(value) => self.attrs.insert(name.to_string(), value),
            None => self.attrs.shift_remove(name),
        }
    }

    pub(crate) fn set_extension_elements(
        &mut self,
        value: Option<ExtensionElements>,
    ) -> Option<ExtensionElements> {
        std::mem::replace(&mut self.extension_elements, value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    /// The process (or collaboration) the diagram is drawn on. Never has a parent.
    Root,
    Shape { bounds: Rect },
    Connection { waypoints: Vec<Point> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub(crate) id: ElementId,
    pub(crate) parent: Option<ElementId>,
    pub(crate) children: Vec<ElementId>,
    pub(crate) kind: ElementKind,
    pub(crate) business_object: BusinessObject,
}

impl Element {
    pub fn new(kind: ElementKind, business_object: BusinessObject) -> Self {
        Self {
            id: ElementId::new(business_object.id()),
            parent: None,
            children: Vec::new(),
            kind,
            business_object,
        }
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn parent(&self) -> Option<&ElementId> {
        self.parent.as_ref()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub fn bounds(&self) -> Option<Rect> {
        match &self.kind {
            ElementKind::Shape { bounds } => Some(*bounds),
            _ => None,
        }
    }

    pub fn business_object(&self) -> &BusinessObject {
        &self.business_object
    }

    pub(crate) fn business_object_mut(&mut self) -> &mut BusinessObject {
        &mut self.business_object
    }
}
