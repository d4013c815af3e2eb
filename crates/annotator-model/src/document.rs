//! Element container for one BPMN diagram.
//!
//! Elements are kept in insertion order (which is also XML document order after an
//! import) with an id index, plus explicit parent/children relations. There is exactly
//! one root; every other element has a parent.

use crate::element::{Element, ElementId};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

type ElementMap = IndexMap<ElementId, Element, FxBuildHasher>;

#[derive(Debug, Clone)]
pub struct Document {
    root: ElementId,
    elements: ElementMap,
    definitions: Definitions,
}

/// Attributes of the `<bpmn:definitions>` element that are not modelled as elements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Definitions {
    pub id: Option<String>,
    pub target_namespace: Option<String>,
    /// `(prefix, uri)` declarations for namespaces no registered package owns.
    pub foreign_namespaces: Vec<(String, String)>,
}

/// Elements taken out of a document by [`Document::remove`], in a form that can be put back
/// exactly where they were.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DetachedSubtree {
    parent: ElementId,
    position_in_parent: usize,
    /// The detached element first, then its descendants, each with its original map index.
    elements: Vec<(usize, Element)>,
}

impl DetachedSubtree {
    pub(crate) fn ids(&self) -> Vec<ElementId> {
        self.elements.iter().map(|(_, e)| e.id.clone()).collect()
    }
}

impl Document {
    pub fn new(mut root: Element) -> Self {
        root.parent = None;
        root.children.clear();
        let id = root.id.clone();
        let mut elements = ElementMap::default();
        elements.insert(id.clone(), root);
        Self {
            root: id,
            elements,
            definitions: Definitions::default(),
        }
    }

    pub fn definitions(&self) -> &Definitions {
        &self.definitions
    }

    pub(crate) fn set_definitions(&mut self, definitions: Definitions) {
        self.definitions = definitions;
    }

    pub fn root_id(&self) -> &ElementId {
        &self.root
    }

    pub fn root(&self) -> &Element {
        &self.elements[&self.root]
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// All elements, root first, in document order.
    pub fn elements(&self) -> impl DoubleEndedIterator<Item = &Element> {
        self.elements.values()
    }

    pub fn children(&self, id: &str) -> impl Iterator<Item = &Element> {
        self.elements
            .get(id)
            .map(|e| e.children.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|child| self.elements.get(child))
    }

    pub fn add(&mut self, parent: &ElementId, mut element: Element) -> Result<()> {
        if self.elements.contains_key(&element.id) {
            return Err(Error::DuplicateElement { id: element.id });
        }
        let Some(parent_entry) = self.elements.get_mut(parent) else {
            return Err(Error::UnknownElement { id: parent.clone() });
        };
        parent_entry.children.push(element.id.clone());
        element.parent = Some(parent.clone());
        self.elements.insert(element.id.clone(), element);
        Ok(())
    }

    /// Removes `id` and all of its descendants.
    pub(crate) fn remove(&mut self, id: &str) -> Result<DetachedSubtree> {
        let Some(element) = self.elements.get(id) else {
            return Err(Error::UnknownElement { id: id.into() });
        };
        let Some(parent) = element.parent.clone() else {
            return Err(Error::RootElement { action: "removed" });
        };

        let mut order: Vec<ElementId> = vec![element.id.clone()];
        let mut i = 0;
        while i < order.len() {
            if let Some(e) = self.elements.get(&order[i]) {
                order.extend(e.children.iter().cloned());
            }
            i += 1;
        }

        let mut position_in_parent = 0;
        if let Some(p) = self.elements.get_mut(&parent) {
            if let Some(pos) = p.children.iter().position(|c| c.as_str() == id) {
                p.children.remove(pos);
                position_in_parent = pos;
            }
        }

        let mut indexed: Vec<(usize, ElementId)> = order
            .into_iter()
            .filter_map(|eid| self.elements.get_index_of(&eid).map(|ix| (ix, eid)))
            .collect();
        // Remove from the back so earlier indexes stay valid while shifting.
        indexed.sort_by(|a, b| b.0.cmp(&a.0));
        let mut elements = Vec::with_capacity(indexed.len());
        for (ix, eid) in indexed {
            if let Some(e) = self.elements.shift_remove(&eid) {
                elements.push((ix, e));
            }
        }
        elements.reverse();
        // Detached element first.
        if let Some(pos) = elements.iter().position(|(_, e)| e.id.as_str() == id) {
            let head = elements.remove(pos);
            elements.insert(0, head);
        }

        Ok(DetachedSubtree {
            parent,
            position_in_parent,
            elements,
        })
    }

    pub(crate) fn restore(&mut self, subtree: DetachedSubtree) {
        let DetachedSubtree {
            parent,
            position_in_parent,
            mut elements,
        } = subtree;
        let Some((_, head)) = elements.first() else {
            return;
        };
        let head_id = head.id.clone();
        if let Some(p) = self.elements.get_mut(&parent) {
            let pos = position_in_parent.min(p.children.len());
            p.children.insert(pos, head_id);
        }
        elements.sort_by_key(|(ix, _)| *ix);
        for (ix, element) in elements {
            let id = element.id.clone();
            let (inserted_at, _) = self.elements.insert_full(id, element);
            if ix < inserted_at {
                self.elements.move_index(inserted_at, ix);
            }
        }
    }
}
