use crate::command::{CommandStack, PropertyPatch};
use crate::document::Document;
use crate::element::{BusinessObject, ElementId, ExtensionRecord};
use crate::error::{Error, ImportError, Result};
use crate::event::{
    ELEMENT_CONTEXTMENU, ELEMENTS_CHANGED, Event, EventBus, IMPORT_DONE, ListenerId,
};
use crate::moddle::Moddle;
use std::sync::Arc;

/// Headless editor host: one document plus the services that edit it.
///
/// Every mutation goes through [`Modeler::update_properties`] or
/// [`Modeler::remove_element`], which record the change on the undo stack and fire
/// `elements.changed` exactly once.
#[derive(Debug)]
pub struct Modeler {
    moddle: Arc<Moddle>,
    document: Option<Document>,
    command_stack: CommandStack,
    event_bus: EventBus,
    native_menu: Option<ElementId>,
}

impl Modeler {
    pub fn new(moddle: Moddle) -> Self {
        Self::with_moddle(Arc::new(moddle))
    }

    pub fn with_moddle(moddle: Arc<Moddle>) -> Self {
        Self {
            moddle,
            document: None,
            command_stack: CommandStack::new(),
            event_bus: EventBus::new(),
            native_menu: None,
        }
    }

    pub fn moddle(&self) -> &Arc<Moddle> {
        &self.moddle
    }

    /// Synchronous variant of [`Modeler::import_xml`].
    ///
    /// On failure the previously loaded document (if any) stays in place.
    pub fn import_xml_sync(&mut self, xml: &str) -> std::result::Result<Vec<String>, ImportError> {
        let outcome = crate::import::import_xml(xml, &self.moddle)?;
        tracing::info!(
            elements = outcome.document.len(),
            warnings = outcome.warnings.len(),
            "document imported"
        );
        self.document = Some(outcome.document);
        self.command_stack.clear();
        self.native_menu = None;
        self.fire(IMPORT_DONE, &mut Event::new());
        Ok(outcome.warnings)
    }

    /// Imports BPMN XML, replacing the current document. Returns import warnings.
    ///
    /// Runtime-agnostic: the work is CPU-bound and performs no I/O.
    pub async fn import_xml(&mut self, xml: &str) -> std::result::Result<Vec<String>, ImportError> {
        self.import_xml_sync(xml)
    }

    pub fn save_xml(&self) -> Result<String> {
        let document = self.document()?;
        Ok(crate::export::export_xml(document, &self.moddle))
    }

    pub fn document(&self) -> Result<&Document> {
        self.document.as_ref().ok_or(Error::NoDocument)
    }

    pub fn business_object(&self, id: &str) -> Option<&BusinessObject> {
        self.document
            .as_ref()?
            .get(id)
            .map(|e| e.business_object())
    }

    /// `true` when the element exists and its type is (a subtype of) `type_name`.
    pub fn create_record(&self, type_tag: &str) -> Result<ExtensionRecord> {
        self.moddle.create(type_tag)
    }

    pub fn update_properties(&mut self, id: &ElementId, patch: PropertyPatch) -> Result<()> {
        let document = self.document.as_mut().ok_or(Error::NoDocument)?;
        let changed = self.command_stack.update_properties(document, id, patch)?;
        tracing::debug!(element = %id, "properties updated");
        self.elements_changed(changed);
        Ok(())
    }

    pub fn remove_element(&mut self, id: &ElementId) -> Result<()> {
        let document = self.document.as_mut().ok_or(Error::NoDocument)?;
        let changed = self.command_stack.remove_element(document, id)?;
        tracing::debug!(element = %id, removed = changed.len(), "element removed");
        if self.native_menu.as_ref() == Some(id) {
            self.native_menu = None;
        }
        self.elements_changed(changed);
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.command_stack.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.command_stack.can_redo()
    }

    /// Returns `false` when there was nothing to undo.
    pub fn undo(&mut self) -> Result<bool> {
        let document = self.document.as_mut().ok_or(Error::NoDocument)?;
        match self.command_stack.undo(document)? {
            Some(changed) => {
                self.elements_changed(changed);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn redo(&mut self) -> Result<bool> {
        let document = self.document.as_mut().ok_or(Error::NoDocument)?;
        match self.command_stack.redo(document)? {
            Some(changed) => {
                self.elements_changed(changed);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn on(
        &mut self,
        event: &str,
        priority: i32,
        listener: impl FnMut(&mut Event, &Document) + 'static,
    ) -> ListenerId {
        self.event_bus.on(event, priority, listener)
    }

    pub fn off(&mut self, event: &str, id: ListenerId) -> bool {
        self.event_bus.off(event, id)
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.event_bus.listener_count(event)
    }

    /// Fires `event_name` to listeners. Without a document there is nothing to fire against
    /// and the call is a no-op.
    pub fn fire(&mut self, event_name: &str, event: &mut Event) {
        let Some(document) = self.document.as_ref() else {
            return;
        };
        self.event_bus.fire(event_name, event, document);
    }

    /// Right-click on an element. Listeners get the first say; unless one of them prevents
    /// the default, the host shows its own context menu for the element.
    pub fn context_menu(&mut self, id: &ElementId) -> Result<Event> {
        if !self.document()?.contains(id.as_str()) {
            return Err(Error::UnknownElement { id: id.clone() });
        }
        let mut event = Event::for_element(id.clone());
        self.fire(ELEMENT_CONTEXTMENU, &mut event);
        if event.default_prevented() {
            tracing::debug!(element = %id, "host context menu suppressed");
        } else {
            self.native_menu = Some(id.clone());
        }
        Ok(event)
    }

    /// Element the host's built-in context menu is currently open for.
    pub fn native_menu(&self) -> Option<&ElementId> {
        self.native_menu.as_ref()
    }

    pub fn close_native_menu(&mut self) {
        self.native_menu = None;
    }

    fn elements_changed(&mut self, changed: Vec<ElementId>) {
        let mut event = Event::for_elements(changed);
        self.fire(ELEMENTS_CHANGED, &mut event);
    }
}
