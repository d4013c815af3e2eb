//! Priority event bus.
//!
//! Listeners run from highest to lowest priority; listeners with equal priority run in
//! registration order. Any listener may stop propagation to the remaining listeners and/or
//! prevent the host's default behavior for the event.

use crate::document::Document;
use crate::element::ElementId;
use rustc_hash::FxHashMap;
use std::fmt;

pub const DEFAULT_PRIORITY: i32 = 1000;

pub const ELEMENT_CONTEXTMENU: &str = "element.contextmenu";
pub const ELEMENTS_CHANGED: &str = "elements.changed";
pub const IMPORT_DONE: &str = "import.done";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    pub element: Option<ElementId>,
    pub elements: Vec<ElementId>,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl Event {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_element(element: ElementId) -> Self {
        Self {
            element: Some(element),
            ..Self::default()
        }
    }

    pub fn for_elements(elements: Vec<ElementId>) -> Self {
        Self {
            elements,
            ..Self::default()
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

pub type Listener = Box<dyn FnMut(&mut Event, &Document)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Registration {
    id: ListenerId,
    priority: i32,
    listener: Listener,
}

#[derive(Default)]
pub struct EventBus {
    listeners: FxHashMap<String, Vec<Registration>>,
    next_id: u64,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut counts: Vec<(&str, usize)> = self
            .listeners
            .iter()
            .map(|(k, v)| (k.as_str(), v.len()))
            .collect();
        counts.sort();
        f.debug_struct("EventBus").field("listeners", &counts).finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(
        &mut self,
        event: &str,
        priority: i32,
        listener: impl FnMut(&mut Event, &Document) + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        let slot = self.listeners.entry(event.to_string()).or_default();
        let pos = slot
            .iter()
            .position(|r| r.priority < priority)
            .unwrap_or(slot.len());
        slot.insert(
            pos,
            Registration {
                id,
                priority,
                listener: Box::new(listener),
            },
        );
        id
    }

    pub fn off(&mut self, event: &str, id: ListenerId) -> bool {
        let Some(slot) = self.listeners.get_mut(event) else {
            return false;
        };
        let before = slot.len();
        slot.retain(|r| r.id != id);
        slot.len() != before
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.get(event).map_or(0, Vec::len)
    }

    pub fn fire(&mut self, event_name: &str, event: &mut Event, document: &Document) {
        let Some(slot) = self.listeners.get_mut(event_name) else {
            return;
        };
        for registration in slot.iter_mut() {
            (registration.listener)(event, document);
            if event.propagation_stopped() {
                tracing::trace!(event = event_name, "propagation stopped");
                break;
            }
        }
    }
}
