//! Translates user gestures into panel controller calls.

use crate::controller::{PanelController, SubmitOutcome, TargetOutcome};
use crate::error::Result;
use crate::features::AnnotationFeature;
use annotator_model::event::ELEMENT_CONTEXTMENU;
use annotator_model::{ElementId, ListenerId, Modeler};
use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

pub const ESCAPE: &str = "Escape";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gesture {
    ContextMenu(ElementId),
    PointerDown { inside_panel: bool },
    KeyDown(String),
    Input(String),
    Submit,
    /// Choosing a value from a fixed set, e.g. an emoji button.
    Pick(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routed {
    ContextMenu { default_prevented: bool },
    Dismissed,
    Edited { valid: bool },
    Submitted(SubmitOutcome),
    Unhandled,
}

/// Connects one panel controller to the host: a context-menu listener on the event bus plus
/// the panel's own gestures.
#[derive(Debug)]
pub struct Router<F> {
    controller: Rc<RefCell<PanelController<F>>>,
    /// Set when this router's listener took the latest context-menu event.
    claimed: Rc<Cell<bool>>,
    listener: ListenerId,
    priority: i32,
}

impl<F: AnnotationFeature + 'static> Router<F> {
    /// Registers the context-menu listener at `priority`. Pick a priority above the host's
    /// default so the panel pre-empts the built-in menu.
    pub fn attach(modeler: &mut Modeler, controller: PanelController<F>, priority: i32) -> Self {
        let controller = Rc::new(RefCell::new(controller));
        let claimed = Rc::new(Cell::new(false));
        let shared = Rc::clone(&controller);
        let took = Rc::clone(&claimed);
        let listener = modeler.on(ELEMENT_CONTEXTMENU, priority, move |event, document| {
            let Some(id) = event.element.clone() else {
                return;
            };
            let outcome = shared.borrow_mut().targeted(document, &id);
            if outcome != TargetOutcome::Declined {
                took.set(true);
                event.prevent_default();
                event.stop_propagation();
            }
        });
        tracing::debug!(
            feature = controller.borrow().feature().name(),
            priority,
            "context menu listener registered"
        );
        Self {
            controller,
            claimed,
            listener,
            priority,
        }
    }

    /// Closes the panel unless this router took the last context-menu event, then resets the
    /// claim. A handler with higher priority may have stopped the event before it got here.
    pub(crate) fn release_if_unclaimed(&self) -> bool {
        let released = !self.claimed.replace(false) && self.controller.borrow_mut().dismiss();
        if released {
            tracing::debug!(priority = self.priority, "panel released to another handler");
        }
        released
    }

    /// Removes the context-menu listener. Returns `false` if it was already gone.
    pub fn detach(&self, modeler: &mut Modeler) -> bool {
        modeler.off(ELEMENT_CONTEXTMENU, self.listener)
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn controller(&self) -> Ref<'_, PanelController<F>> {
        self.controller.borrow()
    }

    pub fn handle(&self, modeler: &mut Modeler, gesture: Gesture) -> Result<Routed> {
        tracing::debug!(gesture = ?gesture, "gesture");
        let routed = match gesture {
            Gesture::ContextMenu(id) => {
                let event = modeler.context_menu(&id)?;
                self.release_if_unclaimed();
                Routed::ContextMenu {
                    default_prevented: event.default_prevented(),
                }
            }
            Gesture::PointerDown { inside_panel } => {
                if !inside_panel && self.controller.borrow_mut().dismiss() {
                    Routed::Dismissed
                } else {
                    Routed::Unhandled
                }
            }
            Gesture::KeyDown(key) => {
                let mut controller = self.controller.borrow_mut();
                if key == ESCAPE && controller.view().focused && controller.dismiss() {
                    Routed::Dismissed
                } else {
                    Routed::Unhandled
                }
            }
            Gesture::Input(text) => {
                let mut controller = self.controller.borrow_mut();
                if controller.is_open() {
                    Routed::Edited {
                        valid: controller.input_changed(&text),
                    }
                } else {
                    Routed::Unhandled
                }
            }
            Gesture::Submit => Routed::Submitted(self.controller.borrow_mut().submit(modeler)),
            Gesture::Pick(value) => {
                let mut controller = self.controller.borrow_mut();
                controller.input_changed(&value);
                Routed::Submitted(controller.submit(modeler))
            }
        };
        Ok(routed)
    }
}
