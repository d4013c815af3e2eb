#![forbid(unsafe_code)]

//! Headless BPMN document model.
//!
//! This crate plays the part of the diagram editor host: it owns the document, knows the
//! schema (BPMN plus registered extension packages), imports and exports BPMN XML, and is
//! the only place documents are mutated, through an undoable command stack that announces
//! every change on a priority event bus.

pub mod command;
pub mod document;
pub mod element;
pub mod error;
pub mod event;
pub mod export;
pub mod geom;
pub mod import;
pub mod moddle;
mod modeler;

pub use command::{CommandStack, PropertyPatch};
pub use document::{Definitions, Document};
pub use element::{
    Attrs, BusinessObject, Element, ElementId, ElementKind, ExtensionElements, ExtensionRecord,
};
pub use error::{Error, ImportError, Result};
pub use event::{DEFAULT_PRIORITY, Event, EventBus, ListenerId};
pub use export::{export_xml, js_number};
pub use import::{ImportOutcome, import_xml};
pub use moddle::{Moddle, Package};
pub use modeler::Modeler;

#[cfg(test)]
mod tests;
