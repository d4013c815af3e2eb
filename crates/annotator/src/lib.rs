#![forbid(unsafe_code)]

//! Element annotations for BPMN diagrams.
//!
//! A [`Session`] loads a diagram into a headless [`Modeler`](annotator_model::Modeler) and
//! attaches one panel per feature: a suitability score with a last-checked timestamp, and
//! an emoji drawn inside task shapes. Each panel is a [`PanelController`] driven by a
//! [`Router`] that listens for right-clicks on the modeler's event bus.

pub mod adapter;
pub mod clock;
pub mod config;
mod controller;
pub mod error;
pub mod features;
pub mod locator;
mod panel;
mod router;
mod session;

pub use adapter::Annotation;
pub use config::AnnotatorConfig;
pub use controller::{PanelController, PanelState, SubmitOutcome, TargetOutcome};
pub use error::{Error, Result};
pub use features::{AnnotationFeature, EmojiAnnotation, SuitabilityScore};
pub use panel::PanelView;
pub use router::{ESCAPE, Gesture, Routed, Router};
pub use session::{EMOJI_PACKAGE, PanelKind, QA_PACKAGE, Session};

#[cfg(test)]
mod tests;
