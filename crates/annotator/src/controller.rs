//! Open/closed lifecycle of an annotation panel bound to one element at a time.

use crate::adapter;
use crate::error::Error;
use crate::features::AnnotationFeature;
use crate::panel::PanelView;
use annotator_model::{Document, ElementId, Modeler, Moddle};
use std::sync::Arc;

const STALE_NOTICE: &str = "The element no longer exists; nothing was saved.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelState {
    Closed,
    Open { target: ElementId },
}

/// How the controller reacted to a right-click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetOutcome {
    /// The panel opened for the element.
    Bound,
    /// The document root: the panel is shown but bound to nothing.
    RootIgnored,
    /// Not this feature's element; the host keeps its default behavior.
    Declined,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Committed,
    /// The field does not hold an acceptable value; the panel stays open.
    Invalid,
    /// No element is bound.
    Ignored,
    /// The bound element was removed before the submit.
    Stale,
    Failed(String),
}

#[derive(Debug)]
pub struct PanelController<F> {
    feature: F,
    moddle: Arc<Moddle>,
    state: PanelState,
    view: PanelView,
}

impl<F: AnnotationFeature> PanelController<F> {
    pub fn new(feature: F, moddle: Arc<Moddle>) -> Self {
        Self {
            feature,
            moddle,
            state: PanelState::Closed,
            view: PanelView::hidden(),
        }
    }

    pub fn feature(&self) -> &F {
        &self.feature
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn view(&self) -> &PanelView {
        &self.view
    }

    pub fn target(&self) -> Option<&ElementId> {
        match &self.state {
            PanelState::Open { target } => Some(target),
            PanelState::Closed => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, PanelState::Open { .. })
    }

    /// Takes the transient notice, if any.
    pub fn take_notice(&mut self) -> Option<String> {
        self.view.notice.take()
    }

    /// A right-click landed on `id`. Any previous binding and its unsaved edits are dropped.
    pub fn targeted(&mut self, document: &Document, id: &ElementId) -> TargetOutcome {
        let Some(element) = document.get(id.as_str()) else {
            tracing::debug!(feature = self.feature.name(), element = %id, "unknown target");
            self.close();
            return TargetOutcome::Declined;
        };
        if !self.feature.accepts(document, id.as_str()) {
            tracing::debug!(feature = self.feature.name(), element = %id, "target declined");
            self.close();
            return TargetOutcome::Declined;
        }
        if element.is_root() {
            tracing::debug!(feature = self.feature.name(), "root targeted, nothing bound");
            self.state = PanelState::Closed;
            self.view = PanelView {
                visible: true,
                ..PanelView::hidden()
            };
            return TargetOutcome::RootIgnored;
        }

        let annotation = adapter::read_annotation(document, id.as_str(), self.feature.attribute());
        let field = self.feature.field_text(&annotation);
        let valid = self.feature.parse(&field).is_some();
        self.view = PanelView {
            visible: true,
            detail: self
                .feature
                .detail_text(document, &self.moddle, id.as_str()),
            field,
            warning_visible: !valid,
            submit_enabled: valid,
            notice: None,
            focused: self.feature.has_input_field(),
        };
        self.state = PanelState::Open { target: id.clone() };
        tracing::debug!(feature = self.feature.name(), element = %id, "panel opened");
        TargetOutcome::Bound
    }

    /// Replaces the field text and re-validates it. Returns whether the text is acceptable;
    /// `false` as well when no element is bound.
    pub fn input_changed(&mut self, text: &str) -> bool {
        if !self.is_open() {
            return false;
        }
        let valid = self.feature.parse(text).is_some();
        self.view.field = text.to_string();
        self.view.warning_visible = !valid;
        self.view.submit_enabled = valid;
        self.view.notice = None;
        valid
    }

    pub fn submit(&mut self, modeler: &mut Modeler) -> SubmitOutcome {
        let Some(target) = self.target().cloned() else {
            return SubmitOutcome::Ignored;
        };
        let Some(value) = self.feature.parse(&self.view.field) else {
            self.view.warning_visible = true;
            self.view.submit_enabled = false;
            return SubmitOutcome::Invalid;
        };

        let result = self
            .feature
            .patch(modeler, &target, value)
            .and_then(|patch| adapter::commit(modeler, &target, patch));

        match result {
            Ok(()) => {
                self.close();
                SubmitOutcome::Committed
            }
            Err(Error::StaleTarget { id }) => {
                tracing::warn!(
                    feature = self.feature.name(),
                    element = %id,
                    "submit aborted, target is gone"
                );
                self.close();
                self.view.notice = Some(STALE_NOTICE.to_string());
                SubmitOutcome::Stale
            }
            Err(err) => {
                tracing::error!(
                    feature = self.feature.name(),
                    element = %target,
                    error = %err,
                    "submit failed"
                );
                self.view.notice = Some(err.to_string());
                SubmitOutcome::Failed(err.to_string())
            }
        }
    }

    /// Hides the panel and drops unsaved edits. Returns `false` when it was already hidden.
    pub fn dismiss(&mut self) -> bool {
        let was_visible = self.view.visible;
        self.close();
        if was_visible {
            tracing::debug!(feature = self.feature.name(), "panel dismissed");
        }
        was_visible
    }

    fn close(&mut self) {
        self.state = PanelState::Closed;
        self.view = PanelView::hidden();
    }
}
