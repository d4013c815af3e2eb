use crate::config::AnnotatorConfig;
use crate::controller::PanelController;
use crate::error::{Error, Result};
use crate::features::{EmojiAnnotation, SuitabilityScore};
use crate::router::{Gesture, Routed, Router};
use annotator_model::event::{ELEMENTS_CHANGED, IMPORT_DONE};
use annotator_model::{ElementId, Event, Moddle, Modeler, Package};
use annotator_render::{BpmnRenderer, Canvas, EmojiRenderer, EmojiStyle, RendererRegistry};
use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::sync::Arc;

pub const QA_PACKAGE: &str = include_str!("../resources/qa.json");
pub const EMOJI_PACKAGE: &str = include_str!("../resources/emoji.json");

/// Which panel a gesture is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelKind {
    Score,
    Emoji,
}

/// A loaded diagram with the annotation features wired in.
#[derive(Debug)]
pub struct Session {
    config: AnnotatorConfig,
    modeler: Modeler,
    canvas: Rc<RefCell<Canvas>>,
    score: Option<Router<SuitabilityScore>>,
    emoji: Option<Router<EmojiAnnotation>>,
}

impl Session {
    /// Loads `xml` and wires the enabled features.
    ///
    /// Nothing is registered on the modeler when loading fails; the failure is logged and
    /// returned as [`Error::Load`].
    ///
    /// Runtime-agnostic: loading is CPU-bound and performs no I/O.
    pub async fn start(config: AnnotatorConfig, xml: &str) -> Result<Self> {
        Self::start_sync(config, xml)
    }

    /// Synchronous variant of [`Session::start`].
    pub fn start_sync(config: AnnotatorConfig, xml: &str) -> Result<Self> {
        let features = Features::resolve(&config)?;
        let moddle = Arc::new(build_moddle(&features)?);
        let mut modeler = Modeler::with_moddle(Arc::clone(&moddle));

        match modeler.import_xml_sync(xml) {
            Ok(warnings) => {
                tracing::info!(warnings = warnings.len(), "diagram loaded");
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to load diagram");
                return Err(Error::Load(err));
            }
        }

        Self::wire(config, features, moddle, modeler)
    }

    fn wire(
        config: AnnotatorConfig,
        features: Features,
        moddle: Arc<Moddle>,
        mut modeler: Modeler,
    ) -> Result<Self> {
        let mut registry = RendererRegistry::new();
        registry.register(BpmnRenderer::new(Arc::clone(&moddle)));
        if let Some(emoji) = &features.emoji {
            registry.register(EmojiRenderer::with_style(
                Arc::clone(&moddle),
                emoji.style.clone(),
            ));
        }

        let canvas = Rc::new(RefCell::new(Canvas::new(registry)));
        canvas.borrow_mut().draw_all(modeler.document()?);
        {
            let canvas = Rc::clone(&canvas);
            modeler.on(
                ELEMENTS_CHANGED,
                annotator_model::DEFAULT_PRIORITY,
                move |event, document| canvas.borrow_mut().redraw(document, &event.elements),
            );
        }
        {
            let canvas = Rc::clone(&canvas);
            modeler.on(
                IMPORT_DONE,
                annotator_model::DEFAULT_PRIORITY,
                move |_, document| canvas.borrow_mut().draw_all(document),
            );
        }

        let score = features.qa_priority.map(|priority| {
            let feature = SuitabilityScore::new(config.timestamp_precision());
            let controller = PanelController::new(feature, Arc::clone(&moddle));
            Router::attach(&mut modeler, controller, priority)
        });
        let emoji = features.emoji.map(|emoji| {
            let feature = EmojiAnnotation::new(emoji.palette);
            let controller = PanelController::new(feature, Arc::clone(&moddle));
            Router::attach(&mut modeler, controller, emoji.priority)
        });

        tracing::info!(
            qa = score.is_some(),
            emoji = emoji.is_some(),
            "annotation session started"
        );
        Ok(Self {
            config,
            modeler,
            canvas,
            score,
            emoji,
        })
    }

    pub fn config(&self) -> &AnnotatorConfig {
        &self.config
    }

    pub fn modeler(&self) -> &Modeler {
        &self.modeler
    }

    pub fn modeler_mut(&mut self) -> &mut Modeler {
        &mut self.modeler
    }

    pub fn score(&self) -> Option<&Router<SuitabilityScore>> {
        self.score.as_ref()
    }

    pub fn emoji(&self) -> Option<&Router<EmojiAnnotation>> {
        self.emoji.as_ref()
    }

    pub fn canvas(&self) -> Ref<'_, Canvas> {
        self.canvas.borrow()
    }

    /// Right-click on an element. Every attached panel gets a chance, highest priority first;
    /// panels that did not take the event close, so at most one stays open.
    pub fn context_menu(&mut self, id: &ElementId) -> Result<Event> {
        let event = self.modeler.context_menu(id)?;
        if let Some(router) = &self.score {
            router.release_if_unclaimed();
        }
        if let Some(router) = &self.emoji {
            router.release_if_unclaimed();
        }
        Ok(event)
    }

    /// Pointer-down somewhere in the page; `inside` names the panel that was hit, if any.
    pub fn pointer_down(&mut self, inside: Option<PanelKind>) -> Result<()> {
        if let Some(router) = &self.score {
            router.handle(
                &mut self.modeler,
                Gesture::PointerDown {
                    inside_panel: inside == Some(PanelKind::Score),
                },
            )?;
        }
        if let Some(router) = &self.emoji {
            router.handle(
                &mut self.modeler,
                Gesture::PointerDown {
                    inside_panel: inside == Some(PanelKind::Emoji),
                },
            )?;
        }
        Ok(())
    }

    /// Routes a panel gesture. Disabled panels leave every gesture unhandled; a context-menu
    /// gesture reaches every panel, whichever one it names.
    pub fn gesture(&mut self, panel: PanelKind, gesture: Gesture) -> Result<Routed> {
        if let Gesture::ContextMenu(id) = &gesture {
            let event = self.context_menu(id)?;
            return Ok(Routed::ContextMenu {
                default_prevented: event.default_prevented(),
            });
        }
        match panel {
            PanelKind::Score => match &self.score {
                Some(router) => router.handle(&mut self.modeler, gesture),
                None => Ok(Routed::Unhandled),
            },
            PanelKind::Emoji => match &self.emoji {
                Some(router) => router.handle(&mut self.modeler, gesture),
                None => Ok(Routed::Unhandled),
            },
        }
    }

    pub fn undo(&mut self) -> Result<bool> {
        Ok(self.modeler.undo()?)
    }

    pub fn redo(&mut self) -> Result<bool> {
        Ok(self.modeler.redo()?)
    }

    pub fn save_xml(&self) -> Result<String> {
        Ok(self.modeler.save_xml()?)
    }

    pub fn to_svg(&self) -> Result<String> {
        let document = self.modeler.document()?;
        Ok(self.canvas.borrow().to_svg(document))
    }
}

/// Feature settings, checked before anything is loaded.
struct Features {
    qa_priority: Option<i32>,
    emoji: Option<EmojiSettings>,
}

struct EmojiSettings {
    priority: i32,
    palette: Vec<String>,
    style: EmojiStyle,
}

impl Features {
    fn resolve(config: &AnnotatorConfig) -> Result<Self> {
        let qa_priority = if config.qa_enabled() {
            Some(config.qa_priority()?)
        } else {
            None
        };
        let emoji = if config.emoji_enabled() {
            Some(EmojiSettings {
                priority: config.emoji_priority()?,
                palette: config.emoji_palette()?,
                style: config.emoji_style()?,
            })
        } else {
            None
        };
        Ok(Self { qa_priority, emoji })
    }
}

fn build_moddle(features: &Features) -> Result<Moddle> {
    let mut packages = Vec::new();
    if features.qa_priority.is_some() {
        packages.push(Package::from_json(QA_PACKAGE)?);
    }
    if features.emoji.is_some() {
        packages.push(Package::from_json(EMOJI_PACKAGE)?);
    }
    Ok(Moddle::with_packages(packages)?)
}
