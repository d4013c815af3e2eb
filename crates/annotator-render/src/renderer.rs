use annotator_model::Element;
use annotator_model::geom::Rect;
use std::fmt;

/// Priority of the built-in BPMN renderer. Custom renderers register above it.
pub const DEFAULT_RENDER_PRIORITY: i32 = 1000;

/// Result of drawing one element.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnShape {
    /// SVG markup of the element's visual. Shapes are drawn in element-local coordinates
    /// (the canvas translates them to the element's position); connections use absolute
    /// coordinates.
    pub markup: String,
    /// Absolute bounding box of the primary visual.
    pub bounds: Rect,
}

/// A component that knows how to draw some kinds of elements.
///
/// Implementations must not panic: an element a renderer cannot handle is reported through
/// `can_render` and left to lower-priority renderers.
pub trait ShapeRenderer {
    fn name(&self) -> &'static str;

    fn priority(&self) -> i32 {
        DEFAULT_RENDER_PRIORITY
    }

    fn can_render(&self, element: &Element) -> bool;

    fn render(&self, element: &Element) -> DrawnShape;

    /// Outline path in absolute coordinates, congruent with what `render` draws.
    fn outline(&self, element: &Element) -> String;
}

/// Ordered set of renderers; the highest-priority renderer that accepts an element draws it.
#[derive(Default)]
pub struct RendererRegistry {
    renderers: Vec<Box<dyn ShapeRenderer>>,
}

impl fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<(&str, i32)> = self
            .renderers
            .iter()
            .map(|r| (r.name(), r.priority()))
            .collect();
        f.debug_struct("RendererRegistry")
            .field("renderers", &names)
            .finish()
    }
}

impl RendererRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a renderer. Equal priorities keep registration order.
    pub fn register(&mut self, renderer: impl ShapeRenderer + 'static) {
        let priority = renderer.priority();
        let pos = self
            .renderers
            .iter()
            .position(|r| r.priority() < priority)
            .unwrap_or(self.renderers.len());
        tracing::debug!(renderer = renderer.name(), priority, "renderer registered");
        self.renderers.insert(pos, Box::new(renderer));
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }

    pub fn renderer_for(&self, element: &Element) -> Option<&dyn ShapeRenderer> {
        self.renderers
            .iter()
            .find(|r| r.can_render(element))
            .map(|r| r.as_ref())
    }

    pub fn render(&self, element: &Element) -> Option<DrawnShape> {
        self.renderer_for(element).map(|r| r.render(element))
    }

    pub fn outline(&self, element: &Element) -> Option<String> {
        self.renderer_for(element).map(|r| r.outline(element))
    }
}
