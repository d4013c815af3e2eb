//! Drawn SVG for a whole document, kept up to date element by element.

use crate::path::path_bounds;
use crate::renderer::RendererRegistry;
use crate::util::{escape_xml, fmt};
use annotator_model::geom::{Point, Rect};
use annotator_model::{Document, Element, ElementId, ElementKind};
use rustc_hash::FxHashMap;
use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq)]
struct CachedShape {
    renderer: &'static str,
    svg: String,
    bounds: Rect,
    outline: Option<Rect>,
}

#[derive(Debug, Default)]
pub struct Canvas {
    registry: RendererRegistry,
    cache: FxHashMap<ElementId, CachedShape>,
    draws: usize,
}

impl Canvas {
    pub fn new(registry: RendererRegistry) -> Self {
        Self {
            registry,
            cache: FxHashMap::default(),
            draws: 0,
        }
    }

    pub fn registry(&self) -> &RendererRegistry {
        &self.registry
    }

    /// Drops the cache and draws every element of `document`.
    pub fn draw_all(&mut self, document: &Document) {
        self.cache.clear();
        for element in document.elements() {
            self.draw(element);
        }
        tracing::debug!(elements = self.cache.len(), "canvas drawn");
    }

    /// Redraws the given elements; ids no longer in the document are dropped from the cache.
    pub fn redraw(&mut self, document: &Document, ids: &[ElementId]) {
        for id in ids {
            match document.get(id.as_str()) {
                Some(element) => self.draw(element),
                None => {
                    self.cache.remove(id);
                }
            }
        }
    }

    fn draw(&mut self, element: &Element) {
        let Some(renderer) = self.registry.renderer_for(element) else {
            self.cache.remove(element.id());
            return;
        };
        let drawn = renderer.render(element);
        let outline = path_bounds(&renderer.outline(element));
        let id = escape_xml(element.id().as_str());
        let svg = match element.kind() {
            ElementKind::Shape { bounds } => format!(
                r#"<g class="djs-element djs-shape" data-element-id="{id}" transform="translate({} {})">{}</g>"#,
                fmt(bounds.origin.x),
                fmt(bounds.origin.y),
                drawn.markup
            ),
            _ => format!(
                r#"<g class="djs-element djs-connection" data-element-id="{id}">{}</g>"#,
                drawn.markup
            ),
        };
        tracing::trace!(element = %element.id(), renderer = renderer.name(), "element drawn");
        self.draws += 1;
        self.cache.insert(
            element.id().clone(),
            CachedShape {
                renderer: renderer.name(),
                svg,
                bounds: drawn.bounds,
                outline,
            },
        );
    }

    /// Number of element draws since the canvas was created.
    pub fn draw_count(&self) -> usize {
        self.draws
    }

    pub fn element_svg(&self, id: &str) -> Option<&str> {
        self.cache.get(id).map(|c| c.svg.as_str())
    }

    /// Name of the renderer that drew the element.
    pub fn drawn_by(&self, id: &str) -> Option<&'static str> {
        self.cache.get(id).map(|c| c.renderer)
    }

    pub fn element_bounds(&self, id: &str) -> Option<Rect> {
        self.cache.get(id).map(|c| c.bounds)
    }

    /// Topmost element whose outline box contains `p`.
    pub fn element_at(&self, document: &Document, p: Point) -> Option<ElementId> {
        document
            .elements()
            .rev()
            .filter(|e| matches!(e.kind(), ElementKind::Shape { .. }))
            .find(|e| {
                self.cache
                    .get(e.id().as_str())
                    .and_then(|c| c.outline)
                    .is_some_and(|r| contains_inclusive(&r, p))
            })
            .map(|e| e.id().clone())
    }

    /// Complete SVG document in document order.
    pub fn to_svg(&self, document: &Document) -> String {
        let mut view: Option<Rect> = None;
        for shape in self.cache.values() {
            view = Some(match view {
                Some(v) => v.union(&shape.bounds),
                None => shape.bounds,
            });
        }
        let view = view.unwrap_or_else(Rect::zero);
        let mut out = String::new();
        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}">"#,
            fmt(view.origin.x),
            fmt(view.origin.y),
            fmt(view.size.width),
            fmt(view.size.height)
        );
        for element in document.elements() {
            if let Some(shape) = self.cache.get(element.id().as_str()) {
                out.push_str(&shape.svg);
            }
        }
        out.push_str("</svg>");
        out
    }
}

fn contains_inclusive(r: &Rect, p: Point) -> bool {
    p.x >= r.min_x() && p.x <= r.max_x() && p.y >= r.min_y() && p.y <= r.max_y()
}
