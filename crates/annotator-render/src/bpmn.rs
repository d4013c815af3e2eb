//! Default rendering for BPMN elements.

use crate::path::{
    clamp_radius, diamond_path, ellipse_path, path_bounds, polyline_path, rect_path,
    round_rect_path,
};
use crate::renderer::{DrawnShape, ShapeRenderer};
use crate::util::{escape_xml, fmt};
use annotator_model::geom::{Rect, bounds};
use annotator_model::{Element, ElementKind, Moddle};
use std::fmt::Write as _;
use std::sync::Arc;

const TASK_RADIUS: f64 = 10.0;
const STROKE: &str = "stroke: black; stroke-width: 2px";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Figure {
    RoundRect,
    Ellipse,
    Diamond,
    Rect,
}

#[derive(Debug, Clone)]
pub struct BpmnRenderer {
    moddle: Arc<Moddle>,
}

impl BpmnRenderer {
    pub fn new(moddle: Arc<Moddle>) -> Self {
        Self { moddle }
    }

    fn figure(&self, element: &Element) -> Figure {
        let ty = element.business_object().type_name();
        if self.moddle.is_a(ty, "bpmn:Activity") {
            Figure::RoundRect
        } else if self.moddle.is_a(ty, "bpmn:Event") {
            Figure::Ellipse
        } else if self.moddle.is_a(ty, "bpmn:Gateway") {
            Figure::Diamond
        } else {
            Figure::Rect
        }
    }

    fn render_shape(&self, element: &Element, rect: Rect) -> DrawnShape {
        let (w, h) = (rect.size.width, rect.size.height);
        let mut markup = String::new();
        match self.figure(element) {
            Figure::RoundRect => {
                let r = fmt(clamp_radius(TASK_RADIUS, w, h));
                let _ = write!(
                    markup,
                    r#"<rect x="0" y="0" width="{}" height="{}" rx="{r}" ry="{r}" style="{STROKE}; fill: white"/>"#,
                    fmt(w),
                    fmt(h),
                );
            }
            Figure::Ellipse => {
                let _ = write!(
                    markup,
                    r#"<ellipse cx="{}" cy="{}" rx="{}" ry="{}" style="{STROKE}; fill: white"/>"#,
                    fmt(w / 2.0),
                    fmt(h / 2.0),
                    fmt(w / 2.0),
                    fmt(h / 2.0),
                );
            }
            Figure::Diamond => {
                let local = bounds(0.0, 0.0, w, h);
                let _ = write!(
                    markup,
                    r#"<path d="{}" style="{STROKE}; fill: white"/>"#,
                    diamond_path(&local)
                );
            }
            Figure::Rect => {
                let _ = write!(
                    markup,
                    r#"<rect x="0" y="0" width="{}" height="{}" style="{STROKE}; fill: none"/>"#,
                    fmt(w),
                    fmt(h),
                );
            }
        }
        if let Some(name) = element.business_object().name().filter(|n| !n.is_empty()) {
            let _ = write!(
                markup,
                r#"<text class="djs-label" x="{}" y="{}" text-anchor="middle">{}</text>"#,
                fmt(w / 2.0),
                fmt(h / 2.0),
                escape_xml(name)
            );
        }
        DrawnShape { markup, bounds: rect }
    }
}

impl ShapeRenderer for BpmnRenderer {
    fn name(&self) -> &'static str {
        "bpmn"
    }

    fn can_render(&self, element: &Element) -> bool {
        !element.is_root()
    }

    fn render(&self, element: &Element) -> DrawnShape {
        match element.kind() {
            ElementKind::Shape { bounds } => self.render_shape(element, *bounds),
            ElementKind::Connection { waypoints } => {
                let d = polyline_path(waypoints);
                let bounds = path_bounds(&d).unwrap_or_else(Rect::zero);
                DrawnShape {
                    markup: format!(r#"<path d="{d}" style="fill: none; {STROKE}"/>"#),
                    bounds,
                }
            }
            ElementKind::Root => DrawnShape {
                markup: String::new(),
                bounds: Rect::zero(),
            },
        }
    }

    fn outline(&self, element: &Element) -> String {
        match element.kind() {
            ElementKind::Shape { bounds } => match self.figure(element) {
                Figure::RoundRect => round_rect_path(bounds, TASK_RADIUS),
                Figure::Ellipse => ellipse_path(bounds),
                Figure::Diamond => diamond_path(bounds),
                Figure::Rect => rect_path(bounds),
            },
            ElementKind::Connection { waypoints } => polyline_path(waypoints),
            ElementKind::Root => String::new(),
        }
    }
}
