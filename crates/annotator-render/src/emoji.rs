//! Task shapes annotated with an emoji.

use crate::path::{clamp_radius, round_rect_path};
use crate::renderer::{DEFAULT_RENDER_PRIORITY, DrawnShape, ShapeRenderer};
use crate::util::{escape_xml, fmt};
use annotator_model::geom::Rect;
use annotator_model::{Element, ElementKind, Moddle};
use std::sync::Arc;

/// Business-object attribute holding the emoji.
pub const EMOJI_ATTR: &str = "emoji";

#[derive(Debug, Clone, PartialEq)]
pub struct EmojiStyle {
    pub priority: i32,
    pub radius: f64,
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
    /// Label position relative to the shape's top-left corner.
    pub label_x: f64,
    pub label_y: f64,
}

impl Default for EmojiStyle {
    fn default() -> Self {
        Self {
            priority: DEFAULT_RENDER_PRIORITY * 2,
            radius: 10.0,
            fill: "#FFC83D".to_string(),
            stroke: "black".to_string(),
            stroke_width: 2.0,
            label_x: 10.0,
            label_y: 25.0,
        }
    }
}

/// Draws tasks that carry a non-empty emoji as a filled rounded rectangle with the emoji
/// as its label.
#[derive(Debug, Clone)]
pub struct EmojiRenderer {
    moddle: Arc<Moddle>,
    style: EmojiStyle,
}

impl EmojiRenderer {
    pub fn new(moddle: Arc<Moddle>) -> Self {
        Self::with_style(moddle, EmojiStyle::default())
    }

    pub fn with_style(moddle: Arc<Moddle>, style: EmojiStyle) -> Self {
        Self { moddle, style }
    }

    pub fn style(&self) -> &EmojiStyle {
        &self.style
    }

    fn emoji<'a>(&self, element: &'a Element) -> Option<&'a str> {
        element
            .business_object()
            .get_str(EMOJI_ATTR)
            .filter(|e| !e.is_empty())
    }

    fn shape_bounds(element: &Element) -> Rect {
        match element.kind() {
            ElementKind::Shape { bounds } => *bounds,
            _ => Rect::zero(),
        }
    }
}

impl ShapeRenderer for EmojiRenderer {
    fn name(&self) -> &'static str {
        "emoji"
    }

    fn priority(&self) -> i32 {
        self.style.priority
    }

    fn can_render(&self, element: &Element) -> bool {
        matches!(element.kind(), ElementKind::Shape { .. })
            && self
                .moddle
                .is_a(element.business_object().type_name(), "bpmn:Task")
            && self.emoji(element).is_some()
    }

    fn render(&self, element: &Element) -> DrawnShape {
        let rect = Self::shape_bounds(element);
        let (w, h) = (rect.size.width, rect.size.height);
        let r = fmt(clamp_radius(self.style.radius, w, h));
        let mut markup = format!(
            r#"<rect x="0" y="0" width="{}" height="{}" rx="{r}" ry="{r}" style="stroke: {}; stroke-width: {}; fill: {}"/>"#,
            fmt(w),
            fmt(h),
            escape_xml(&self.style.stroke),
            fmt(self.style.stroke_width),
            escape_xml(&self.style.fill),
        );
        if let Some(emoji) = self.emoji(element) {
            markup.push_str(&format!(
                r#"<text class="djs-label" x="{}" y="{}">{}</text>"#,
                fmt(self.style.label_x),
                fmt(self.style.label_y),
                escape_xml(emoji)
            ));
        }
        DrawnShape {
            markup,
            bounds: rect,
        }
    }

    fn outline(&self, element: &Element) -> String {
        round_rect_path(&Self::shape_bounds(element), self.style.radius)
    }
}
