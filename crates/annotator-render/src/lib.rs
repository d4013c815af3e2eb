#![forbid(unsafe_code)]

//! Headless SVG rendering for BPMN documents.
//!
//! Renderers are small components behind the [`ShapeRenderer`] seam, registered by priority
//! in a [`RendererRegistry`]. The [`Canvas`] keeps the drawn SVG of every element and
//! redraws only the elements a change touched.

mod bpmn;
mod canvas;
mod emoji;
pub mod path;
mod renderer;
mod util;

pub use bpmn::BpmnRenderer;
pub use canvas::Canvas;
pub use emoji::{EMOJI_ATTR, EmojiRenderer, EmojiStyle};
pub use renderer::{DEFAULT_RENDER_PRIORITY, DrawnShape, RendererRegistry, ShapeRenderer};
