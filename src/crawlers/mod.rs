pub mod crawler;
pub mod web;

pub use crawler::{PageRenderer, RenderError, RenderedPage};
pub use web::WebDriverRenderer;
