//! Renderer boundary.
//!
//! The engine never draws; it hands each completed render model to a
//! `Renderer` together with the create-vs-update mode, so the implementation
//! can reuse whatever widget/canvas state it already holds on updates.

use chartdeck_core::compose::{RenderMode, RenderModel};

pub trait Renderer: Send {
    fn render(&mut self, model: &RenderModel, mode: RenderMode);
}

/// Prints one line per frame — the watch command's renderer.
pub struct StatusLineRenderer;

impl Renderer for StatusLineRenderer {
    fn render(&mut self, model: &RenderModel, mode: RenderMode) {
        let status = &model.layout.status;
        let detail = status.detail.as_deref().unwrap_or("");
        println!(
            "[{mode:?}] {} | {} | {} trace(s) {}",
            model.layout.title,
            status.text,
            model.traces.len(),
            detail
        );
    }
}
