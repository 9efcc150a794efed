//! Text measurement and drawing on top of the registered fonts.

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle};

use super::fonts;
use crate::error::{Error, Result};

/// Heuristic: estimate pixel width of text when no font metrics are available.
pub fn estimate_text_width_px(text: &str, font_px: f64) -> u32 {
    ((text.chars().count() as f64) * font_px * 0.60).ceil() as u32
}

/// Width of `text` in pixels, from font metrics when fonts are registered.
pub fn measure(text: &str, font_px: f64, family: &str) -> u32 {
    fonts::family_for(family)
        .and_then(|f| {
            FontDesc::new(FontFamily::Name(f), font_px, FontStyle::Normal)
                .box_size(text)
                .ok()
        })
        .map(|(w, _)| w)
        .unwrap_or_else(|| estimate_text_width_px(text, font_px))
}

/// One text run: content, anchor point, and how it hangs off the anchor.
#[derive(Clone)]
pub struct Label<'a> {
    pub text: &'a str,
    pub at: (i32, i32),
    pub font_px: f64,
    pub family: &'a str,
    pub h: HPos,
    pub v: VPos,
}

// The anchor enums carry no `Debug`.
impl std::fmt::Debug for Label<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Label")
            .field("text", &self.text)
            .field("at", &self.at)
            .field("font_px", &self.font_px)
            .field("family", &self.family)
            .finish_non_exhaustive()
    }
}

impl<'a> Label<'a> {
    pub fn new(text: &'a str, at: (i32, i32), font_px: f64) -> Self {
        Self {
            text,
            at,
            font_px,
            family: fonts::DEFAULT_FAMILY,
            h: HPos::Left,
            v: VPos::Bottom,
        }
    }

    pub fn family(mut self, family: &'a str) -> Self {
        self.family = family;
        self
    }

    pub fn anchor(mut self, h: HPos, v: VPos) -> Self {
        self.h = h;
        self.v = v;
        self
    }
}

/// Draw `label`; a no-op until fonts are registered.
pub fn draw_label<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    label: &Label<'_>,
    color: &RGBAColor,
) -> Result<()> {
    let Some(family) = fonts::family_for(label.family) else {
        log::debug!("fonts not initialized; skipping text {:?}", label.text);
        return Ok(());
    };
    let style = FontDesc::new(FontFamily::Name(family), label.font_px, FontStyle::Normal)
        .color(color)
        .pos(Pos::new(label.h, label.v));
    area.draw(&Text::new(label.text.to_string(), label.at, style))
        .map_err(|e| Error::Drawing(format!("{:?}", e)))
}
