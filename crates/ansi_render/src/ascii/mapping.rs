use image::RgbImage;

use super::{
    gradient::Gradient,
    grid::{CellGlyph, GlyphGrid},
};

/// BT.601 luma, rounded to the nearest 8-bit level.
pub fn luma(rgb: [u8; 3]) -> u8 {
    let [r, g, b] = rgb.map(f64::from);
    (0.299 * r + 0.587 * g + 0.114 * b).round().clamp(0.0, 255.0) as u8
}

pub struct GlyphMapper<'a> {
    gradient: &'a Gradient,
}

impl<'a> GlyphMapper<'a> {
    pub fn new(gradient: &'a Gradient) -> Self {
        Self { gradient }
    }

    pub fn map_cell(&self, rgb: [u8; 3]) -> CellGlyph {
        CellGlyph { ch: self.gradient.glyph_for(luma(rgb)), fg: rgb }
    }

    pub fn map_pixels(&self, image: &RgbImage) -> GlyphGrid {
        let cells = image.pixels().map(|pixel| self.map_cell(pixel.0)).collect();
        GlyphGrid::new(image.width(), image.height(), cells)
    }
}
