use super::escape::EscapeCodes;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellGlyph {
    pub ch: char,
    /// Foreground color encoded as RGB bytes, taken from the resized pixel.
    pub fg: [u8; 3],
}

#[derive(Clone, Debug)]
pub struct GlyphGrid {
    pub width: u32,
    pub height: u32,
    pub cells: Vec<CellGlyph>,
}

impl GlyphGrid {
    pub fn new(width: u32, height: u32, cells: Vec<CellGlyph>) -> Self {
        assert_eq!(width as usize * height as usize, cells.len());
        Self { width, height, cells }
    }

    /// Serializes the grid row by row, one `\n` per row.
    ///
    /// With `color`, every glyph carries its own truecolor prefix and a single reset closes the
    /// whole block.
    pub fn to_ansi(&self, escapes: &EscapeCodes, color: bool) -> String {
        let width = self.width as usize;
        // "255;255;255m" is 12 bytes, glyphs are at most 4.
        let per_cell = if color { escapes.foreground.len() + 16 } else { 4 };
        let mut out = String::with_capacity((width * per_cell + 1) * self.height as usize + 4);

        for row in self.cells.chunks(width) {
            for cell in row {
                if color {
                    escapes.push_truecolor(&mut out, cell.fg);
                }
                out.push(cell.ch);
            }
            out.push('\n');
        }

        if color {
            out.push_str(&escapes.reset);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn grid() -> GlyphGrid {
        GlyphGrid::new(2, 1, vec![
            CellGlyph { ch: '#', fg: [1, 2, 3] },
            CellGlyph { ch: ' ', fg: [255, 255, 255] },
        ])
    }

    #[test]
    fn plain_rows() {
        assert_eq!(grid().to_ansi(&EscapeCodes::default(), false), "# \n");
    }

    #[test]
    fn colored_rows_reset_once() {
        assert_eq!(
            grid().to_ansi(&EscapeCodes::default(), true),
            "\u{1b}[38;2;1;2;3m#\u{1b}[38;2;255;255;255m \n\u{1b}[0m"
        );
    }
}
