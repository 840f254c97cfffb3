mod ascii;
mod image_pipeline;
mod playback;

use image::RgbImage;

pub use ascii::{
    escape::EscapeCodes,
    frame::AnsiFrame,
    gradient::Gradient,
    grid::{CellGlyph, GlyphGrid},
    mapping::{luma, GlyphMapper},
};
pub use image_pipeline::{
    delay::{delay_for_frame, DelayError, DelayPolicy, MIN_FRAME_TIME},
    loader::{validate_bitmap, DecodedFrames, FrameSource, StaticFrame},
    resize::{rows_for, LayoutPolicy, TargetGeometry, DEFAULT_CELL_ASPECT, DEFAULT_SCALE},
};
pub use playback::{
    pacing::{Clock, InterruptibleSleeper, Pacing, Sleeper, SystemClock},
    player::{
        pacing_delay, present_static, redraw_for, PlaybackCursor, PlaybackSummary, Player, Redraw,
    },
    series::{FrameRecord, FrameSeries},
};

use image_pipeline::resize;

#[derive(Debug, thiserror::Error)]
pub enum AnsiError {
    #[error("failed to load image: {0}")]
    Image(#[from] image::ImageError),
    #[error("terminal write failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("unsupported layout dimensions")]
    InvalidLayout,
    #[error("frame {index} has no pixels")]
    EmptyBitmap { index: usize },
    #[error("no frames to play")]
    EmptySeries,
    #[error("frame {index} out of range for {count} frames")]
    FrameOutOfRange { index: usize, count: usize },
    #[error("gradient must contain at least two characters")]
    InvalidGradient,
}

#[derive(Clone, Debug)]
pub struct RenderOptions {
    pub gradient: Gradient,
    /// Prefix every glyph with a truecolor escape for its pixel.
    pub color: bool,
    /// Cell width / height assumed when deriving the row count.
    pub cell_aspect: f64,
    pub escapes: EscapeCodes,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            gradient: Gradient::default(),
            color: true,
            cell_aspect: DEFAULT_CELL_ASPECT,
            escapes: EscapeCodes::default(),
        }
    }
}

/// Turns bitmaps into [`AnsiFrame`]s.
#[derive(Clone, Debug, Default)]
pub struct Rasterizer {
    options: RenderOptions,
}

impl Rasterizer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Renders `bitmap` at `target_width` columns.
    ///
    /// The row count follows the bitmap's aspect ratio corrected by the cell aspect; both sides
    /// are at least one. The bitmap must not be empty, see [`validate_bitmap`].
    pub fn render(&self, bitmap: &RgbImage, target_width: u32) -> AnsiFrame {
        debug_assert!(bitmap.width() > 0 && bitmap.height() > 0, "empty bitmap");

        let columns = target_width.max(1);
        let rows = rows_for(bitmap.width(), bitmap.height(), columns, self.options.cell_aspect);
        let resized = resize::resample(bitmap, columns, rows);

        let grid = GlyphMapper::new(&self.options.gradient).map_pixels(&resized);
        AnsiFrame::new(grid.to_ansi(&self.options.escapes, self.options.color))
    }

    /// Validates `image` and renders it at the width `layout` derives for it.
    pub fn render_image(
        &self,
        image: &RgbImage,
        layout: LayoutPolicy,
    ) -> Result<AnsiFrame, AnsiError> {
        validate_bitmap(0, image)?;
        let (width, height) = image.dimensions();
        let geometry =
            layout.derive(width, height, self.options.cell_aspect).ok_or(AnsiError::InvalidLayout)?;
        Ok(self.render(image, geometry.columns))
    }
}
