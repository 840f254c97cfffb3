use std::time::Duration;

use log::{debug, info};

use crate::ascii::frame::AnsiFrame;
use crate::image_pipeline::{
    delay::{delay_for_frame, DelayPolicy},
    loader::{validate_bitmap, FrameSource},
    resize::{LayoutPolicy, TargetGeometry},
};
use crate::{AnsiError, Rasterizer};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRecord {
    pub frame: AnsiFrame,
    pub delay: Duration,
}

impl FrameRecord {
    pub fn line_count(&self) -> usize {
        self.frame.line_count()
    }
}

/// Every frame of an animation, rendered ahead of playback.
#[derive(Clone, Debug, Default)]
pub struct FrameSeries {
    frames: Vec<FrameRecord>,
    total_duration: Duration,
    geometry: Option<TargetGeometry>,
}

impl FrameSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders all frames of `source` with the column count derived from its first frame.
    pub fn prerender<S>(
        source: &S,
        rasterizer: &Rasterizer,
        layout: LayoutPolicy,
        policy: DelayPolicy,
    ) -> Result<Self, AnsiError>
    where
        S: FrameSource + ?Sized,
    {
        Self::prerender_with_progress(source, rasterizer, layout, policy, |_, _| {})
    }

    /// Like [`FrameSeries::prerender`], reporting `(rendered, total)` after each frame.
    pub fn prerender_with_progress<S, F>(
        source: &S,
        rasterizer: &Rasterizer,
        layout: LayoutPolicy,
        policy: DelayPolicy,
        mut progress: F,
    ) -> Result<Self, AnsiError>
    where
        S: FrameSource + ?Sized,
        F: FnMut(usize, usize),
    {
        let frame_count = source.frame_count();
        if frame_count == 0 {
            return Err(AnsiError::EmptySeries);
        }

        let first = source.frame(0)?;
        validate_bitmap(0, &first)?;
        let (width, height) = first.dimensions();
        let geometry = layout
            .derive(width, height, rasterizer.options().cell_aspect)
            .ok_or(AnsiError::InvalidLayout)?;

        let mut series = Self::new();
        series.frames.reserve(frame_count);

        for index in 0..frame_count {
            let bitmap = if index == 0 { first.clone() } else { source.frame(index)? };
            validate_bitmap(index, &bitmap)?;

            let frame = rasterizer.render(&bitmap, geometry.columns);
            let delay = delay_for_frame(source, index, policy);
            debug!(
                "rendered frame {index}: {}x{} px -> {} lines, {}ms",
                bitmap.width(),
                bitmap.height(),
                frame.line_count(),
                delay.as_millis()
            );

            series.push_frame(FrameRecord { frame, delay });
            progress(index + 1, frame_count);
        }

        series.geometry = Some(geometry);
        info!(
            "pre-rendered {} frames at {} columns, loop length {}ms",
            series.len(),
            geometry.columns,
            series.total_duration().as_millis()
        );
        Ok(series)
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn geometry(&self) -> Option<TargetGeometry> {
        self.geometry
    }

    pub fn push_frame(&mut self, record: FrameRecord) {
        self.total_duration += record.delay;
        self.frames.push(record);
    }

    pub fn total_duration(&self) -> Duration {
        self.total_duration
    }

    pub fn frame(&self, index: usize) -> Option<&FrameRecord> {
        self.frames.get(index)
    }

    pub fn frames(&self) -> &[FrameRecord] {
        &self.frames
    }
}

impl FromIterator<FrameRecord> for FrameSeries {
    fn from_iter<I: IntoIterator<Item = FrameRecord>>(iter: I) -> Self {
        let mut series = Self::new();
        for record in iter {
            series.push_frame(record);
        }
        series
    }
}
