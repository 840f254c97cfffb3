use std::io::{Cursor, Read};

use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, DynamicImage, Frame, RgbImage};
use log::warn;

use super::delay::DelayError;
use super::gif_timing::{self, FrameTiming};
use crate::AnsiError;

/// Decoded frames plus their per-frame timing metadata.
///
/// Sources are expected to be fully decodable; `frame` errors abort the pre-render pass.
pub trait FrameSource {
    fn frame_count(&self) -> usize;

    fn frame(&self, index: usize) -> Result<RgbImage, AnsiError>;

    /// Authored delay in hundredths of a second.
    fn delay_centis(&self, index: usize) -> Result<u32, DelayError>;
}

/// Rejects bitmaps the rasterizer cannot resample.
pub fn validate_bitmap(index: usize, image: &RgbImage) -> Result<(), AnsiError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(AnsiError::EmptyBitmap { index });
    }
    Ok(())
}

pub struct StaticFrame {
    image: RgbImage,
}

impl StaticFrame {
    pub fn new(image: DynamicImage) -> Self {
        Self { image: image.into_rgb8() }
    }
}

impl FrameSource for StaticFrame {
    fn frame_count(&self) -> usize {
        1
    }

    fn frame(&self, index: usize) -> Result<RgbImage, AnsiError> {
        if index != 0 {
            return Err(AnsiError::FrameOutOfRange { index, count: 1 });
        }
        Ok(self.image.clone())
    }

    fn delay_centis(&self, _index: usize) -> Result<u32, DelayError> {
        Err(DelayError::Missing)
    }
}

struct DecodedFrame {
    image: RgbImage,
    timing: FrameTiming,
}

/// An in-memory animation, either decoded from a container or assembled from stills.
pub struct DecodedFrames {
    frames: Vec<DecodedFrame>,
}

impl DecodedFrames {
    /// Frames whose delays the caller vouches for; every frame counts as timed.
    pub fn from_animation(frames: Vec<Frame>) -> Self {
        let frames = frames
            .into_iter()
            .map(|frame| {
                let (numer, denom) = frame.delay().numer_denom_ms();
                let centis = (f64::from(numer) / f64::from(denom) / 10.0).round() as u32;
                let image = DynamicImage::ImageRgba8(frame.into_buffer()).into_rgb8();
                DecodedFrame { image, timing: FrameTiming::Authored(centis) }
            })
            .collect();
        Self { frames }
    }

    /// Decodes a GIF stream, keeping frames without a Graphic Control Extension untimed.
    pub fn from_gif<R: Read>(mut reader: R) -> Result<Self, AnsiError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;

        let decoded = GifDecoder::new(Cursor::new(&bytes))?.into_frames().collect_frames()?;
        let (mut timings, error) = gif_timing::scan(&bytes);
        if let Some(error) = error {
            warn!("unreadable GIF timing after {} frames: {error}", timings.len());
            timings.resize(decoded.len(), FrameTiming::Malformed(error));
        }

        let frames = decoded
            .into_iter()
            .enumerate()
            .map(|(index, frame)| DecodedFrame {
                image: DynamicImage::ImageRgba8(frame.into_buffer()).into_rgb8(),
                timing: timings.get(index).cloned().unwrap_or(FrameTiming::Missing),
            })
            .collect();
        Ok(Self { frames })
    }

    /// Stills carry no timing metadata.
    pub fn from_images(images: Vec<DynamicImage>) -> Self {
        let frames = images
            .into_iter()
            .map(|image| DecodedFrame { image: image.into_rgb8(), timing: FrameTiming::Missing })
            .collect();
        Self { frames }
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    fn get(&self, index: usize) -> Option<&DecodedFrame> {
        self.frames.get(index)
    }
}

impl FrameSource for DecodedFrames {
    fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn frame(&self, index: usize) -> Result<RgbImage, AnsiError> {
        self.get(index)
            .map(|frame| frame.image.clone())
            .ok_or(AnsiError::FrameOutOfRange { index, count: self.frames.len() })
    }

    fn delay_centis(&self, index: usize) -> Result<u32, DelayError> {
        let frame = self.get(index).ok_or(DelayError::OutOfRange(index))?;
        match &frame.timing {
            FrameTiming::Authored(centis) => Ok(*centis),
            FrameTiming::Missing => Err(DelayError::Missing),
            FrameTiming::Malformed(reason) => Err(DelayError::Malformed(reason.clone())),
        }
    }
}
