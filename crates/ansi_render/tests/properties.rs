use std::time::Duration;

use ansi_render::{
    delay_for_frame, AnsiError, DecodedFrames, DelayPolicy, FrameSeries, FrameSource, Gradient,
    LayoutPolicy, Rasterizer, RenderOptions, DEFAULT_CELL_ASPECT,
};
use image::{Delay, DynamicImage, Frame, Rgb, RgbImage, RgbaImage};
use pretty_assertions::assert_eq;

const ESC: char = '\u{1b}';
const RESET: &str = "\u{1b}[0m";

fn rasterizer(color: bool) -> Rasterizer {
    Rasterizer::new(RenderOptions { color, ..RenderOptions::default() })
}

/// Pixels varying in both directions so resampling has real work to do.
fn pattern(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 37 % 256) as u8, (y * 53 % 256) as u8, ((x + y) * 11 % 256) as u8])
    })
}

#[test]
fn line_breaks_match_target_height() {
    let rasterizer = rasterizer(false);
    for &(width, height, columns) in
        &[(3, 3, 3), (64, 48, 32), (10, 200, 7), (200, 10, 50), (1, 1, 1), (33, 17, 20)]
    {
        let frame = rasterizer.render(&pattern(width, height), columns);
        let expected =
            ((f64::from(height) / f64::from(width) * f64::from(columns) * DEFAULT_CELL_ASPECT)
                .round() as usize)
                .max(1);

        assert_eq!(frame.line_count(), expected, "{width}x{height} at {columns}");
        assert_eq!(frame.text().matches('\n').count(), expected);
        for line in frame.text().lines() {
            assert_eq!(line.chars().count(), columns as usize);
        }
    }
}

#[test]
fn plain_output_has_no_escapes() {
    let frame = rasterizer(false).render(&pattern(40, 40), 20);
    assert!(!frame.text().contains(ESC));
}

#[test]
fn color_output_prefixes_every_glyph_and_resets_once() {
    let frame = rasterizer(true).render(&pattern(40, 40), 20);
    let text = frame.text();
    let glyphs = 20 * frame.line_count();

    assert_eq!(text.matches("\u{1b}[38;2;").count(), glyphs);
    assert_eq!(text.matches(RESET).count(), 1);
    assert!(text.ends_with(&format!("\n{RESET}")));
    assert_eq!(text.matches(ESC).count(), glyphs + 1);
}

#[test]
fn rendering_is_idempotent() {
    let image = pattern(57, 31);
    let rasterizer = rasterizer(true);
    assert_eq!(rasterizer.render(&image, 25), rasterizer.render(&image, 25));
}

#[test]
fn brighter_pixels_never_get_denser_glyphs() {
    let gradient = Gradient::density();
    let options = RenderOptions { color: false, ..RenderOptions::default() };
    let rasterizer = Rasterizer::new(options);

    // One flat gray image per level so resampling cannot blend neighbours.
    let mut previous = usize::MAX;
    for gray in 0..=255u8 {
        let image = RgbImage::from_pixel(2, 4, Rgb([gray, gray, gray]));
        let text = rasterizer.render(&image, 2).into_text();
        let glyph = text.chars().next().unwrap();
        let position = gradient.chars().iter().position(|&c| c == glyph).unwrap();
        assert!(position <= previous, "gray {gray} selected a denser glyph");
        previous = position;
    }
    assert_eq!(previous, 0);
}

#[test]
fn white_bitmap_renders_blank_rows() {
    let image = RgbImage::from_pixel(3, 3, Rgb([255, 255, 255]));
    let frame = rasterizer(false).render(&image, 3);
    assert_eq!(frame.text(), "   \n   \n");
}

#[test]
fn black_pixel_renders_densest_glyph_in_color() {
    let image = RgbImage::from_pixel(1, 1, Rgb([0, 0, 0]));
    let frame = rasterizer(true).render(&image, 1);
    let densest = Gradient::density().densest();
    assert_eq!(frame.text(), format!("\u{1b}[38;2;0;0;0m{densest}\n{RESET}"));
}

#[test]
fn delay_extraction_never_fails() {
    let frames = vec![
        Frame::from_parts(RgbaImage::new(2, 2), 0, 0, Delay::from_numer_denom_ms(120, 1)),
        Frame::from_parts(RgbaImage::new(2, 2), 0, 0, Delay::from_numer_denom_ms(0, 1)),
    ];
    let source = DecodedFrames::from_animation(frames);
    let policy = DelayPolicy::default();

    assert_eq!(delay_for_frame(&source, 0, policy), Duration::from_millis(120));
    assert_eq!(delay_for_frame(&source, 1, policy), Duration::ZERO);
    for index in 2..10 {
        assert_eq!(delay_for_frame(&source, index, policy), Duration::from_millis(50));
    }

    let stills = DecodedFrames::from_images(vec![DynamicImage::ImageRgb8(RgbImage::new(2, 2))]);
    assert_eq!(delay_for_frame(&stills, 0, policy), Duration::from_millis(50));
}

/// Two 1x1 frames; only the first is preceded by a Graphic Control Extension (10 cs).
const PARTLY_TIMED_GIF: &[u8] = &[
    b'G', b'I', b'F', b'8', b'9', b'a', // signature
    0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, // screen descriptor, two-entry color table
    0x00, 0x00, 0x00, 0xff, 0xff, 0xff, // color table
    0x21, 0xf9, 0x04, 0x00, 0x0a, 0x00, 0x00, 0x00, // graphic control, delay 10
    0x2c, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, // image descriptor
    0x02, 0x02, 0x44, 0x01, 0x00, // image data
    0x2c, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, // image descriptor
    0x02, 0x02, 0x44, 0x01, 0x00, // image data
    0x3b, // trailer
];

#[test]
fn gif_frames_without_timing_use_fallback() {
    let source = DecodedFrames::from_gif(PARTLY_TIMED_GIF).unwrap();
    let policy = DelayPolicy::default();

    assert_eq!(source.frame_count(), 2);
    assert_eq!(delay_for_frame(&source, 0, policy), Duration::from_millis(100));
    assert_eq!(delay_for_frame(&source, 1, policy), Duration::from_millis(50));

    let series =
        FrameSeries::prerender(&source, &rasterizer(false), LayoutPolicy::FixedColumns(1), policy)
            .unwrap();
    assert_eq!(series.total_duration(), Duration::from_millis(150));
}

#[test]
fn prerender_is_all_or_nothing() {
    let images = vec![
        DynamicImage::ImageRgb8(pattern(8, 8)),
        DynamicImage::ImageRgb8(pattern(8, 8)),
        DynamicImage::ImageRgb8(RgbImage::new(0, 8)),
    ];
    let result = FrameSeries::prerender(
        &DecodedFrames::from_images(images),
        &rasterizer(true),
        LayoutPolicy::default(),
        DelayPolicy::default(),
    );
    assert!(matches!(result, Err(AnsiError::EmptyBitmap { index: 2 })));
}
