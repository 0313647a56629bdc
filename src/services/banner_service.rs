use std::path::PathBuf;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, DynamicImage, Frame, RgbImage};
use plotters::prelude::*;
use tracing::{debug, info};

use crate::config::BannerSettings;
use crate::services::animation_service as anim;
use crate::utils::{load_fonts, Canvas, RenderError};

const GRADIENT_TOP: (f64, f64, f64) = (15.0, 10.0, 35.0);
const GRADIENT_BOTTOM: (f64, f64, f64) = (40.0, 20.0, 80.0);
const CIRCUIT_COLOR: RGBColor = RGBColor(80, 120, 255);
const HEXAGON_COLOR: RGBColor = RGBColor(100, 150, 255);
const SUBTITLE_COLOR: RGBColor = RGBColor(200, 220, 255);

pub const TITLE: &str = "SUPREME";
pub const SUBTITLE: &str = "MIDDLEMAN SERVICES";

/// Progress notifications emitted while the banner is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerProgress {
    /// Frame `number` (1-based) of `total` is about to be rendered
    Frame { number: u32, total: u32 },
    /// All frames are rendered; the animation is being encoded
    Encoding,
}

fn rgb(c: (u8, u8, u8)) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

/// Vertical gradient, one row at a time
fn draw_gradient(canvas: &Canvas, width: u32, height: u32) -> Result<(), RenderError> {
    let (top, bottom) = (GRADIENT_TOP, GRADIENT_BOTTOM);
    for y in 0..height {
        let t = y as f64 / height as f64;
        let color = RGBColor(
            (top.0 + (bottom.0 - top.0) * t) as u8,
            (top.1 + (bottom.1 - top.1) * t) as u8,
            (top.2 + (bottom.2 - top.2) * t) as u8,
        );
        let row = y as i32;
        canvas
            .draw(&Rectangle::new([(0, row), (width as i32 - 1, row)], color.filled()))
            .map_err(|e| RenderError::draw("draw gradient", e))?;
    }
    Ok(())
}

fn draw_particles(canvas: &Canvas, progress: f64, width: u32, height: u32) -> Result<(), RenderError> {
    for p in anim::particles(progress, width, height) {
        let color = rgb(p.color);
        let result = if p.radius == 0 {
            canvas.draw_pixel((p.x, p.y), &color)
        } else {
            canvas.draw(&Circle::new((p.x, p.y), p.radius, color.filled()))
        };
        result.map_err(|e| RenderError::draw("draw particle", e))?;
    }
    Ok(())
}

fn draw_circuit_lines(canvas: &Canvas, progress: f64, width: u32) -> Result<(), RenderError> {
    let (x0, x1) = ((width as f64 * 0.6) as i32, (width as f64 * 0.9) as i32);
    for y in anim::circuit_line_rows(progress) {
        canvas
            .draw(&PathElement::new(vec![(x0, y), (x1, y)], CIRCUIT_COLOR.stroke_width(1)))
            .map_err(|e| RenderError::draw("draw circuit line", e))?;
    }
    Ok(())
}

fn draw_hexagons(canvas: &Canvas, progress: f64, width: u32, height: u32) -> Result<(), RenderError> {
    for hex in anim::hexagons(progress, width, height) {
        let style = HEXAGON_COLOR.mix(hex.opacity).stroke_width(2);
        canvas
            .draw(&PathElement::new(anim::hexagon_vertices(&hex), style))
            .map_err(|e| RenderError::draw("draw hexagon", e))?;
    }
    Ok(())
}

fn draw_shield(canvas: &Canvas, progress: f64, width: u32, height: u32) -> Result<(), RenderError> {
    let center = anim::focal_point(width, height);
    let glow = anim::shield_glow(progress);

    canvas
        .draw(&PathElement::new(anim::shield_outline(center), rgb(glow.outline).stroke_width(3)))
        .map_err(|e| RenderError::draw("draw shield", e))?;
    canvas
        .draw(&PathElement::new(anim::checkmark(center).to_vec(), rgb(glow.check).stroke_width(4)))
        .map_err(|e| RenderError::draw("draw checkmark", e))?;
    Ok(())
}

fn draw_labels(canvas: &Canvas, progress: f64) -> Result<(), RenderError> {
    let title_color = rgb(anim::title_color(progress));
    canvas
        .draw_text(TITLE, &("sans-serif", 60.0, FontStyle::Bold).into_font().color(&title_color), (50, 70))
        .map_err(|e| RenderError::draw("draw title", e))?;
    canvas
        .draw_text(SUBTITLE, &("sans-serif", 24.0).into_font().color(&SUBTITLE_COLOR), (50, 145))
        .map_err(|e| RenderError::draw("draw subtitle", e))?;
    Ok(())
}

/// Composite one banner frame
///
/// Depends only on the frame index and count, never on earlier frames.
/// Fonts must already be registered (see [`load_fonts`]).
pub fn compose_frame(frame: u32, total_frames: u32, width: u32, height: u32) -> Result<RgbImage, RenderError> {
    let progress = anim::progress(frame, total_frames);
    let mut buffer = vec![0u8; width as usize * height as usize * 3];

    {
        let canvas = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw_gradient(&canvas, width, height)?;
        draw_particles(&canvas, progress, width, height)?;
        draw_circuit_lines(&canvas, progress, width)?;
        draw_hexagons(&canvas, progress, width, height)?;
        draw_shield(&canvas, progress, width, height)?;
        draw_labels(&canvas, progress)?;
        canvas
            .present()
            .map_err(|e| RenderError::draw("render frame", e))?;
    }

    RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| RenderError::InvalidInput(format!("Frame buffer does not match {}x{}", width, height)))
}

/// Encode frames, in order, as an endlessly looping GIF
pub fn encode_gif(frames: Vec<RgbImage>, frame_delay_ms: u32) -> Result<Vec<u8>, RenderError> {
    let mut bytes = Vec::new();
    {
        let mut encoder = GifEncoder::new(&mut bytes);
        encoder.set_repeat(Repeat::Infinite)?;
        let delay = Delay::from_numer_denom_ms(frame_delay_ms, 1);
        encoder.encode_frames(
            frames
                .into_iter()
                .map(|f| Frame::from_parts(DynamicImage::ImageRgb8(f).into_rgba8(), 0, 0, delay)),
        )?;
    }
    Ok(bytes)
}

/// Render every frame and write the animation to `settings.output_path`
///
/// Nothing is written unless all frames rendered and the GIF encoded.
pub fn create_banner(
    settings: &BannerSettings,
    mut on_progress: impl FnMut(BannerProgress),
) -> Result<PathBuf, RenderError> {
    let fonts = load_fonts(&settings.fonts)?;
    debug!("Banner text fonts: {:?}", fonts);

    let mut frames = Vec::with_capacity(settings.frames as usize);
    for i in 0..settings.frames {
        on_progress(BannerProgress::Frame { number: i + 1, total: settings.frames });
        frames.push(compose_frame(i, settings.frames, settings.width, settings.height)?);
    }

    on_progress(BannerProgress::Encoding);
    let bytes = encode_gif(frames, settings.frame_delay_ms)?;
    debug!("Encoded {} bytes of GIF data", bytes.len());

    std::fs::write(&settings.output_path, bytes)?;
    info!("Banner written to {}", settings.output_path.display());
    Ok(settings.output_path.clone())
}
