//! Headless raster backend built on tiny-skia.
//!
//! tiny-skia has no sweep gradient, so this surface reports no conic support
//! and the value arc arrives as flat-colored slices. The frame is always
//! opaque after `draw_background`, which lets text be drawn through an
//! `image::RgbaImage` view of the same bytes without any alpha conversion.

use std::f64::consts::FRAC_PI_2;

use gauge_common::{AvatarOverlay, Color, GaugeError, GaugeResult, HandleOverlay};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use rusttype::{Font, Scale};
use tiny_skia::{
    ColorU8, Paint, Path, PathBuilder, Pixmap, PixmapPaint, Stroke, Transform,
};

use crate::geometry::Point;
use crate::png::create_png;
use crate::surface::{ArcStroke, Asset, Capabilities, GaugeSurface, LineCap};

pub struct RasterSurface<'f> {
    pixmap: Pixmap,
    font: Option<&'f Font<'static>>,
}

impl<'f> RasterSurface<'f> {
    pub fn new(width: u32, height: u32) -> GaugeResult<Self> {
        let pixmap = Pixmap::new(width, height).ok_or_else(|| {
            GaugeError::RenderError(format!("cannot allocate {}x{} surface", width, height))
        })?;
        Ok(Self { pixmap, font: None })
    }

    /// Font used for the handle text. Without one, text is skipped.
    pub fn with_font(mut self, font: &'f Font<'static>) -> Self {
        self.font = Some(font);
        self
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Straight-alpha color at (x, y).
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some(Color::new(c.red(), c.green(), c.blue(), c.alpha()))
    }

    /// Straight-alpha RGBA bytes, row-major.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixmap.data().len());
        for p in self.pixmap.pixels() {
            let c = p.demultiply();
            out.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        out
    }

    pub fn encode_png(&self) -> GaugeResult<Vec<u8>> {
        create_png(
            &self.to_rgba(),
            self.pixmap.width() as usize,
            self.pixmap.height() as usize,
        )
    }

    fn stroke_path(&mut self, path: &Path, width: f64, cap: LineCap, color: Color) {
        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, color.a);
        paint.anti_alias = true;

        let mut stroke = Stroke::default();
        stroke.width = width as f32;
        stroke.line_cap = match cap {
            LineCap::Butt => tiny_skia::LineCap::Butt,
            LineCap::Round => tiny_skia::LineCap::Round,
        };

        self.pixmap
            .stroke_path(path, &paint, &stroke, Transform::identity(), None);
    }

    fn blit(&mut self, image: &RgbaImage, x: i32, y: i32) {
        if let Some(layer) = image_to_pixmap(image) {
            self.pixmap.draw_pixmap(
                x,
                y,
                layer.as_ref(),
                &PixmapPaint::default(),
                Transform::identity(),
                None,
            );
        }
    }
}

impl GaugeSurface for RasterSurface<'_> {
    fn size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            native_conic_gradient: false,
        }
    }

    fn draw_background(&mut self, art: Option<&Asset>, fallback: Color) {
        self.pixmap.fill(tiny_skia::Color::from_rgba8(
            fallback.r, fallback.g, fallback.b, 255,
        ));

        let Some(art) = art else { return };
        match &art.image {
            Some(image) => {
                let (width, height) = self.size();
                let scaled = imageops::resize(image, width, height, FilterType::Triangle);
                self.blit(&scaled, 0, 0);
            }
            None => tracing::warn!(source = %art.source, "Background art not decoded, using fallback fill"),
        }
    }

    fn draw_avatar(&mut self, avatar: &Asset, overlay: &AvatarOverlay) {
        let Some(image) = &avatar.image else {
            tracing::debug!(source = %avatar.source, "Avatar not decoded, skipping");
            return;
        };
        let scaled = imageops::resize(image, overlay.size, overlay.size, FilterType::Triangle);
        self.blit(&scaled, overlay.x, overlay.y);
    }

    fn draw_text(&mut self, text: &str, overlay: &HandleOverlay) {
        let Some(font) = self.font else {
            tracing::debug!("No font loaded, skipping handle text");
            return;
        };
        let (width, height) = self.size();
        let Some(mut canvas) = RgbaImage::from_raw(width, height, self.pixmap.data().to_vec())
        else {
            return;
        };

        let color = overlay.color;
        draw_text_mut(
            &mut canvas,
            Rgba([color.r, color.g, color.b, 255]),
            overlay.x,
            overlay.y,
            Scale::uniform(overlay.font_px as f32),
            font,
            text,
        );
        self.pixmap.data_mut().copy_from_slice(canvas.as_raw());
    }

    fn stroke_arc(&mut self, arc: &ArcStroke, color: Color) {
        if let Some(path) = arc_path(arc.center, arc.radius, arc.start, arc.end) {
            self.stroke_path(&path, arc.width, arc.cap, color);
        }
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Color) {
        let mut pb = PathBuilder::new();
        pb.move_to(from.x as f32, from.y as f32);
        pb.line_to(to.x as f32, to.y as f32);
        if let Some(path) = pb.finish() {
            self.stroke_path(&path, width, LineCap::Round, color);
        }
    }
}

/// Circular arc as cubic Béziers, at most a quarter turn per piece.
fn arc_path(center: Point, radius: f64, start: f64, end: f64) -> Option<Path> {
    let sweep = end - start;
    if sweep <= 0.0 || radius <= 0.0 {
        return None;
    }

    let pieces = (sweep / FRAC_PI_2).ceil().max(1.0) as usize;
    let step = sweep / pieces as f64;
    let k = 4.0 / 3.0 * (step / 4.0).tan();
    let at = |a: f64| (center.x + radius * a.cos(), center.y + radius * a.sin());

    let mut pb = PathBuilder::new();
    let (x0, y0) = at(start);
    pb.move_to(x0 as f32, y0 as f32);

    for i in 0..pieces {
        let a0 = start + step * i as f64;
        let a1 = a0 + step;
        let (s0, c0) = a0.sin_cos();
        let (s1, c1) = a1.sin_cos();
        let (x1, y1) = at(a1);
        pb.cubic_to(
            (center.x + radius * (c0 - k * s0)) as f32,
            (center.y + radius * (s0 + k * c0)) as f32,
            (center.x + radius * (c1 + k * s1)) as f32,
            (center.y + radius * (s1 - k * c1)) as f32,
            x1 as f32,
            y1 as f32,
        );
    }

    pb.finish()
}

fn image_to_pixmap(image: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_sized_surface_is_an_error() {
        assert!(RasterSurface::new(0, 10).is_err());
    }

    #[test]
    fn test_arc_path_rejects_empty_sweep() {
        assert!(arc_path(Point::new(0.0, 0.0), 10.0, 1.0, 1.0).is_none());
        assert!(arc_path(Point::new(0.0, 0.0), 10.0, 2.0, 1.0).is_none());
    }

    #[test]
    fn test_arc_path_bounds_half_circle() {
        let path = arc_path(Point::new(50.0, 50.0), 40.0, std::f64::consts::PI, 2.0 * std::f64::consts::PI)
            .unwrap();
        let b = path.bounds();
        assert!((b.left() - 10.0).abs() < 0.5);
        assert!((b.right() - 90.0).abs() < 0.5);
        assert!((b.top() - 10.0).abs() < 0.5);
        assert!((b.bottom() - 50.0).abs() < 0.5);
    }

    #[test]
    fn test_background_fallback_fill() {
        let mut surface = RasterSurface::new(4, 4).unwrap();
        surface.draw_background(None, Color::rgb(1, 2, 3));
        assert_eq!(surface.pixel(2, 2), Some(Color::rgb(1, 2, 3)));
    }

    #[test]
    fn test_background_art_is_scaled_to_frame() {
        let art = RgbaImage::from_pixel(2, 2, Rgba([200, 10, 10, 255]));
        let mut surface = RasterSurface::new(8, 6).unwrap();
        surface.draw_background(Some(&Asset::from_image("bg.png", art)), Color::rgb(0, 0, 0));
        assert_eq!(surface.pixel(0, 0), Some(Color::rgb(200, 10, 10)));
        assert_eq!(surface.pixel(7, 5), Some(Color::rgb(200, 10, 10)));
    }

    #[test]
    fn test_avatar_square_placement() {
        let avatar = RgbaImage::from_pixel(5, 3, Rgba([0, 0, 255, 255]));
        let mut surface = RasterSurface::new(20, 20).unwrap();
        surface.draw_background(None, Color::rgb(0, 0, 0));
        surface.draw_avatar(
            &Asset::from_image("a.png", avatar),
            &AvatarOverlay { x: 4, y: 4, size: 8 },
        );
        assert_eq!(surface.pixel(4, 4), Some(Color::rgb(0, 0, 255)));
        assert_eq!(surface.pixel(11, 11), Some(Color::rgb(0, 0, 255)));
        assert_eq!(surface.pixel(12, 12), Some(Color::rgb(0, 0, 0)));
        assert_eq!(surface.pixel(3, 3), Some(Color::rgb(0, 0, 0)));
    }
}
