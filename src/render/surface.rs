use std::sync::Arc;

use crate::effects::composite::premultiply_rgba8_in_place;
use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8};
use crate::foundation::error::{KeepsakeError, KeepsakeResult};
use crate::render::bitmap::RenderedBitmap;
use kurbo::Shape;

/// A decoded raster ready to be used as a paint.
#[derive(Clone)]
pub struct ImagePaint {
    paint: vello_cpu::Image,
    w: u32,
    h: u32,
}

impl std::fmt::Debug for ImagePaint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagePaint")
            .field("w", &self.w)
            .field("h", &self.h)
            .finish_non_exhaustive()
    }
}

impl ImagePaint {
    /// Wrap premultiplied RGBA8 bytes.
    pub fn from_premul(bytes: &[u8], width: u32, height: u32) -> KeepsakeResult<Self> {
        let pixmap = pixmap_from_premul_bytes(bytes, width, height)?;
        Ok(Self::from_pixmap(Arc::new(pixmap), width, height))
    }

    /// Wrap a straight-alpha image, premultiplying a copy.
    pub fn from_rgba_image(img: &image::RgbaImage) -> KeepsakeResult<Self> {
        let (w, h) = img.dimensions();
        let mut bytes = img.as_raw().clone();
        premultiply_rgba8_in_place(&mut bytes);
        Self::from_premul(&bytes, w, h)
    }

    fn from_pixmap(pixmap: Arc<vello_cpu::Pixmap>, w: u32, h: u32) -> Self {
        let sampler = vello_cpu::peniko::ImageSampler::default()
            .with_quality(vello_cpu::peniko::ImageQuality::High);
        Self {
            paint: vello_cpu::Image {
                image: vello_cpu::ImageSource::Pixmap(pixmap),
                sampler,
            },
            w,
            h,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.w
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.h
    }
}

/// An owned drawing target: a premultiplied pixmap plus a reusable vector context.
///
/// Pixel passes mutate [`Surface::data_mut`] directly; vector passes go through
/// [`Surface::draw`], which composites new drawing over the current pixels.
pub struct Surface {
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
    ctx: Option<vello_cpu::RenderContext>,
}

impl Surface {
    /// Create a transparent surface.
    pub fn new(width: u32, height: u32) -> KeepsakeResult<Self> {
        let (w, h) = checked_dims(width, height)?;
        Ok(Self {
            width: w,
            height: h,
            pixmap: vello_cpu::Pixmap::new(w, h),
            ctx: None,
        })
    }

    /// Create a transparent surface sized to `canvas`.
    pub fn for_canvas(canvas: Canvas) -> KeepsakeResult<Self> {
        Self::new(canvas.width, canvas.height)
    }

    /// Create a surface holding a copy of a straight-alpha image.
    pub fn from_rgba_image(img: &image::RgbaImage) -> KeepsakeResult<Self> {
        let (width, height) = img.dimensions();
        let (w, h) = checked_dims(width, height)?;
        let mut bytes = img.as_raw().clone();
        premultiply_rgba8_in_place(&mut bytes);
        Ok(Self {
            width: w,
            height: h,
            pixmap: pixmap_from_premul_bytes(&bytes, width, height)?,
            ctx: None,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    /// Surface bounds.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    /// Premultiplied RGBA8 pixels, row-major.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    /// Mutable premultiplied RGBA8 pixels, row-major.
    pub fn data_mut(&mut self) -> &mut [u8] {
        self.pixmap.data_as_u8_slice_mut()
    }

    /// Overwrite every pixel with `color`.
    pub fn clear(&mut self, color: Rgba8) {
        let px = color.premul().to_array();
        for dst in self.data_mut().chunks_exact_mut(4) {
            dst.copy_from_slice(&px);
        }
    }

    /// Current pixels as an image paint (copy).
    pub fn snapshot(&self) -> ImagePaint {
        ImagePaint::from_pixmap(
            Arc::new(self.pixmap.clone()),
            self.width(),
            self.height(),
        )
    }

    /// Run a vector drawing pass over the current contents.
    ///
    /// On error the surface keeps its previous pixels.
    pub fn draw<R>(
        &mut self,
        f: impl FnOnce(&mut Painter<'_>) -> KeepsakeResult<R>,
    ) -> KeepsakeResult<R> {
        let backdrop = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(self.pixmap.clone())),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        let mut ctx = match self.ctx.take() {
            Some(ctx) => ctx,
            None => vello_cpu::RenderContext::new(self.width, self.height),
        };
        ctx.reset();
        ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(backdrop);
        ctx.fill_rect(&rect_to_cpu(self.bounds()));

        let out = {
            let mut painter = Painter {
                ctx: &mut ctx,
                transform: Affine::IDENTITY,
            };
            f(&mut painter)
        };
        if out.is_ok() {
            ctx.flush();
            ctx.render_to_pixmap(&mut self.pixmap);
        }
        self.ctx = Some(ctx);
        out
    }

    /// Finish drawing and hand the pixels over as an immutable bitmap.
    pub fn into_bitmap(self) -> RenderedBitmap {
        let data = self.pixmap.data_as_u8_slice().to_vec();
        RenderedBitmap::from_premul(self.width(), self.height(), data)
    }
}

/// Drawing API handed to [`Surface::draw`] closures.
///
/// Every helper restores the transform, clip and opacity state it changes.
pub struct Painter<'a> {
    pub(crate) ctx: &'a mut vello_cpu::RenderContext,
    transform: Affine,
}

impl Painter<'_> {
    /// Current user-space transform.
    pub fn transform(&self) -> Affine {
        self.transform
    }

    /// Run `f` with `t` appended to the current transform.
    pub fn with_transform<R>(&mut self, t: Affine, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = self.transform;
        self.transform = saved * t;
        let out = f(self);
        self.transform = saved;
        out
    }

    /// Run `f` with drawing clipped to `path` (in current user space).
    pub fn with_clip<R>(&mut self, path: &BezPath, f: impl FnOnce(&mut Self) -> R) -> R {
        self.apply_transform();
        self.ctx.push_clip_layer(&bezpath_to_cpu(path));
        let out = f(self);
        self.ctx.pop_layer();
        out
    }

    /// Run `f` inside an opacity group.
    pub fn with_opacity<R>(&mut self, opacity: f32, f: impl FnOnce(&mut Self) -> R) -> R {
        let opacity = opacity.clamp(0.0, 1.0);
        if opacity >= 1.0 {
            return f(self);
        }
        self.ctx.push_opacity_layer(opacity);
        let out = f(self);
        self.ctx.pop_layer();
        out
    }

    /// Fill an axis-aligned rectangle.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        self.apply_transform();
        self.ctx.set_paint(color.to_cpu());
        self.ctx.fill_rect(&rect_to_cpu(rect));
    }

    /// Fill any kurbo shape (rounded rect, circle, ellipse, path).
    pub fn fill_shape(&mut self, shape: &impl Shape, color: Rgba8) {
        self.fill_path(&shape.to_path(0.1), color);
    }

    /// Fill a path with the non-zero rule.
    pub fn fill_path(&mut self, path: &BezPath, color: Rgba8) {
        self.apply_transform();
        self.ctx.set_paint(color.to_cpu());
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    /// Draw a straight segment of the given thickness with butt caps.
    pub fn line(&mut self, a: Point, b: Point, width: f64, color: Rgba8) {
        let d = b - a;
        let len = d.hypot();
        if len <= f64::EPSILON || width <= 0.0 {
            return;
        }
        let n = kurbo::Vec2::new(-d.y / len, d.x / len) * (width / 2.0);
        let mut path = BezPath::new();
        path.move_to(a + n);
        path.line_to(b + n);
        path.line_to(b - n);
        path.line_to(a - n);
        path.close_path();
        self.fill_path(&path, color);
    }

    /// Horizontal dashed rule from `x0` to `x1` centered on `y`.
    #[allow(clippy::too_many_arguments)]
    pub fn dashed_line(
        &mut self,
        x0: f64,
        x1: f64,
        y: f64,
        dash: f64,
        gap: f64,
        width: f64,
        color: Rgba8,
    ) {
        if dash <= 0.0 {
            return;
        }
        let mut x = x0;
        while x < x1 {
            let end = (x + dash).min(x1);
            self.line(Point::new(x, y), Point::new(end, y), width, color);
            x = end + gap.max(0.0);
        }
    }

    /// Draw the whole image stretched into `dest`.
    pub fn draw_image(&mut self, img: &ImagePaint, dest: Rect) {
        if img.w == 0 || img.h == 0 || dest.width() <= 0.0 || dest.height() <= 0.0 {
            return;
        }
        let sx = dest.width() / f64::from(img.w);
        let sy = dest.height() / f64::from(img.h);
        let t = Affine::translate((dest.x0, dest.y0)) * Affine::scale_non_uniform(sx, sy);
        self.with_transform(t, |p| {
            p.apply_transform();
            p.ctx.set_paint(img.paint.clone());
            p.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(img.w),
                f64::from(img.h),
            ));
        });
    }

    /// Draw the image scaled to cover `dest` exactly, center-cropped, aspect preserved.
    pub fn draw_image_cover(&mut self, img: &ImagePaint, dest: Rect) {
        let placed = cover_rect(img.w, img.h, dest);
        let clip = dest.to_path(0.1);
        self.with_clip(&clip, |p| p.draw_image(img, placed));
    }

    /// Fill positioned glyphs of `font` at `size` (glyph coordinates in user space).
    pub(crate) fn fill_glyphs(
        &mut self,
        font: &vello_cpu::peniko::FontData,
        size: f32,
        glyphs: impl Iterator<Item = vello_cpu::Glyph>,
        color: Rgba8,
    ) {
        self.apply_transform();
        self.ctx.set_paint(color.to_cpu());
        self.ctx.glyph_run(font).font_size(size).fill_glyphs(glyphs);
    }

    fn apply_transform(&mut self) {
        self.ctx.set_transform(affine_to_cpu(self.transform));
    }
}

/// Rectangle the image should occupy so it covers `dest` while keeping its aspect ratio.
pub fn cover_rect(img_w: u32, img_h: u32, dest: Rect) -> Rect {
    if img_w == 0 || img_h == 0 {
        return dest;
    }
    let (iw, ih) = (f64::from(img_w), f64::from(img_h));
    let scale = (dest.width() / iw).max(dest.height() / ih);
    let (w, h) = (iw * scale, ih * scale);
    let c = dest.center();
    Rect::new(c.x - w / 2.0, c.y - h / 2.0, c.x + w / 2.0, c.y + h / 2.0)
}

fn checked_dims(width: u32, height: u32) -> KeepsakeResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| KeepsakeError::render("surface width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| KeepsakeError::render("surface height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(KeepsakeError::validation("surface must be non-empty"));
    }
    Ok((w, h))
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let pt = |p: Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(pt(p)),
            PathEl::LineTo(p) => out.line_to(pt(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

pub(crate) fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> KeepsakeResult<vello_cpu::Pixmap> {
    let (w, h) = checked_dims(width, height)?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(KeepsakeError::render("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| {
            vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]])
        })
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
