//! Immediate-mode 2D drawing context over the CPU rasterization engine.
//!
//! [`Context2d`] owns the engine context plus the stateful drawing
//! parameters the op vocabulary manipulates: current path, fill/stroke
//! styles, line settings, global alpha, composition mode and font. The batch
//! interpreter drives it; nothing here is public API.

use std::sync::Arc;

use crate::color::Channels;
use crate::error::{SlateError, SlateResult};
use crate::geom::{Position, Size, rect_at};
use crate::model::CanvasModel;
use crate::ops::{CompositeMode, DrawTarget, FontSpec, LineCap};
use crate::pixels;
use crate::text::{TextBrush, TextLayouter};

const BLACK: Channels = Channels {
    red: 0,
    green: 0,
    blue: 0,
    alpha: 1.0,
};

pub(crate) struct Context2d {
    ctx: vello_cpu::RenderContext,
    width: u16,
    height: u16,

    path: kurbo::BezPath,
    fill: Channels,
    stroke: Channels,
    global_alpha: f32,
    line_width: f64,
    line_cap: LineCap,
    composite: CompositeMode,
    font: Option<FontSpec>,
    text: TextLayouter,
}

impl Context2d {
    pub(crate) fn new(width: u16, height: u16) -> Self {
        Self {
            ctx: vello_cpu::RenderContext::new(width, height),
            width,
            height,
            path: kurbo::BezPath::new(),
            fill: BLACK,
            stroke: BLACK,
            global_alpha: 1.0,
            line_width: 1.0,
            line_cap: LineCap::Butt,
            composite: CompositeMode::SourceOver,
            font: None,
            text: TextLayouter::new(),
        }
    }

    /// Paint an existing surface at the origin, 1:1, before any op runs.
    ///
    /// This realizes the clone half of clone-then-mutate: ops composite
    /// against the seeded content inside the same context, so composition
    /// modes and clears see the prior pixels exactly as a live surface would.
    pub(crate) fn seed(&mut self, surface: &Arc<vello_cpu::Pixmap>) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx
            .set_blend_mode(vello_cpu::peniko::BlendMode::default());
        self.ctx.set_paint(pixels::image_from_pixmap(surface));
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(surface.width()),
            f64::from(surface.height()),
        ));
    }

    /// Render everything drawn so far into a fresh surface.
    pub(crate) fn finish(mut self) -> vello_cpu::Pixmap {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        pixmap
    }

    // ----- style setters -------------------------------------------------

    pub(crate) fn set_font(&mut self, font: FontSpec) {
        self.font = Some(font);
    }

    pub(crate) fn set_global_alpha(&mut self, alpha: f32) {
        self.global_alpha = alpha.clamp(0.0, 1.0);
    }

    pub(crate) fn set_composite(&mut self, mode: CompositeMode) {
        tracing::trace!(mode = mode.keyword(), "set composite mode");
        self.composite = mode;
    }

    pub(crate) fn set_line_cap(&mut self, cap: LineCap) {
        tracing::trace!(cap = cap.keyword(), "set line cap");
        self.line_cap = cap;
    }

    pub(crate) fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
    }

    pub(crate) fn set_fill_style(&mut self, color: Channels) {
        tracing::trace!(style = %color.css_string(), "set fill style");
        self.fill = color;
    }

    pub(crate) fn set_stroke_style(&mut self, color: Channels) {
        tracing::trace!(style = %color.css_string(), "set stroke style");
        self.stroke = color;
    }

    // ----- path builders -------------------------------------------------

    pub(crate) fn begin_path(&mut self) {
        self.path = kurbo::BezPath::new();
    }

    pub(crate) fn move_to(&mut self, p: Position) {
        self.path.move_to(p.to_point());
    }

    pub(crate) fn line_to(&mut self, p: Position) {
        // Matching the host drawing API: a line from an empty path starts a
        // new subpath instead of drawing.
        if self.path.elements().is_empty() {
            self.path.move_to(p.to_point());
        } else {
            self.path.line_to(p.to_point());
        }
    }

    pub(crate) fn rect(&mut self, position: Position, size: Size) {
        let r = rect_at(position, size);
        self.path.move_to(kurbo::Point::new(r.x0, r.y0));
        self.path.line_to(kurbo::Point::new(r.x1, r.y0));
        self.path.line_to(kurbo::Point::new(r.x1, r.y1));
        self.path.line_to(kurbo::Point::new(r.x0, r.y1));
        self.path.close_path();
    }

    // ----- path finishers ------------------------------------------------

    /// Fill the accumulated path. The path itself is left intact.
    pub(crate) fn fill(&mut self) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_blend_mode(self.composite.to_blend());
        self.ctx.set_paint(self.fill.to_paint(self.global_alpha));
        let path = bezpath_to_cpu(&self.path);
        self.ctx.fill_path(&path);
    }

    /// Stroke the accumulated path. The path itself is left intact.
    pub(crate) fn stroke(&mut self) {
        self.prepare_stroke();
        let path = bezpath_to_cpu(&self.path);
        self.ctx.stroke_path(&path);
    }

    /// Stroke a rectangle outline immediately, without touching the path.
    pub(crate) fn stroke_rect(&mut self, position: Position, size: Size) {
        self.prepare_stroke();
        let r = rect_at(position, size);
        let mut path = vello_cpu::kurbo::BezPath::new();
        path.move_to(vello_cpu::kurbo::Point::new(r.x0, r.y0));
        path.line_to(vello_cpu::kurbo::Point::new(r.x1, r.y0));
        path.line_to(vello_cpu::kurbo::Point::new(r.x1, r.y1));
        path.line_to(vello_cpu::kurbo::Point::new(r.x0, r.y1));
        path.close_path();
        self.ctx.stroke_path(&path);
    }

    /// Clear a rectangle back to fully transparent.
    ///
    /// Ignores global alpha and the composition mode, like the host API.
    pub(crate) fn clear_rect(&mut self, position: Position, size: Size) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_blend_mode(vello_cpu::peniko::BlendMode {
            mix: vello_cpu::peniko::Mix::Normal,
            compose: vello_cpu::peniko::Compose::Clear,
        });
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(0, 0, 0, 255));
        self.ctx.fill_rect(&rect_to_cpu(rect_at(position, size)));
    }

    fn prepare_stroke(&mut self) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_blend_mode(self.composite.to_blend());
        self.ctx.set_paint(self.stroke.to_paint(self.global_alpha));
        self.ctx.set_stroke(
            vello_cpu::kurbo::Stroke::new(self.line_width).with_caps(self.line_cap.to_cap()),
        );
    }

    // ----- text painters -------------------------------------------------

    pub(crate) fn fill_text(&mut self, text: &str, position: Position) -> SlateResult<()> {
        self.paint_text(text, position, self.fill, false)
    }

    pub(crate) fn stroke_text(&mut self, text: &str, position: Position) -> SlateResult<()> {
        self.paint_text(text, position, self.stroke, true)
    }

    fn paint_text(
        &mut self,
        text: &str,
        position: Position,
        style: Channels,
        stroked: bool,
    ) -> SlateResult<()> {
        let Some(font) = self.font.clone() else {
            return Err(SlateError::validation(
                "text painted before any Font op set a font",
            ));
        };

        let brush = TextBrush {
            r: style.red,
            g: style.green,
            b: style.blue,
            a: style.alpha_u8(self.global_alpha),
        };
        let layout = self.text.layout_plain(text, &font.bytes, font.px, brush)?;

        let font_data = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(font.bytes.as_ref().clone()),
            0,
        );

        self.ctx.set_blend_mode(self.composite.to_blend());
        self.ctx.set_transform(affine_to_cpu(kurbo::Affine::translate((
            position.x, position.y,
        ))));
        if stroked {
            self.ctx.set_stroke(
                vello_cpu::kurbo::Stroke::new(self.line_width).with_caps(self.line_cap.to_cap()),
            );
        }

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let b = run.style().brush;
                self.ctx
                    .set_paint(vello_cpu::peniko::Color::from_rgba8(b.r, b.g, b.b, b.a));
                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                let builder = self
                    .ctx
                    .glyph_run(&font_data)
                    .font_size(run.run().font_size());
                if stroked {
                    builder.stroke_glyphs(glyphs);
                } else {
                    builder.fill_glyphs(glyphs);
                }
            }
        }
        Ok(())
    }

    // ----- pixel and image painters --------------------------------------

    /// Write a fresh pixel buffer at `position`, 1:1.
    ///
    /// Replaces the whole rectangle, alpha included: transparent samples in
    /// the data punch through whatever was underneath. Ignores global alpha
    /// and the composition mode, like the host API's raw-pixel writer.
    pub(crate) fn put_image_data(
        &mut self,
        data: &[u8],
        size: Size,
        position: Position,
    ) -> SlateResult<()> {
        if data.len() != size.byte_len() {
            return Err(SlateError::validation(format!(
                "put-image-data length {} does not match {}x{}x4",
                data.len(),
                size.width,
                size.height
            )));
        }
        let pixmap = pixels::pixmap_from_straight_bytes(data, size.width, size.height)?;
        let image = pixels::image_from_pixmap(&Arc::new(pixmap));

        // Clearing first makes painting with default blending a replace.
        self.clear_rect(position, size);
        self.ctx
            .set_blend_mode(vello_cpu::peniko::BlendMode::default());
        self.ctx
            .set_transform(affine_to_cpu(kurbo::Affine::translate((
                position.x, position.y,
            ))));
        self.ctx.set_paint(image);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(size.width),
            f64::from(size.height),
        ));
        Ok(())
    }

    /// Composite another model's surface onto this context.
    ///
    /// The source is read-only; its surface is shared into the paint, never
    /// copied or mutated.
    pub(crate) fn draw_image(
        &mut self,
        source: &CanvasModel,
        target: DrawTarget,
    ) -> SlateResult<()> {
        let surface = source.surface();
        let sw = f64::from(surface.width());
        let sh = f64::from(surface.height());
        if sw <= 0.0 || sh <= 0.0 {
            return Err(SlateError::draw("image source surface is empty"));
        }
        let image = pixels::image_from_pixmap(surface);

        let (transform, fill_region) = match target {
            DrawTarget::At(dst) => (
                kurbo::Affine::translate((dst.x, dst.y)),
                kurbo::Rect::new(0.0, 0.0, sw, sh),
            ),
            DrawTarget::Scaled(dst, dst_size) => (
                kurbo::Affine::translate((dst.x, dst.y))
                    * kurbo::Affine::scale_non_uniform(
                        f64::from(dst_size.width) / sw,
                        f64::from(dst_size.height) / sh,
                    ),
                kurbo::Rect::new(0.0, 0.0, sw, sh),
            ),
            DrawTarget::CropScaled(src, dst) => {
                if src.size.width == 0 || src.size.height == 0 {
                    return Err(SlateError::validation(
                        "crop source region must have positive size",
                    ));
                }
                // Map the source crop rectangle onto the destination
                // rectangle; the fill region bounds sampling to the crop.
                let transform = kurbo::Affine::translate((dst.position.x, dst.position.y))
                    * kurbo::Affine::scale_non_uniform(
                        f64::from(dst.size.width) / f64::from(src.size.width),
                        f64::from(dst.size.height) / f64::from(src.size.height),
                    )
                    * kurbo::Affine::translate((-src.position.x, -src.position.y));
                (transform, src.to_rect())
            }
        };

        self.ctx.set_blend_mode(self.composite.to_blend());
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx.set_paint(image);
        if self.global_alpha < 1.0 {
            self.ctx.push_opacity_layer(self.global_alpha);
        }
        self.ctx.fill_rect(&rect_to_cpu(fill_region));
        if self.global_alpha < 1.0 {
            self.ctx.pop_layer();
        }
        Ok(())
    }
}

fn affine_to_cpu(a: kurbo::Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: kurbo::Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}
