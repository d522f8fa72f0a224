//! Ordered draw-op execution against a cloned surface.

use crate::context::Context2d;
use crate::error::SlateResult;
use crate::model::{CanvasModel, checked_dims};
use crate::ops::DrawOp;

/// Apply an ordered sequence of draw ops to a clone of `model`.
///
/// The source model is never mutated: a fresh surface at the model's declared
/// size is seeded with its pixels, every op executes strictly in order
/// against that single stateful context, and the result is returned as a new
/// model. Style setters affect all subsequent finishers until overridden.
///
/// Malformed ops (text before a font is set, a raw-pixel write whose byte
/// length does not match its size) are caller contract violations and fail
/// the whole batch; the source model is untouched either way.
pub fn batch(ops: &[DrawOp], model: &CanvasModel) -> SlateResult<CanvasModel> {
    let size = model.size();
    let (w, h) = checked_dims(size)?;
    tracing::trace!(ops = ops.len(), width = size.width, height = size.height, "batch");

    let mut ctx = Context2d::new(w, h);
    ctx.seed(model.surface());
    for op in ops {
        apply_op(&mut ctx, op)?;
    }
    Ok(CanvasModel::from_pixmap(
        size.width,
        size.height,
        ctx.finish(),
    ))
}

fn apply_op(ctx: &mut Context2d, op: &DrawOp) -> SlateResult<()> {
    match op {
        DrawOp::Font(font) => ctx.set_font(font.clone()),
        DrawOp::StrokeText(text, position) => ctx.stroke_text(text, *position)?,
        DrawOp::FillText(text, position) => ctx.fill_text(text, *position)?,
        DrawOp::GlobalAlpha(alpha) => ctx.set_global_alpha(*alpha),
        DrawOp::CompositeMode(mode) => ctx.set_composite(*mode),
        DrawOp::LineCap(cap) => ctx.set_line_cap(*cap),
        DrawOp::LineWidth(width) => ctx.set_line_width(*width),
        DrawOp::LineTo(position) => ctx.line_to(*position),
        DrawOp::MoveTo(position) => ctx.move_to(*position),
        DrawOp::Stroke => ctx.stroke(),
        DrawOp::BeginPath => ctx.begin_path(),
        DrawOp::Rect(position, size) => ctx.rect(*position, *size),
        DrawOp::StrokeRect(position, size) => ctx.stroke_rect(*position, *size),
        DrawOp::StrokeStyle(color) => ctx.set_stroke_style(*color),
        DrawOp::FillStyle(color) => ctx.set_fill_style(*color),
        DrawOp::Fill => ctx.fill(),
        DrawOp::PutImageData {
            data,
            size,
            position,
        } => ctx.put_image_data(data, *size, *position)?,
        DrawOp::ClearRect(position, size) => ctx.clear_rect(*position, *size),
        DrawOp::DrawImage(source, target) => ctx.draw_image(source, *target)?,
    }
    Ok(())
}
