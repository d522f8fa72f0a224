//! Pure pixel-buffer transforms.
//!
//! The engine stores surfaces as premultiplied RGBA8; the public pixel
//! sequence format is straight-alpha RGBA8, row-major, 4 bytes per pixel.
//! Everything here is a byte loop with no engine state involved.

use std::sync::Arc;

use crate::error::{SlateError, SlateResult};

/// Premultiply straight-alpha RGBA8 samples in place.
pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

/// Convert premultiplied RGBA8 back to straight-alpha RGBA8.
pub(crate) fn unpremultiply_rgba8(premul: &[u8]) -> Vec<u8> {
    let mut out = premul.to_vec();
    for px in out.chunks_exact_mut(4) {
        let a = px[3] as u32;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        for c in px.iter_mut().take(3) {
            let v = (u32::from(*c) * 255 + a / 2) / a;
            *c = v.min(255) as u8;
        }
    }
    out
}

/// Clamp a validated model dimension to the engine's `u16` surface limit.
///
/// Model dimensions are validated at construction, so the clamp never fires
/// for a live model; it only keeps this helper total.
pub(crate) fn dim_u16(v: u32) -> u16 {
    v.try_into().unwrap_or(u16::MAX)
}

/// Allocate a `width` x `height` surface and copy-paint `src` at the origin.
///
/// Rows are copied byte-for-byte; content is cropped or padded with
/// transparent pixels when the destination dimensions differ.
pub(crate) fn blit_to_new(
    src: &vello_cpu::Pixmap,
    width: u16,
    height: u16,
) -> vello_cpu::Pixmap {
    let mut dst = vello_cpu::Pixmap::new(width, height);
    let src_w = src.width() as usize;
    let dst_w = width as usize;
    let copy_w = src_w.min(dst_w) * 4;
    let copy_h = (src.height() as usize).min(height as usize);

    let src_bytes = src.data_as_u8_slice();
    let dst_bytes = dst.data_as_u8_slice_mut();
    for row in 0..copy_h {
        let s = row * src_w * 4;
        let d = row * dst_w * 4;
        dst_bytes[d..d + copy_w].copy_from_slice(&src_bytes[s..s + copy_w]);
    }
    dst
}

/// Build a surface from a flat straight-alpha RGBA8 byte sequence.
pub(crate) fn pixmap_from_straight_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> SlateResult<vello_cpu::Pixmap> {
    let mut premul = bytes.to_vec();
    premultiply_rgba8_in_place(&mut premul);
    pixmap_from_premul_bytes(&premul, width, height)
}

/// Build a surface from premultiplied RGBA8 bytes.
pub(crate) fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> SlateResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| SlateError::validation("surface width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| SlateError::validation("surface height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(SlateError::validation(format!(
            "pixel sequence length {} does not match {}x{}x4",
            bytes.len(),
            width,
            height
        )));
    }

    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

/// Wrap a shared surface as an engine image paint, sampled 1:1.
pub(crate) fn image_from_pixmap(pixmap: &Arc<vello_cpu::Pixmap>) -> vello_cpu::Image {
    vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::clone(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    }
}
