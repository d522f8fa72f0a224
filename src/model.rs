//! The immutable surface model.
//!
//! A [`CanvasModel`] is a value: declared width/height plus a shared handle
//! to a backing pixel surface. Once a model has been handed to application
//! code its surface is never mutated again; every transforming operation
//! copies pixels into a fresh surface and returns a new model. `Clone` on the
//! model itself is the cheap value share (same surface identity) - the
//! mutation boundary is [`CanvasModel::deep_clone`].

use std::fmt;
use std::sync::Arc;

use crate::error::{SlateError, SlateResult};
use crate::geom::Size;
use crate::pixels;

/// An immutable-from-outside 2D surface value.
pub struct CanvasModel {
    width: u32,
    height: u32,
    surface: Arc<vello_cpu::Pixmap>,
}

impl Clone for CanvasModel {
    /// Cheap value share: the clone references the same backing surface and
    /// therefore compares surface-equal to the original.
    fn clone(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            surface: Arc::clone(&self.surface),
        }
    }
}

impl fmt::Debug for CanvasModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasModel")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("surface", &Arc::as_ptr(&self.surface))
            .finish()
    }
}

impl CanvasModel {
    /// Allocate a fresh, blank (fully transparent) surface of the given size.
    ///
    /// Dimensions must be positive and at most 65_535 (the engine's surface
    /// limit); anything else is a precondition violation surfaced as a
    /// validation error.
    pub fn new(size: Size) -> SlateResult<Self> {
        let (w, h) = checked_dims(size)?;
        Ok(Self {
            width: size.width,
            height: size.height,
            surface: Arc::new(vello_cpu::Pixmap::new(w, h)),
        })
    }

    /// Declared width/height. Pure read; no surface access.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// The sole mutation boundary: allocate a new backing surface at the
    /// model's *declared* size and copy-paint the old content at the origin.
    ///
    /// The returned model is fully independent; painting on it never affects
    /// `self`. When declared and backing dimensions differ (after
    /// [`set_size`](Self::set_size)) the content is cropped or padded.
    pub fn deep_clone(&self) -> Self {
        let pixmap = pixels::blit_to_new(
            &self.surface,
            pixels::dim_u16(self.width),
            pixels::dim_u16(self.height),
        );
        Self {
            width: self.width,
            height: self.height,
            surface: Arc::new(pixmap),
        }
    }

    /// Clone the model, then overwrite the clone's declared width/height.
    ///
    /// Deliberately a cheap metadata change: backing pixels are copied but
    /// not resized or rescaled, so [`image_data`](Self::image_data) still
    /// reflects the old content dimensions until a later draw repaints at the
    /// declared size. Callers wanting a visual rescale issue an explicit
    /// [`DrawImage`](crate::DrawOp::DrawImage) op.
    pub fn set_size(&self, size: Size) -> SlateResult<Self> {
        checked_dims(size)?;
        let clone = self.deep_clone();
        Ok(Self {
            width: size.width,
            height: size.height,
            surface: clone.surface,
        })
    }

    /// Read the full backing surface as flat straight-alpha RGBA8 bytes,
    /// row-major from the origin. Pure read; never mutates the model.
    ///
    /// The length is `backing_width * backing_height * 4`, which tracks the
    /// backing surface rather than the declared size (see
    /// [`set_size`](Self::set_size)).
    pub fn image_data(&self) -> Vec<u8> {
        pixels::unpremultiply_rgba8(self.surface.data_as_u8_slice())
    }

    /// Identity comparison of the two models' backing surfaces.
    ///
    /// This is the cheap dirty-check used for diffing: pointer equality, not
    /// content equality. Two pixel-identical surfaces with distinct handles
    /// compare unequal, which makes the diff repaint more than strictly
    /// necessary but never less.
    pub fn surface_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.surface, &other.surface)
    }

    pub(crate) fn surface(&self) -> &Arc<vello_cpu::Pixmap> {
        &self.surface
    }

    pub(crate) fn from_pixmap(width: u32, height: u32, pixmap: vello_cpu::Pixmap) -> Self {
        Self {
            width,
            height,
            surface: Arc::new(pixmap),
        }
    }
}

/// Validate declared dimensions against the engine's surface limits.
pub(crate) fn checked_dims(size: Size) -> SlateResult<(u16, u16)> {
    if size.width == 0 || size.height == 0 {
        return Err(SlateError::validation(
            "canvas dimensions must be positive",
        ));
    }
    let w: u16 = size
        .width
        .try_into()
        .map_err(|_| SlateError::validation("canvas width exceeds u16 surface limit"))?;
    let h: u16 = size
        .height
        .try_into()
        .map_err(|_| SlateError::validation("canvas height exceeds u16 surface limit"))?;
    Ok((w, h))
}
