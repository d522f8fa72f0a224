//! Custom-node adapter for virtual-DOM style hosts.
//!
//! A host tree that supports custom renderable nodes drives three hooks:
//! render once on mount, then diff + apply-patch on every update cycle. The
//! node's lifecycle is owned by the host (mount and unmount included); this
//! module only decides *whether* a repaint is needed and performs it.

use crate::geom::Size;
use crate::model::CanvasModel;
use crate::pixels;

/// The host's custom-element extension point.
///
/// `Element` is the live, mutable paintable thing the host keeps in its real
/// tree; `Patch` carries a repaint decision from [`diff`](Self::diff) to
/// [`apply_patch`](Self::apply_patch). An element is allocated only by
/// [`render`](Self::render), never during patching.
pub trait HostNode {
    type Element;
    type Patch;

    /// Produce a fresh element for the host tree on mount.
    fn render(&self) -> Self::Element;

    /// Compare against the replacement node and produce a patch.
    fn diff(&self, new: &Self) -> Self::Patch;

    /// Apply a patch to the live element in place.
    fn apply_patch(element: &mut Self::Element, patch: &Self::Patch);
}

/// A canvas model embedded in the host tree as a custom node.
#[derive(Clone, Debug)]
pub struct CanvasNode {
    model: CanvasModel,
}

impl CanvasNode {
    pub fn new(model: CanvasModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &CanvasModel {
        &self.model
    }
}

/// The live paintable surface element owned by the host tree.
///
/// Holds its own pixel storage, independent of every model: handing the live
/// backing surface of a published model to the host would let the host
/// mutate it behind the model's back.
#[derive(Debug)]
pub struct SurfaceElement {
    width: u32,
    height: u32,
    pixmap: vello_cpu::Pixmap,
}

impl SurfaceElement {
    /// Current element dimensions.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Element pixel content as flat straight-alpha RGBA8 bytes.
    pub fn image_data(&self) -> Vec<u8> {
        pixels::unpremultiply_rgba8(self.pixmap.data_as_u8_slice())
    }
}

/// Diff result: the repaint decision plus the data needed to perform it.
#[derive(Clone, Debug)]
pub struct CanvasPatch {
    repaint: bool,
    model: CanvasModel,
}

impl CanvasPatch {
    pub fn needs_repaint(&self) -> bool {
        self.repaint
    }

    pub fn model(&self) -> &CanvasModel {
        &self.model
    }
}

impl HostNode for CanvasNode {
    type Element = SurfaceElement;
    type Patch = CanvasPatch;

    /// Clone the model and hand the clone's surface to the host as the
    /// paintable element.
    fn render(&self) -> SurfaceElement {
        let size = self.model.size();
        tracing::trace!(width = size.width, height = size.height, "render canvas node");
        SurfaceElement {
            width: size.width,
            height: size.height,
            pixmap: pixels::blit_to_new(
                self.model.surface(),
                pixels::dim_u16(size.width),
                pixels::dim_u16(size.height),
            ),
        }
    }

    /// Identity comparison of backing surfaces, nothing more.
    ///
    /// Reference inequality means repaint; equality means no-op. Two
    /// pixel-identical surfaces behind distinct references still repaint -
    /// a deliberate trade of occasional redundant repaints for never
    /// comparing pixel content.
    fn diff(&self, new: &Self) -> CanvasPatch {
        let repaint = !self.model.surface_eq(&new.model);
        tracing::trace!(repaint, "diff canvas node");
        CanvasPatch {
            repaint,
            model: new.model.clone(),
        }
    }

    /// On repaint: resize the element to the new model's declared size,
    /// clear it fully, and paint the model's surface at the origin. The
    /// element is reused in place; patching never allocates a new one.
    fn apply_patch(element: &mut SurfaceElement, patch: &CanvasPatch) {
        if !patch.repaint {
            return;
        }
        let size = patch.model.size();
        element.width = size.width;
        element.height = size.height;
        // A fresh blit is resize+clear+paint in one pass: the new surface
        // starts transparent and rows are copied from the model.
        element.pixmap = pixels::blit_to_new(
            patch.model.surface(),
            pixels::dim_u16(size.width),
            pixels::dim_u16(size.height),
        );
    }
}
