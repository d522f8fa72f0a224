//! The closed draw-op vocabulary.
//!
//! Every instruction the batch interpreter understands is one variant here,
//! matched exhaustively, so adding an op is a compile-time event rather than
//! a string-dispatch convention.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::color::{Channels, ToChannels};
use crate::geom::{Position, Region, Size};
use crate::model::CanvasModel;

/// Caller-supplied font used by the text painters.
///
/// Fonts are raw font-file bytes (TTF/OTF); the crate registers and shapes
/// them itself rather than consulting any system font database.
#[derive(Clone)]
pub struct FontSpec {
    /// Font size in pixels.
    pub px: f32,
    /// Raw font-file bytes, shared across ops.
    pub bytes: Arc<Vec<u8>>,
}

impl FontSpec {
    pub fn new(px: f32, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            px,
            bytes: Arc::new(bytes.into()),
        }
    }
}

impl fmt::Debug for FontSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontSpec")
            .field("px", &self.px)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Line cap applied to stroked paths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl LineCap {
    /// The host API's keyword for this cap.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Butt => "butt",
            Self::Round => "round",
            Self::Square => "square",
        }
    }

    pub(crate) fn to_cap(self) -> vello_cpu::kurbo::Cap {
        match self {
            Self::Butt => vello_cpu::kurbo::Cap::Butt,
            Self::Round => vello_cpu::kurbo::Cap::Round,
            Self::Square => vello_cpu::kurbo::Cap::Square,
        }
    }
}

/// Global composition mode, the canvas `globalCompositeOperation` vocabulary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompositeMode {
    #[default]
    SourceOver,
    SourceIn,
    SourceOut,
    SourceAtop,
    DestinationOver,
    DestinationIn,
    DestinationOut,
    DestinationAtop,
    Lighter,
    Copy,
    Xor,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

impl CompositeMode {
    /// The host API's lowercase-hyphenated keyword for this mode.
    ///
    /// Op names resolve to exactly these strings; no runtime case mangling
    /// is involved.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::SourceOver => "source-over",
            Self::SourceIn => "source-in",
            Self::SourceOut => "source-out",
            Self::SourceAtop => "source-atop",
            Self::DestinationOver => "destination-over",
            Self::DestinationIn => "destination-in",
            Self::DestinationOut => "destination-out",
            Self::DestinationAtop => "destination-atop",
            Self::Lighter => "lighter",
            Self::Copy => "copy",
            Self::Xor => "xor",
            Self::Multiply => "multiply",
            Self::Screen => "screen",
            Self::Overlay => "overlay",
            Self::Darken => "darken",
            Self::Lighten => "lighten",
            Self::ColorDodge => "color-dodge",
            Self::ColorBurn => "color-burn",
            Self::HardLight => "hard-light",
            Self::SoftLight => "soft-light",
            Self::Difference => "difference",
            Self::Exclusion => "exclusion",
            Self::Hue => "hue",
            Self::Saturation => "saturation",
            Self::Color => "color",
            Self::Luminosity => "luminosity",
        }
    }

    pub(crate) fn to_blend(self) -> vello_cpu::peniko::BlendMode {
        use vello_cpu::peniko::{BlendMode, Compose, Mix};

        let (mix, compose) = match self {
            Self::SourceOver => (Mix::Normal, Compose::SrcOver),
            Self::SourceIn => (Mix::Normal, Compose::SrcIn),
            Self::SourceOut => (Mix::Normal, Compose::SrcOut),
            Self::SourceAtop => (Mix::Normal, Compose::SrcAtop),
            Self::DestinationOver => (Mix::Normal, Compose::DestOver),
            Self::DestinationIn => (Mix::Normal, Compose::DestIn),
            Self::DestinationOut => (Mix::Normal, Compose::DestOut),
            Self::DestinationAtop => (Mix::Normal, Compose::DestAtop),
            Self::Lighter => (Mix::Normal, Compose::Plus),
            Self::Copy => (Mix::Normal, Compose::Copy),
            Self::Xor => (Mix::Normal, Compose::Xor),
            Self::Multiply => (Mix::Multiply, Compose::SrcOver),
            Self::Screen => (Mix::Screen, Compose::SrcOver),
            Self::Overlay => (Mix::Overlay, Compose::SrcOver),
            Self::Darken => (Mix::Darken, Compose::SrcOver),
            Self::Lighten => (Mix::Lighten, Compose::SrcOver),
            Self::ColorDodge => (Mix::ColorDodge, Compose::SrcOver),
            Self::ColorBurn => (Mix::ColorBurn, Compose::SrcOver),
            Self::HardLight => (Mix::HardLight, Compose::SrcOver),
            Self::SoftLight => (Mix::SoftLight, Compose::SrcOver),
            Self::Difference => (Mix::Difference, Compose::SrcOver),
            Self::Exclusion => (Mix::Exclusion, Compose::SrcOver),
            Self::Hue => (Mix::Hue, Compose::SrcOver),
            Self::Saturation => (Mix::Saturation, Compose::SrcOver),
            Self::Color => (Mix::Color, Compose::SrcOver),
            Self::Luminosity => (Mix::Luminosity, Compose::SrcOver),
        };
        BlendMode { mix, compose }
    }
}

/// Placement mode for [`DrawOp::DrawImage`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum DrawTarget {
    /// Paint at a destination position at the source's native size.
    At(Position),
    /// Paint at a destination position scaled to an explicit size.
    Scaled(Position, Size),
    /// Crop an explicit source region, scaled into a destination region.
    CropScaled(Region, Region),
}

/// One instruction in the drawing vocabulary.
///
/// Ops are immutable values built by application code and consumed once by
/// [`batch`](crate::batch). Style setters affect every subsequent finisher
/// until overridden, mirroring an immediate-mode drawing context.
#[derive(Clone, Debug)]
pub enum DrawOp {
    /// Set the font used by the text painters.
    Font(FontSpec),
    /// Stroke text outlines at a position.
    StrokeText(String, Position),
    /// Fill text at a position.
    FillText(String, Position),
    /// Set the global alpha multiplier (clamped to 0.0-1.0).
    GlobalAlpha(f32),
    /// Set the global composition mode.
    CompositeMode(CompositeMode),
    /// Set the stroke line cap.
    LineCap(LineCap),
    /// Set the stroke line width.
    LineWidth(f64),
    /// Extend the current path with a line segment.
    LineTo(Position),
    /// Move the current path's pen without drawing.
    MoveTo(Position),
    /// Stroke the accumulated path.
    Stroke,
    /// Reset the accumulated path.
    BeginPath,
    /// Append a closed rectangle subpath to the current path.
    Rect(Position, Size),
    /// Stroke a rectangle outline immediately, without touching the path.
    StrokeRect(Position, Size),
    /// Set the stroke style color.
    StrokeStyle(Channels),
    /// Set the fill style color.
    FillStyle(Channels),
    /// Fill the accumulated path.
    Fill,
    /// Write raw straight-alpha RGBA pixels at a position.
    ///
    /// `data.len()` must equal `size.byte_len()`; a mismatch is a caller
    /// contract violation surfaced as a validation error.
    PutImageData {
        data: Vec<u8>,
        size: Size,
        position: Position,
    },
    /// Clear a rectangle back to transparent.
    ClearRect(Position, Size),
    /// Composite another model's surface onto this one.
    ///
    /// The source model is read-only; it is never cloned or mutated.
    DrawImage(CanvasModel, DrawTarget),
}

impl DrawOp {
    /// Build a [`DrawOp::FillStyle`] from any color collaborator.
    pub fn fill_style(color: &impl ToChannels) -> Self {
        Self::FillStyle(color.to_channels())
    }

    /// Build a [`DrawOp::StrokeStyle`] from any color collaborator.
    pub fn stroke_style(color: &impl ToChannels) -> Self {
        Self::StrokeStyle(color.to_channels())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_keywords_are_lowercase_hyphenated() {
        assert_eq!(CompositeMode::SourceOver.keyword(), "source-over");
        assert_eq!(
            CompositeMode::DestinationAtop.keyword(),
            "destination-atop"
        );
        assert_eq!(CompositeMode::ColorDodge.keyword(), "color-dodge");
        assert_eq!(CompositeMode::HardLight.keyword(), "hard-light");
        assert_eq!(CompositeMode::SoftLight.keyword(), "soft-light");
        assert_eq!(CompositeMode::Lighter.keyword(), "lighter");
        assert_eq!(CompositeMode::Luminosity.keyword(), "luminosity");
    }

    #[test]
    fn every_composite_keyword_is_well_formed() {
        let all = [
            CompositeMode::SourceOver,
            CompositeMode::SourceIn,
            CompositeMode::SourceOut,
            CompositeMode::SourceAtop,
            CompositeMode::DestinationOver,
            CompositeMode::DestinationIn,
            CompositeMode::DestinationOut,
            CompositeMode::DestinationAtop,
            CompositeMode::Lighter,
            CompositeMode::Copy,
            CompositeMode::Xor,
            CompositeMode::Multiply,
            CompositeMode::Screen,
            CompositeMode::Overlay,
            CompositeMode::Darken,
            CompositeMode::Lighten,
            CompositeMode::ColorDodge,
            CompositeMode::ColorBurn,
            CompositeMode::HardLight,
            CompositeMode::SoftLight,
            CompositeMode::Difference,
            CompositeMode::Exclusion,
            CompositeMode::Hue,
            CompositeMode::Saturation,
            CompositeMode::Color,
            CompositeMode::Luminosity,
        ];
        for mode in all {
            let kw = mode.keyword();
            assert!(!kw.is_empty());
            assert!(
                kw.chars().all(|c| c.is_ascii_lowercase() || c == '-'),
                "bad keyword: {kw}"
            );
        }
    }

    #[test]
    fn line_cap_keywords() {
        assert_eq!(LineCap::Butt.keyword(), "butt");
        assert_eq!(LineCap::Round.keyword(), "round");
        assert_eq!(LineCap::Square.keyword(), "square");
    }

    #[test]
    fn style_constructors_convert_colors() {
        let op = DrawOp::fill_style(&crate::color::Rgba::rgb(9, 8, 7));
        match op {
            DrawOp::FillStyle(c) => {
                assert_eq!((c.red, c.green, c.blue), (9, 8, 7));
                assert_eq!(c.alpha, 1.0);
            }
            other => panic!("unexpected op: {other:?}"),
        }
    }
}
