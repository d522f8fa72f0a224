//! The color collaborator contract.
//!
//! This crate never defines color spaces of its own; it consumes any color
//! type that can reduce itself to an (r,g,b,a) channel quadruple.

use serde::{Deserialize, Serialize};

/// The channel quadruple every color collaborator reduces to.
///
/// Channels are straight-alpha: `red`/`green`/`blue` are 0-255 samples and
/// `alpha` is a 0.0-1.0 coverage factor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Channels {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: f32,
}

impl Channels {
    pub fn new(red: u8, green: u8, blue: u8, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Format as the host API's textual `rgba(r,g,b,a)` style string.
    ///
    /// This is the wire form string-keyed drawing APIs expect; correctness of
    /// the formatting is pinned by tests rather than left to convention.
    pub fn css_string(&self) -> String {
        format!(
            "rgba({},{},{},{})",
            self.red, self.green, self.blue, self.alpha
        )
    }

    /// Resolve to a solid engine paint, folding in the context's global alpha.
    pub(crate) fn to_paint(self, global_alpha: f32) -> vello_cpu::peniko::Color {
        vello_cpu::peniko::Color::from_rgba8(self.red, self.green, self.blue, self.alpha_u8(global_alpha))
    }

    pub(crate) fn alpha_u8(self, global_alpha: f32) -> u8 {
        let a = (self.alpha * global_alpha).clamp(0.0, 1.0);
        (a * 255.0).round() as u8
    }
}

/// Conversion contract consumed by the style-setter draw ops.
pub trait ToChannels {
    fn to_channels(&self) -> Channels;
}

impl ToChannels for Channels {
    fn to_channels(&self) -> Channels {
        *self
    }
}

/// Plain straight-alpha RGBA color, the default collaborator implementation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: f32,
}

impl Rgba {
    pub const fn new(red: u8, green: u8, blue: u8, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Fully opaque color from the three color channels.
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::new(red, green, blue, 1.0)
    }
}

impl ToChannels for Rgba {
    fn to_channels(&self) -> Channels {
        Channels::new(self.red, self.green, self.blue, self.alpha)
    }
}
