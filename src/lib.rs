//! Slate treats a 2D drawing surface as an immutable value.
//!
//! A [`CanvasModel`] wraps a backing pixel surface plus declared dimensions.
//! Models are never mutated in place: [`batch`] applies an ordered sequence
//! of [`DrawOp`]s to a clone and returns a new model, so a value already
//! handed to application or UI code keeps its pixels forever. The
//! [`CanvasNode`] adapter exposes models to a virtual-DOM style host as a
//! custom renderable node with render/diff/patch hooks, using surface
//! identity as the repaint check.
//!
//! ```
//! use slate::{CanvasModel, DrawOp, Position, Rgba, Size, batch};
//!
//! let blank = CanvasModel::new(Size::new(64, 64))?;
//! let drawn = batch(
//!     &[
//!         DrawOp::fill_style(&Rgba::rgb(255, 0, 0)),
//!         DrawOp::Rect(Position::new(8.0, 8.0), Size::new(16, 16)),
//!         DrawOp::Fill,
//!     ],
//!     &blank,
//! )?;
//! assert!(blank.image_data().iter().all(|&b| b == 0));
//! assert_eq!(drawn.size(), blank.size());
//! # Ok::<(), slate::SlateError>(())
//! ```
#![forbid(unsafe_code)]

mod batch;
mod color;
mod context;
mod error;
mod geom;
mod loader;
mod model;
mod ops;
mod pixels;
mod text;
mod vdom;

pub use batch::batch;
pub use color::{Channels, Rgba, ToChannels};
pub use error::{SlateError, SlateResult};
pub use geom::{Position, Region, Size};
pub use loader::{CrossOrigin, ImageSource, LoadError, load_image};
pub use model::CanvasModel;
pub use ops::{CompositeMode, DrawOp, DrawTarget, FontSpec, LineCap};
pub use vdom::{CanvasNode, CanvasPatch, HostNode, SurfaceElement};
