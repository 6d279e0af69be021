//! Sentiment gauge rendering.
//!
//! - `geometry`: layout of the half-circle gauge and needle
//! - `gradient`: the red-orange-green value ramp
//! - `surface`: the drawing interface both backends implement
//! - `raster`: tiny-skia backend producing PNG bytes
//! - `canvas`: browser backend producing a replayable draw list
//! - `gauge`: layer order and the value-arc algorithm

pub mod canvas;
pub mod gauge;
pub mod geometry;
pub mod gradient;
pub mod png;
pub mod raster;
pub mod surface;

pub use canvas::{CanvasDrawing, CanvasSurface, DrawCommand};
pub use gauge::{GaugeRenderer, GaugeScene, ValueArcStrategy};
pub use geometry::GaugeGeometry;
pub use raster::RasterSurface;
pub use surface::{Asset, Capabilities, GaugeSurface};
