//! Software rendering of the preview surface.
//!
//! Split the same way the capture pipeline runs: `layout` places the card's
//! boxes, `paint` resolves them against the theme palette into a closed
//! command set, `raster` fills pixels and implements [`CaptureBackend`].
//!
//! [`CaptureBackend`]: crate::export::CaptureBackend

pub mod layout;
pub mod paint;
pub mod raster;

pub use raster::SoftwareRaster;
