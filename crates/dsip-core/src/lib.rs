//! DSIP Core: the color pipeline behind a photographic look.
//!
//! Applies a 3D LUT, HSV gains, contrast/brightness, film grain, and a
//! vignette to 8-bit images. Every stage is a pure function so the preview
//! shader and the export path can share one model. No GPU or UI
//! dependencies.

pub mod buffer;
pub mod codec;
pub mod color;
pub mod effects;
pub mod error;
pub mod lut;
pub mod params;
pub mod pipeline;
pub mod profile;
pub mod scopes;

// Re-exports for convenience.
pub use buffer::PixelBuffer;
pub use error::{DecodeError, DsipError, DsipResult, ProfileWarning};
pub use lut::ColorCube;
pub use params::{ProcessParams, ProcessUniforms};
pub use pipeline::{process_image, process_image_cancellable, process_image_with_cube};
pub use profile::Profile;
