//! # Lottie Bridge
//!
//! The serialization engine: a deterministic transform from a
//! [`keyline_core::Project`] into a [`lottie_data::LottieJson`] document
//! (export) and its left-inverse (import). All unit conversion lives here:
//! seconds to frame indices, `[0,1]` fractions to percentages, hex colors
//! to normalized channels, and SVG geometry strings to bezier vertex lists.

pub mod export;
pub mod import;
pub mod path;

pub use export::{export_project, LOTTIE_VERSION};
pub use import::{import_project, ConvertError};
pub use path::PathError;
